//! Query pipeline: routing, branch dispatch and envelope assembly

pub mod orchestrator;
pub mod state;

pub use orchestrator::{
    BranchOutcome, Pipeline, PipelineRun, ACTION_PLACEHOLDER, MARKET_UNAVAILABLE_PREFIX,
    TECHNICAL_BUSY_MESSAGE,
};
pub use state::{PipelineEvent, PipelineState, StateTrace};
