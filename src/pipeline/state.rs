//! Per-query orchestrator state machine
//!
//! Valid transitions (5 edges):
//! 1. Received      → Routed        (on: Classified)
//! 2. Routed        → TechnicalExec (on: Dispatch(Technical))
//! 3. Routed        → MarketExec    (on: Dispatch(Market))
//! 4. Routed        → ActionExec    (on: Dispatch(Action))
//! 5. *Exec         → Responded     (on: BranchFinished)
//!
//! `Responded` is terminal and has no outgoing edges, so a query can reach
//! it at most once.

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, Result};
use crate::types::Intent;

/// Orchestrator states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineState {
    /// Query accepted, not yet classified
    Received,

    /// Intent decided
    Routed,

    /// Technical RAG branch running
    TechnicalExec,

    /// Market web-search branch running
    MarketExec,

    /// Device-action stub running
    ActionExec,

    /// Envelope produced (terminal)
    Responded,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Router produced an intent
    Classified,

    /// Branch selected for the intent
    Dispatch(Intent),

    /// Branch returned, successfully or not
    BranchFinished,
}

impl PipelineState {
    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Responded)
    }

    /// Check if a branch is executing
    pub fn is_executing(&self) -> bool {
        matches!(
            self,
            PipelineState::TechnicalExec | PipelineState::MarketExec | PipelineState::ActionExec
        )
    }

    /// Attempt state transition with validation
    pub fn transition(&self, event: PipelineEvent) -> Result<PipelineState> {
        use PipelineEvent::*;
        use PipelineState::*;

        let next_state = match (self, event) {
            (Received, Classified) => Routed,

            (Routed, Dispatch(Intent::Technical)) => TechnicalExec,
            (Routed, Dispatch(Intent::Market)) => MarketExec,
            (Routed, Dispatch(Intent::Action)) => ActionExec,

            (TechnicalExec | MarketExec | ActionExec, BranchFinished) => Responded,

            (from, event) => {
                return Err(PipelineError::InvalidTransition {
                    from: format!("{:?}", from),
                    event: format!("{:?}", event),
                    reason: if from.is_terminal() {
                        "query already responded".to_string()
                    } else {
                        format!("no transition from {:?} on {:?}", from, event)
                    },
                });
            }
        };

        Ok(next_state)
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Received
    }
}

/// Recorded path of one query through the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTrace {
    states: Vec<PipelineState>,
}

impl StateTrace {
    pub fn new() -> Self {
        Self {
            states: vec![PipelineState::Received],
        }
    }

    /// Current state
    pub fn current(&self) -> PipelineState {
        self.states.last().copied().unwrap_or_default()
    }

    /// Apply an event; the trace is left unchanged on an invalid transition
    pub fn advance(&mut self, event: PipelineEvent) -> Result<PipelineState> {
        let next = self.current().transition(event)?;
        self.states.push(next);
        Ok(next)
    }

    pub fn states(&self) -> &[PipelineState] {
        &self.states
    }
}

impl Default for StateTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_technical_path() {
        let mut trace = StateTrace::new();
        trace.advance(PipelineEvent::Classified).unwrap();
        trace.advance(PipelineEvent::Dispatch(Intent::Technical)).unwrap();
        trace.advance(PipelineEvent::BranchFinished).unwrap();

        assert_eq!(
            trace.states(),
            &[
                PipelineState::Received,
                PipelineState::Routed,
                PipelineState::TechnicalExec,
                PipelineState::Responded,
            ]
        );
        assert!(trace.current().is_terminal());
    }

    #[test]
    fn test_dispatch_targets() {
        let routed = PipelineState::Routed;
        assert_eq!(routed.transition(PipelineEvent::Dispatch(Intent::Market)).unwrap(), PipelineState::MarketExec);
        assert_eq!(routed.transition(PipelineEvent::Dispatch(Intent::Action)).unwrap(), PipelineState::ActionExec);
    }

    #[test]
    fn test_responded_is_final() {
        let state = PipelineState::Responded;
        let err = state.transition(PipelineEvent::BranchFinished).unwrap_err();
        assert!(err.to_string().contains("already responded"));
    }

    #[test]
    fn test_cannot_skip_routing() {
        assert!(PipelineState::Received
            .transition(PipelineEvent::Dispatch(Intent::Technical))
            .is_err());
        assert!(PipelineState::Routed.transition(PipelineEvent::BranchFinished).is_err());
    }

    #[test]
    fn test_invalid_transition_leaves_trace_unchanged() {
        let mut trace = StateTrace::new();
        assert!(trace.advance(PipelineEvent::BranchFinished).is_err());
        assert_eq!(trace.states(), &[PipelineState::Received]);
    }

    #[test]
    fn test_is_executing() {
        assert!(PipelineState::MarketExec.is_executing());
        assert!(!PipelineState::Routed.is_executing());
    }
}
