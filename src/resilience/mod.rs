//! Resilience wrapper for calls against external services
//!
//! Bounded attempts with exponential backoff. Applied around one-time
//! construction of the query engine, not around individual queries.

pub mod retry;

pub use retry::RetryPolicy;
