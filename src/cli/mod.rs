//! CLI module for Hieren
//!
//! Handles command-line argument parsing and terminal rendering.

pub mod args;
pub mod output;

pub use args::{require_query_text, Args, Commands, Verbosity};
