//! Tracing initialization
//!
//! `HIEREN_LOG` takes per-target directives, for example
//! `HIEREN_LOG=hieren::pipeline=debug,hieren::rag=trace`. Without it the
//! level follows the CLI verbosity flags.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::Verbosity;

/// Environment variable holding filter directives
pub const LOG_ENV: &str = "HIEREN_LOG";

static INIT: Once = Once::new();

/// Default filter directive for a verbosity level
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "hieren=error",
        Verbosity::Normal => "hieren=warn",
        Verbosity::Verbose => "hieren=info",
        Verbosity::VeryVerbose => "hieren=debug",
        Verbosity::Trace => "hieren=trace",
    }
}

/// Install the global subscriber; later calls are no-ops
///
/// Logs go to stderr so `ask --json` output stays machine-readable.
pub fn init_tracing(verbosity: Verbosity) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        let detailed = matches!(verbosity, Verbosity::VeryVerbose | Verbosity::Trace);

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(detailed)
                    .with_file(detailed)
                    .with_line_number(detailed),
            )
            .with(filter)
            .init();
    });
}
