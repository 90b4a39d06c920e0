//! Diagnostic output for the launcher.
//!
//! Library code only emits `tracing` events. Binaries call [`initialize`]
//! once to route them to stderr, filtered by `TOOLBELT_LOG` when it is set
//! and by the requested verbosity otherwise.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "TOOLBELT_LOG";

/// Directive used when `TOOLBELT_LOG` is unset, by verbosity level.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "toolbelt=info",
        1 => "toolbelt=debug",
        _ => "toolbelt=trace",
    }
}

/// Build the filter for a run at `verbosity`.
///
/// An explicit `TOOLBELT_LOG` always wins over `-v` flags.
pub fn filter(verbosity: u8) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .map_err(|err| anyhow!("invalid {LOG_ENV} directives '{directives}': {err}")),
        _ => Ok(EnvFilter::new(default_directive(verbosity))),
    }
}

/// Install the global subscriber writing to stderr.
pub fn initialize(verbosity: u8) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(verbosity)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
