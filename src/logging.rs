//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the level passed on the command line
//! (or `info`) applies to this crate and `warn` to everything else.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "info";

/// Build the filter directive used when `RUST_LOG` is absent.
pub fn default_directive(level: Option<&str>) -> String {
    let level = level
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LEVEL)
        .to_lowercase();
    format!("dualmomentum={level},warn")
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for command output. Calling this twice is harmless.
pub fn init_logging(level: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}
