//! Structured logging setup.
//!
//! The library only emits `tracing` events; binaries install a subscriber
//! once at startup. `RUST_LOG` overrides the configured filter.
//!
//! ```rust,no_run
//! use algoviz::config::LoggingConfig;
//!
//! algoviz::logging::init(&LoggingConfig::default()).ok();
//! tracing::info!("started");
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{VizError, VizResult};

/// Parse one `EnvFilter` directive string.
///
/// # Errors
///
/// Returns a `Config` error for a malformed directive.
pub fn parse_filter(directive: &str) -> VizResult<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| VizError::config(format!("Invalid log filter '{directive}': {e}")))
}

/// Filter from `RUST_LOG`, falling back to `default`.
///
/// # Errors
///
/// Returns a `Config` error if the fallback directive is malformed.
pub fn env_or(default: &str) -> VizResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| parse_filter(default))
}

/// Install the global subscriber.
///
/// Logs go to `config.file` when set (the terminal front end needs this,
/// stderr output would land on its alternate screen), otherwise to stderr.
///
/// # Errors
///
/// Returns an error if the filter is malformed, the log file cannot be
/// opened, or a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> VizResult<()> {
    let filter = env_or(&config.filter)?;

    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = config
        .file
        .is_none()
        .then(|| fmt::layer().with_target(true).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| VizError::config(format!("Logging already initialised: {e}")))
}

/// Route logs to the test harness. Quiet unless `RUST_LOG` is set.
pub fn init_test() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_test_writer())
                .try_init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_accepts_directives() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("algoviz=debug,warn").is_ok());
    }

    #[test]
    fn test_parse_filter_rejects_garbage() {
        let err = parse_filter("algoviz=loud").unwrap_err();
        assert!(matches!(err, VizError::Config { .. }));
    }

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::debug!("still fine");
    }
}
