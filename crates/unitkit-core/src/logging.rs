#![forbid(unsafe_code)]

//! Logging helpers.
//!
//! With the `tracing` feature enabled the usual macros are re-exported from
//! here so widget crates can write `unitkit_core::debug!(..)`. The
//! `tracing-subscriber` feature adds [`init`], which installs a formatted
//! subscriber filtered by `RUST_LOG` (falling back to the given directive).

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace, trace_span, warn};

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,unitkit_widgets=info";

/// Errors from installing the global subscriber.
#[derive(Debug)]
pub enum LoggingError {
    /// The filter directive could not be parsed.
    #[cfg(feature = "tracing-subscriber")]
    Filter(tracing_subscriber::filter::ParseError),
    /// A global subscriber was already installed.
    AlreadyInitialized,
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "tracing-subscriber")]
            Self::Filter(e) => write!(f, "invalid log filter: {e}"),
            Self::AlreadyInitialized => write!(f, "global subscriber already installed"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "tracing-subscriber")]
            Self::Filter(e) => Some(e),
            Self::AlreadyInitialized => None,
        }
    }
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins over `fallback` when set. Calling this twice returns
/// [`LoggingError::AlreadyInitialized`].
#[cfg(feature = "tracing-subscriber")]
pub fn init(fallback: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback).map_err(LoggingError::Filter)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}
