//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::{BillingError, BillingResult};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,marbleops=debug";

/// Initializes logging with the default filter.
///
/// ## Log Levels
/// - Default: INFO for dependencies, DEBUG for marbleops crates
/// - Override with `RUST_LOG` environment variable
pub fn init_tracing() -> BillingResult<()> {
    init_tracing_with(DEFAULT_LOG_FILTER)
}

/// Initializes logging, falling back to `default_filter` when `RUST_LOG` is unset.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing_with(default_filter: &str) -> BillingResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| BillingError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Only one global subscriber per process; the first call may race
        // with other tests, so only the second is asserted.
        let _ = init_tracing();
        assert!(matches!(init_tracing(), Err(BillingError::Logging(_))));
    }
}
