//! Log subscriber setup for hosts that do not install their own.

use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install a fmt subscriber. `filter` takes precedence over `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(filter: Option<&str>) -> bool {
    let mut rejected = None;
    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|e| {
            rejected = Some(e.to_string());
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let installed = fmt().with_env_filter(env_filter).try_init().is_ok();
    if let Some(reason) = rejected {
        warn!(%reason, "invalid log filter, using {}", DEFAULT_FILTER);
    }
    installed
}
