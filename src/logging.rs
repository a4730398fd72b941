//! Logging setup for the CLI.
//!
//! `RUST_LOG` (from the process or the `.env` file) selects the filter;
//! without it only `info` and above are shown.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Installs the global subscriber. Only the first call has any effect.
pub fn init(filter: Option<&str>) {
    INIT.call_once(|| {
        let filter = filter
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
