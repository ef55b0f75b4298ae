//! Logging initialization.
//!
//! Hosts call [`init_logging`] once at startup; `RUST_LOG` controls filtering
//! at runtime (`RUST_LOG=quarry=debug` for detailed indexing logs). Safe to
//! call more than once — only the first call takes effect, which keeps tests
//! that each try to initialize from panicking.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber with env-filter support.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    });
}
