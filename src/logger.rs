use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Reads `RUST_LOG` for filtering and defaults to `info` for this crate.
/// Calling it twice is harmless (the second call is ignored), which keeps
/// tests that each set up logging from panicking.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fragenkatalog=info,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
