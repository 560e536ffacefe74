use tracing_subscriber::EnvFilter;

/// Install the global stderr subscriber. Level defaults to `info`;
/// override with `STORYSYNC_LOG` (env-filter syntax).
pub fn init() {
    let filter = EnvFilter::try_from_env("STORYSYNC_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
