use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber used by every binary in the
/// workspace. The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
