use tracing_subscriber::EnvFilter;

/// `RUST_LOG` controls verbosity; defaults to `info`. Logs go to stderr so `render` output stays
/// clean on stdout.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
