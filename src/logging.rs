use tracing_subscriber::{fmt, EnvFilter};

/// Initializes console logging on stderr; `RUST_LOG` overrides the default
/// `info` level. Stdout is left to the enrollment table.
pub fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
