use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Whether log lines carry ANSI colors, off when `NO_COLOR` is set
pub fn ansi_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `log_level`; an unparsable level falls back to
/// `info`. Output goes to stderr so reports on stdout stay machine readable.
pub fn init_tracing(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi_enabled())
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
