use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to the csvgate
/// crates only. Stdout is left for rendered output.
pub fn init(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn default_directive(level: &str) -> String {
    format!("csvgate={level},csvgate_core={level},csvgate_cli={level}")
}
