pub mod config;
pub mod models;
pub mod pipeline;
pub mod profile;
pub mod session_log;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr. Stdout carries only the advice.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
