pub mod config;
pub mod error;

pub use config::{Config, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Install the global tracing subscriber.
///
/// Logs go to stderr so they never interleave with rendered views on stdout.
/// The filter defaults to `info` and honours `RUST_LOG`.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Weathlytics core initialized");
    Ok(())
}
