//! Portrait transform service binary.

use dotenvy::dotenv;
use portrait_transform::{server, TransformConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }

    let config = TransformConfig::from_env()?;
    info!(
        model = %config.model,
        api_key_configured = config.has_api_key(),
        "starting portrait-transform"
    );

    server::serve(config).await
}
