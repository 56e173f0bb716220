use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal_playlist::services::playlist;
use portal_playlist::{Config, Credentials, PlaylistGenerator, PortalError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal_playlist=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting portal-playlist v{}", env!("CARGO_PKG_VERSION"));

    let raw = tokio::fs::read_to_string(&config.credentials_path)
        .await
        .with_context(|| format!("Failed to read credentials from {}", config.credentials_path))?;
    let creds = Credentials::from_json(&raw).context("Unusable credentials record")?;

    let generator = PlaylistGenerator::new(&config)?;
    let text = match generator.generate(&creds).await {
        Ok(text) => text,
        Err(PortalError::EmptyResult) if config.allow_empty_playlist => {
            tracing::warn!("No channels matched; writing an empty playlist");
            format!("{}\n", playlist::HEADER)
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Playlist generation failed for {}", creds.host()))
        }
    };

    tokio::fs::write(&config.output_path, text)
        .await
        .with_context(|| format!("Failed to write playlist to {}", config.output_path))?;
    tracing::info!("Playlist written to {}", config.output_path);

    Ok(())
}
