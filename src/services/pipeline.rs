//! Credentials -> probe -> client -> filter -> playlist

use reqwest::Client;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::PortalError;
use crate::models::{ChannelGroup, Credentials};
use crate::services::filter::CategoryFilter;
use crate::services::http::build_client;
use crate::services::playlist;
use crate::services::probe::{detect_protocol, probe_xtream};
use crate::services::stalker::StalkerClient;
use crate::services::xtream::XtreamClient;

/// A portal protocol able to list its filtered live channels
#[allow(async_fn_in_trait)]
pub trait ChannelSource {
    async fn fetch_channels(&self, filter: &CategoryFilter)
        -> Result<Vec<ChannelGroup>, PortalError>;
}

/// Runs one full playlist build per call; holds no per-run state
pub struct PlaylistGenerator {
    http: Client,
    probe_http: Client,
    filter: CategoryFilter,
    user_agent: String,
    stream_concurrency: usize,
    verify_xtream: bool,
}

impl PlaylistGenerator {
    pub fn new(config: &Config) -> Result<Self, PortalError> {
        Ok(Self {
            http: build_client(config.fetch_timeout())?,
            probe_http: build_client(config.probe_timeout())?,
            filter: CategoryFilter::new(
                config.allowed_groups.iter().cloned(),
                config.group_prefix.clone(),
            ),
            user_agent: config.user_agent.clone(),
            stream_concurrency: config.stream_concurrency,
            verify_xtream: config.verify_xtream,
        })
    }

    /// Fetch and filter channels, grouped by category
    pub async fn fetch_groups(&self, creds: &Credentials) -> Result<Vec<ChannelGroup>, PortalError> {
        let protocol = detect_protocol(creds);
        info!("Using {} protocol for {}", protocol, creds.host());

        match creds {
            Credentials::Xtream(xtream) => {
                if self.verify_xtream
                    && !probe_xtream(&self.probe_http, xtream, &self.user_agent).await
                {
                    return Err(PortalError::PortalNotFound {
                        host: xtream.host.clone(),
                        attempted: 1,
                    });
                }

                let client = XtreamClient::new(self.http.clone(), xtream.clone(), &self.user_agent)
                    .with_concurrency(self.stream_concurrency);
                client.fetch_channels(&self.filter).await
            }
            Credentials::Stalker(stalker) => {
                let client =
                    StalkerClient::new(self.http.clone(), self.probe_http.clone(), stalker.clone());
                client.fetch_channels(&self.filter).await
            }
        }
    }

    /// Full run: returns the rendered playlist text
    pub async fn generate(&self, creds: &Credentials) -> Result<String, PortalError> {
        let groups = self.fetch_groups(creds).await?;
        let channels: usize = groups.iter().map(|g| g.channels.len()).sum();

        let text = playlist::render(&groups).map_err(|e| {
            warn!("Nothing to write for {}", creds.host());
            e
        })?;

        info!(
            "Playlist ready: {} channels in {} categories",
            channels,
            groups.len()
        );
        Ok(text)
    }
}
