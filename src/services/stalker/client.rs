//! Stalker middleware client
//!
//! The client starts unauthenticated. [`StalkerClient::authenticate`] walks the
//! base-path candidates and returns a [`StalkerSession`] holding the token, so
//! the token is only ever reachable through the session value.

use reqwest::{Client, RequestBuilder};
use tracing::{debug, info};

use super::types::{ChannelList, Envelope, HandshakeData, PortalEndpoint, StalkerChannel};
use crate::error::{FetchError, PortalError};
use crate::models::{group_by_category, ChannelGroup, StalkerCredentials};
use crate::services::filter::CategoryFilter;
use crate::services::http::{fetch_text, parse_json};
use crate::services::pipeline::ChannelSource;
use crate::services::probe::{discover_stalker_portal, Discovery};

const MAG_USER_AGENT: &str = "Mozilla/5.0 (QtEmbedded; U; Linux; C) AppleWebKit/533.3 (KHTML, like Gecko) MAG200 stbapp ver: 2 rev: 250 Safari/533.3";
const MAG_X_USER_AGENT: &str = "Model: MAG250; Link: WiFi";

pub struct StalkerClient {
    /// Used for the authenticated channel fetch
    http: Client,
    /// Short-timeout client for handshakes
    probe_http: Client,
    creds: StalkerCredentials,
}

impl StalkerClient {
    pub fn new(http: Client, probe_http: Client, creds: StalkerCredentials) -> Self {
        Self {
            http,
            probe_http,
            creds,
        }
    }

    pub fn host(&self) -> &str {
        &self.creds.host
    }

    fn load_url(&self, base_path: &str, query: &str) -> String {
        format!("{}{}/server/load.php?{}", self.creds.host, base_path, query)
    }

    /// Fixed device identification carried by every request
    fn with_device_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("User-Agent", MAG_USER_AGENT)
            .header("X-User-Agent", MAG_X_USER_AGENT)
            .header("Referer", &self.creds.host)
            .header(
                "Cookie",
                format!(
                    "mac={}; stb_lang=en; timezone=Europe/London",
                    urlencoding::encode(&self.creds.mac_address)
                ),
            )
    }

    /// Attempt a handshake under one base path
    ///
    /// `Ok(None)` means the portal answered but issued no token.
    pub async fn handshake_at(&self, base_path: &str) -> Result<Option<String>, FetchError> {
        let url = self.load_url(base_path, "type=stb&action=handshake&JsHttpRequest=1-xml");
        debug!("Stalker handshake: {}", url);

        let text = fetch_text(self.with_device_headers(self.probe_http.get(&url))).await?;
        let envelope: Envelope<HandshakeData> =
            parse_json(&text).map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(envelope.js.token.filter(|t| !t.trim().is_empty()))
    }

    /// Unauthenticated -> Authenticated
    pub async fn authenticate(&self) -> Result<StalkerSession<'_>, PortalError> {
        match discover_stalker_portal(self).await {
            Discovery::Found(endpoint) => {
                info!(
                    "Stalker portal authenticated at {}{}",
                    self.creds.host,
                    if endpoint.base_path.is_empty() {
                        "/"
                    } else {
                        endpoint.base_path.as_str()
                    }
                );
                Ok(StalkerSession {
                    client: self,
                    endpoint,
                })
            }
            Discovery::Exhausted {
                attempted,
                answered: 0,
            } => Err(PortalError::PortalNotFound {
                host: self.creds.host.clone(),
                attempted,
            }),
            Discovery::Exhausted { attempted, .. } => Err(PortalError::Auth {
                host: self.creds.host.clone(),
                attempted,
            }),
        }
    }
}

/// An authenticated portal session
pub struct StalkerSession<'a> {
    client: &'a StalkerClient,
    endpoint: PortalEndpoint,
}

impl StalkerSession<'_> {
    /// Fetch the flattened channel list in one request
    pub async fn get_all_channels(&self) -> Result<Vec<StalkerChannel>, PortalError> {
        let upstream = |source: FetchError| PortalError::Upstream {
            what: "channel list",
            source,
        };

        let url = self.client.load_url(
            &self.endpoint.base_path,
            "type=itv&action=get_all_channels&JsHttpRequest=1-xml",
        );
        let request = self
            .client
            .with_device_headers(self.client.http.get(&url))
            .bearer_auth(&self.endpoint.auth_token);

        let text = fetch_text(request).await.map_err(upstream)?;
        let envelope: Envelope<ChannelList> =
            parse_json(&text).map_err(|e| upstream(FetchError::Parse(e.to_string())))?;

        Ok(envelope.js.data)
    }

    /// Authenticated -> Fetched; consumes the session
    pub async fn fetch_channels(
        self,
        filter: &CategoryFilter,
    ) -> Result<Vec<ChannelGroup>, PortalError> {
        let raw = self.get_all_channels().await?;
        let total = raw.len();

        let channels = raw.into_iter().filter_map(|c| {
            let name = c.name.clone();
            let channel = c.into_channel();
            if channel.is_none() {
                debug!("Dropping channel {:?} without play command", name);
            }
            channel
        });

        let groups: Vec<ChannelGroup> = group_by_category(channels)
            .into_iter()
            .filter(|g| filter.keep(&g.category))
            .collect();

        info!(
            "Stalker channels: {} listed, {} kept in {} categories",
            total,
            groups.iter().map(|g| g.channels.len()).sum::<usize>(),
            groups.len()
        );

        Ok(groups)
    }
}

impl ChannelSource for StalkerClient {
    async fn fetch_channels(
        &self,
        filter: &CategoryFilter,
    ) -> Result<Vec<ChannelGroup>, PortalError> {
        self.authenticate().await?.fetch_channels(filter).await
    }
}
