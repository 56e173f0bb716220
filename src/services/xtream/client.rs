//! Xtream Codes API Client
//!
//! Stateless: every request carries the credentials in the query string.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::{debug, error, info, warn};

use super::types::{XtreamCategory, XtreamLiveStream};
use crate::error::{FetchError, PortalError};
use crate::models::{Category, ChannelGroup, XtreamCredentials};
use crate::services::filter::CategoryFilter;
use crate::services::http::{fetch_text, parse_json};
use crate::services::pipeline::ChannelSource;

pub struct XtreamClient {
    http: Client,
    creds: XtreamCredentials,
    user_agent: String,
    /// Upper bound on in-flight per-category requests
    concurrency: usize,
}

impl XtreamClient {
    pub fn new(http: Client, creds: XtreamCredentials, user_agent: &str) -> Self {
        Self {
            http,
            creds,
            user_agent: user_agent.to_string(),
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    async fn get(&self, action: &str) -> Result<String, FetchError> {
        let url = format!("{}&action={}", self.creds.api_url(), action);
        debug!("Xtream API request: {}", action);

        fetch_text(self.http.get(&url).header("User-Agent", &self.user_agent)).await
    }

    /// Get live stream categories
    pub async fn get_live_categories(&self) -> Result<Vec<Category>, PortalError> {
        let text = self
            .get("get_live_categories")
            .await
            .map_err(|source| PortalError::Upstream {
                what: "category list",
                source,
            })?;

        let categories: Vec<XtreamCategory> =
            parse_json(&text).map_err(|source| PortalError::Protocol {
                what: "category list",
                source,
            })?;

        Ok(categories
            .into_iter()
            .map(XtreamCategory::into_category)
            .collect())
    }

    /// Get live streams by category
    pub async fn get_live_streams(
        &self,
        category_id: &str,
    ) -> Result<Vec<XtreamLiveStream>, FetchError> {
        let action = format!(
            "get_live_streams&category_id={}",
            urlencoding::encode(category_id)
        );
        let text = self.get(&action).await?;

        // Some servers return "null" or an empty body for empty categories
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(Vec::new());
        }

        parse_json(&text).map_err(|e| {
            error!(
                "Failed to parse Xtream streams for category '{}': {}",
                category_id, e
            );
            FetchError::Parse(e.to_string())
        })
    }
}

impl ChannelSource for XtreamClient {
    async fn fetch_channels(
        &self,
        filter: &CategoryFilter,
    ) -> Result<Vec<ChannelGroup>, PortalError> {
        let categories = self.get_live_categories().await?;
        let total = categories.len();

        // An empty category_id makes the server return its whole catalog
        let kept: Vec<Category> = categories
            .into_iter()
            .filter(|c| filter.keep(&c.name))
            .filter(|c| {
                if c.id.is_empty() {
                    warn!("Skipping category '{}': no category_id", c.name);
                }
                !c.id.is_empty()
            })
            .collect();

        info!(
            "Xtream categories: {} listed, {} kept at {}",
            total,
            kept.len(),
            self.creds.host
        );

        // `buffered` yields in input order regardless of completion order
        let results: Vec<_> = stream::iter(kept)
            .map(move |category| async move {
                let streams = self.get_live_streams(&category.id).await;
                (category, streams)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut groups = Vec::new();
        for (category, streams) in results {
            match streams {
                Ok(streams) if streams.is_empty() => {
                    debug!("Category '{}' has no streams", category.name);
                }
                Ok(streams) => {
                    let mut group = ChannelGroup::new(category.name.clone());
                    group.channels = streams
                        .into_iter()
                        .map(|s| s.into_channel(&self.creds, &category.name))
                        .collect();
                    groups.push(group);
                }
                Err(e) => {
                    warn!(
                        "Skipping category '{}' (id {}): {}",
                        category.name, category.id, e
                    );
                }
            }
        }

        Ok(groups)
    }
}
