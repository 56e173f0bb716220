//! Portal protocol detection
//!
//! The credential shape decides the protocol. The network is only touched to
//! confirm an Xtream API or to find which base path a Stalker portal lives
//! under.

use reqwest::Client;
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::{Credentials, XtreamCredentials};
use crate::services::http::fetch_text;
use crate::services::stalker::{PortalEndpoint, StalkerClient};

/// Stalker base paths, tried in order
pub const BASE_PATH_CANDIDATES: [&str; 4] = ["", "/c", "/portal", "/stalker_portal"];

/// Field present in every authenticated player_api.php response
const XTREAM_MARKER: &str = "user_info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Xtream,
    Stalker,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Xtream => write!(f, "xtream"),
            Protocol::Stalker => write!(f, "stalker"),
        }
    }
}

/// Shape-based dispatch, never issues a request
pub fn detect_protocol(creds: &Credentials) -> Protocol {
    match creds {
        Credentials::Xtream(_) => Protocol::Xtream,
        Credentials::Stalker(_) => Protocol::Stalker,
    }
}

/// Content-sniff `player_api.php` to confirm an Xtream server
///
/// Any failure means "not Xtream"; this never errors.
pub async fn probe_xtream(http: &Client, creds: &XtreamCredentials, user_agent: &str) -> bool {
    let request = http.get(creds.api_url()).header("User-Agent", user_agent);

    match fetch_text(request).await {
        Ok(body) if body.contains(XTREAM_MARKER) => {
            info!("Confirmed Xtream API at {}", creds.host);
            true
        }
        Ok(_) => {
            warn!("{} answered without {}, not an Xtream API", creds.host, XTREAM_MARKER);
            false
        }
        Err(e) => {
            warn!("Xtream probe of {} failed: {}", creds.host, e);
            false
        }
    }
}

/// Outcome of the Stalker base-path search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Found(PortalEndpoint),
    /// `answered` counts candidates that produced any HTTP response
    Exhausted { attempted: usize, answered: usize },
}

/// Linear search over [`BASE_PATH_CANDIDATES`]; first token wins
pub async fn discover_stalker_portal(client: &StalkerClient) -> Discovery {
    let mut answered = 0;

    for base_path in BASE_PATH_CANDIDATES {
        match client.handshake_at(base_path).await {
            Ok(Some(token)) => {
                return Discovery::Found(PortalEndpoint {
                    base_path: base_path.to_string(),
                    auth_token: token,
                });
            }
            Ok(None) => {
                answered += 1;
                debug!("No token from {}{}", client.host(), base_path);
            }
            Err(FetchError::Network(e)) => {
                debug!("Handshake at {}{} unreachable: {}", client.host(), base_path, e);
            }
            Err(e) => {
                answered += 1;
                debug!("Handshake at {}{} failed: {}", client.host(), base_path, e);
            }
        }
    }

    warn!(
        "Stalker handshake exhausted {} base paths at {}",
        BASE_PATH_CANDIDATES.len(),
        client.host()
    );
    Discovery::Exhausted {
        attempted: BASE_PATH_CANDIDATES.len(),
        answered,
    }
}
