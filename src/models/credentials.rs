//! Portal credentials
//!
//! A credentials record arrives as loose JSON written by the intake service.
//! [`Credentials::from_value`] turns it into exactly one typed variant.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

use crate::error::PortalError;

lazy_static! {
    static ref MAC_REGEX: Regex = Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").unwrap();
}

/// Username/password credentials for an Xtream Codes server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XtreamCredentials {
    /// Server base URL (e.g., "http://example.com:8080")
    pub host: String,
    pub username: String,
    pub password: String,
}

impl XtreamCredentials {
    /// Build the player_api.php base URL
    pub fn api_url(&self) -> String {
        format!(
            "{}/player_api.php?username={}&password={}",
            self.host,
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password)
        )
    }

    /// Build playback URL for a live stream
    pub fn live_url(&self, stream_id: &str) -> String {
        format!(
            "{}/live/{}/{}/{}.m3u8",
            self.host, self.username, self.password, stream_id
        )
    }

    /// Extract credentials from an Xtream M3U URL
    ///
    /// Supported URL patterns:
    /// - `http://server:port/get.php?username=X&password=Y&...`
    /// - `http://server:port/get.php?username=X&password=Y&type=m3u_plus&output=ts`
    pub fn from_m3u_url(m3u_url: &str) -> Option<Self> {
        let parsed = match Url::parse(m3u_url) {
            Ok(url) => url,
            Err(e) => {
                debug!("Failed to parse URL: {}", e);
                return None;
            }
        };

        let path = parsed.path().to_lowercase();
        if !path.contains("/get.php") {
            debug!("URL path does not contain /get.php: {}", path);
            return None;
        }

        let params: HashMap<_, _> = parsed.query_pairs().collect();
        let username = params.get("username")?.to_string();
        let password = params.get("password")?.to_string();

        if username.is_empty() || password.is_empty() {
            debug!("Empty username or password in URL");
            return None;
        }

        let host = parsed.host_str()?;
        let port_suffix = parsed
            .port()
            .map(|p| format!(":{}", p))
            .unwrap_or_default();

        Some(Self {
            host: format!("{}://{}{}", parsed.scheme(), host, port_suffix),
            username,
            password,
        })
    }
}

/// Device credentials for a Stalker middleware portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalkerCredentials {
    pub host: String,
    /// Upper-case, colon separated (e.g., "00:1A:79:12:34:56")
    pub mac_address: String,
}

/// One run's credentials; exactly one scheme is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Xtream(XtreamCredentials),
    Stalker(StalkerCredentials),
}

/// Loose on-disk shape written by the intake service
#[derive(Debug, Default, Deserialize)]
struct RawCredentials {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default, alias = "macAddress", alias = "mac")]
    mac_address: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Credentials {
    /// Parse a credentials record from JSON text
    pub fn from_json(text: &str) -> Result<Self, PortalError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| PortalError::InvalidCredentials(format!("not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Resolve a decoded record into exactly one credentials variant
    pub fn from_value(value: serde_json::Value) -> Result<Self, PortalError> {
        let raw: RawCredentials = serde_json::from_value(value)
            .map_err(|e| PortalError::InvalidCredentials(e.to_string()))?;

        let username = non_empty(raw.username);
        let password = non_empty(raw.password);
        let mac = non_empty(raw.mac_address);
        let has_login = username.is_some() && password.is_some();

        if has_login && mac.is_some() {
            return Err(PortalError::InvalidCredentials(
                "record carries both username/password and mac_address".to_string(),
            ));
        }

        if let (Some(username), Some(password)) = (username, password) {
            let host = normalize_host(raw.host.as_deref())?;
            return Ok(Credentials::Xtream(XtreamCredentials {
                host,
                username,
                password,
            }));
        }

        if let Some(mac) = mac {
            let host = normalize_host(raw.host.as_deref())?;
            return Ok(Credentials::Stalker(StalkerCredentials {
                host,
                mac_address: normalize_mac(&mac)?,
            }));
        }

        if let Some(url) = non_empty(raw.url) {
            return XtreamCredentials::from_m3u_url(&url)
                .map(Credentials::Xtream)
                .ok_or_else(|| {
                    PortalError::InvalidCredentials(format!(
                        "url is not an Xtream get.php link: {}",
                        url
                    ))
                });
        }

        Err(PortalError::InvalidCredentials(
            "expected username/password or mac_address".to_string(),
        ))
    }

    pub fn host(&self) -> &str {
        match self {
            Credentials::Xtream(c) => &c.host,
            Credentials::Stalker(c) => &c.host,
        }
    }
}

/// Normalize a portal host into a base URL without trailing slash
pub fn normalize_host(host: Option<&str>) -> Result<String, PortalError> {
    let host = host.map(str::trim).unwrap_or_default();
    if host.is_empty() {
        return Err(PortalError::InvalidCredentials("missing host".to_string()));
    }

    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let normalized = with_scheme.trim_end_matches('/').to_string();

    match Url::parse(&normalized) {
        Ok(url) if url.host_str().is_some() => Ok(normalized),
        _ => Err(PortalError::InvalidCredentials(format!(
            "host is not a valid URL: {}",
            host
        ))),
    }
}

fn normalize_mac(mac: &str) -> Result<String, PortalError> {
    if !MAC_REGEX.is_match(mac) {
        return Err(PortalError::InvalidCredentials(format!(
            "malformed MAC address: {}",
            mac
        )));
    }
    Ok(mac.replace('-', ":").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_xtream_record() {
        let creds = Credentials::from_value(json!({
            "host": "http://example.com:8080/",
            "username": "user",
            "password": "pass"
        }))
        .unwrap();

        assert_eq!(
            creds,
            Credentials::Xtream(XtreamCredentials {
                host: "http://example.com:8080".to_string(),
                username: "user".to_string(),
                password: "pass".to_string(),
            })
        );
    }

    #[test]
    fn test_stalker_record_normalizes_mac() {
        let creds = Credentials::from_value(json!({
            "host": "portal.example.com",
            "mac_address": "00-1a-79-ab-cd-ef"
        }))
        .unwrap();

        assert_eq!(
            creds,
            Credentials::Stalker(StalkerCredentials {
                host: "http://portal.example.com".to_string(),
                mac_address: "00:1A:79:AB:CD:EF".to_string(),
            })
        );
    }

    #[test]
    fn test_mac_aliases() {
        let creds = Credentials::from_json(
            r#"{"host": "http://p.example.com", "macAddress": "00:1A:79:00:00:01"}"#,
        )
        .unwrap();
        assert!(matches!(creds, Credentials::Stalker(_)));
    }

    #[test]
    fn test_url_record() {
        let creds = Credentials::from_value(json!({
            "url": "http://example.com:8080/get.php?username=testuser&password=testpass&type=m3u_plus&output=ts"
        }))
        .unwrap();

        match creds {
            Credentials::Xtream(c) => {
                assert_eq!(c.host, "http://example.com:8080");
                assert_eq!(c.username, "testuser");
                assert_eq!(c.password, "testpass");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_ambiguous_and_empty_records() {
        let both = Credentials::from_value(json!({
            "host": "http://example.com",
            "username": "u",
            "password": "p",
            "mac_address": "00:1A:79:00:00:01"
        }));
        assert!(matches!(both, Err(PortalError::InvalidCredentials(_))));

        let neither = Credentials::from_value(json!({"host": "http://example.com"}));
        assert!(matches!(neither, Err(PortalError::InvalidCredentials(_))));

        // Password alone is not a login
        let half = Credentials::from_value(json!({"host": "http://example.com", "password": "p"}));
        assert!(matches!(half, Err(PortalError::InvalidCredentials(_))));
    }

    #[test]
    fn test_rejects_bad_host_and_mac() {
        let no_host = Credentials::from_value(json!({"username": "u", "password": "p"}));
        assert!(matches!(no_host, Err(PortalError::InvalidCredentials(_))));

        let bad_mac = Credentials::from_value(json!({
            "host": "http://example.com",
            "mac_address": "not-a-mac"
        }));
        assert!(matches!(bad_mac, Err(PortalError::InvalidCredentials(_))));
    }

    #[test]
    fn test_m3u_url_not_xtream() {
        assert!(XtreamCredentials::from_m3u_url("http://example.com/playlist.m3u").is_none());
        assert!(XtreamCredentials::from_m3u_url("http://example.com/get.php?username=user").is_none());
    }

    #[test]
    fn test_url_builders() {
        let creds = XtreamCredentials {
            host: "http://example.com:8080".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
        };

        assert_eq!(
            creds.api_url(),
            "http://example.com:8080/player_api.php?username=user&password=pass"
        );
        assert_eq!(
            creds.live_url("123"),
            "http://example.com:8080/live/user/pass/123.m3u8"
        );
    }
}
