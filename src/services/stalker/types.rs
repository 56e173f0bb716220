//! Stalker portal payloads
//!
//! Every response is wrapped in a `{"js": ...}` envelope.

use serde::Deserialize;

use crate::models::{Channel, UNKNOWN};
use crate::services::xtream::types::string_or_number;

/// Winning base path plus the token it issued; lives for one run only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalEndpoint {
    /// One of the probe candidates, e.g. "" or "/stalker_portal"
    pub base_path: String,
    pub auth_token: String,
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub js: T,
}

#[derive(Debug, Deserialize)]
pub struct HandshakeData {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelList {
    pub data: Vec<StalkerChannel>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StalkerChannel {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tv_genre: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub cmd: Option<String>,
}

impl StalkerChannel {
    /// `None` when the portal gave no usable play command
    pub fn into_channel(self) -> Option<Channel> {
        let play_url = strip_player_prefix(self.cmd.as_deref()?.trim());
        if play_url.is_empty() {
            return None;
        }

        Some(Channel {
            name: self.name.unwrap_or_else(|| UNKNOWN.to_string()),
            stream_id: self.id,
            icon_url: self.logo.filter(|l| !l.trim().is_empty()),
            play_url: play_url.to_string(),
            category_name: self.tv_genre.unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }
}

/// Drop a leading player hint such as "ffmpeg " from a play command
pub fn strip_player_prefix(cmd: &str) -> &str {
    match cmd.split_once(char::is_whitespace) {
        Some((head, rest)) if !head.contains("://") => rest.trim_start(),
        _ => cmd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_player_prefix() {
        assert_eq!(strip_player_prefix("ffmpeg http://s/1.ts"), "http://s/1.ts");
        assert_eq!(strip_player_prefix("auto  http://s/1.ts"), "http://s/1.ts");
        assert_eq!(strip_player_prefix("http://u"), "http://u");
    }

    #[test]
    fn test_channel_defaults() {
        let raw: StalkerChannel =
            serde_json::from_str(r#"{"id": 9, "cmd": "ffmpeg http://s/9", "logo": ""}"#).unwrap();
        let channel = raw.into_channel().unwrap();

        assert_eq!(channel.name, UNKNOWN);
        assert_eq!(channel.category_name, UNKNOWN);
        assert_eq!(channel.stream_id.as_deref(), Some("9"));
        assert_eq!(channel.icon_url, None);
        assert_eq!(channel.play_url, "http://s/9");
    }

    #[test]
    fn test_channel_without_cmd_is_dropped() {
        let raw: StalkerChannel = serde_json::from_str(r#"{"name": "X", "cmd": " "}"#).unwrap();
        assert!(raw.into_channel().is_none());

        let raw: StalkerChannel = serde_json::from_str(r#"{"name": "X"}"#).unwrap();
        assert!(raw.into_channel().is_none());
    }

    #[test]
    fn test_envelope() {
        let env: Envelope<HandshakeData> =
            serde_json::from_str(r#"{"js": {"token": "abc", "random": "x"}}"#).unwrap();
        assert_eq!(env.js.token.as_deref(), Some("abc"));
    }
}
