//! Xtream Codes API Types
//!
//! Only the live-category and live-stream payloads are modelled. Servers
//! disagree on whether ids are JSON strings or numbers, so both are accepted.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{Category, Channel, XtreamCredentials, UNKNOWN};

/// Accept a string, a number or null and keep it as an optional string
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(D::Error::custom("expected string, number, or null")),
    }
}

/// Keep a string; anything else (bool, object, number) becomes `None`
pub(crate) fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s)),
        _ => Ok(None),
    }
}

// ============================================================================
// Category Types
// ============================================================================

/// Live category from `get_live_categories`
#[derive(Debug, Deserialize, Clone)]
pub struct XtreamCategory {
    #[serde(default, deserialize_with = "string_or_number")]
    pub category_id: Option<String>,
    #[serde(default, alias = "name")]
    pub category_name: Option<String>,
}

impl XtreamCategory {
    pub fn into_category(self) -> Category {
        Category {
            id: self.category_id.unwrap_or_default(),
            name: self.category_name.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

// ============================================================================
// Live Stream Types
// ============================================================================

/// Live stream (channel) from `get_live_streams`
#[derive(Debug, Deserialize, Clone)]
pub struct XtreamLiveStream {
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub stream_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub stream_icon: Option<String>,
}

impl XtreamLiveStream {
    /// Convert to a channel with a synthesized play URL
    pub fn into_channel(self, creds: &XtreamCredentials, category: &str) -> Channel {
        let play_url = creds.live_url(self.stream_id.as_deref().unwrap_or("unknown"));
        Channel {
            name: self.name.unwrap_or_else(|| UNKNOWN.to_string()),
            stream_id: self.stream_id,
            icon_url: self.stream_icon,
            play_url,
            category_name: category.to_string(),
        }
    }
}
