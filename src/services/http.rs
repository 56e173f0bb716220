//! HTTP plumbing shared by the portal clients.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, PortalError};

/// Build a client with a fixed per-request timeout
pub fn build_client(timeout: Duration) -> Result<Client, PortalError> {
    Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(true) // Many IPTV servers have self-signed certs
        .build()
        .map_err(PortalError::Client)
}

/// Send a request and return the body of a 2xx response
pub async fn fetch_text(request: RequestBuilder) -> Result<String, FetchError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    Ok(response.text().await?)
}

/// Decode a JSON body, rejecting HTML error pages up front
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    if is_html(text) {
        warn!("Server returned HTML instead of JSON");
        debug!("HTML body: {}", preview(text));
        return Err(<serde_json::Error as serde::de::Error>::custom(
            "HTML page instead of JSON",
        ));
    }

    serde_json::from_str(text).map_err(|e| {
        debug!("Response text: {}", preview(text));
        e
    })
}

/// Some portals answer with an HTML page instead of JSON
pub fn is_html(text: &str) -> bool {
    text.trim_start().starts_with('<')
}

/// Truncate a body for logging
pub fn preview(text: &str) -> &str {
    let mut end = text.len().min(500);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_html() {
        assert!(is_html("  <html><body>Forbidden</body></html>"));
        assert!(!is_html("[{\"category_id\":\"1\"}]"));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(400);
        let p = preview(&text);
        assert!(p.len() <= 500);
        assert!(p.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_parse_json() {
        let v: Vec<u32> = parse_json("[1,2]").unwrap();
        assert_eq!(v, vec![1, 2]);
        assert!(parse_json::<Vec<u32>>("nope").is_err());
    }

    #[test]
    fn test_parse_json_rejects_html() {
        let err = parse_json::<serde_json::Value>("<html><body>Access denied</body></html>")
            .unwrap_err();
        assert!(err.to_string().contains("HTML"));
    }
}
