use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Files
    pub credentials_path: String,
    pub output_path: String,

    // Filtering
    pub allowed_groups: Vec<String>,
    pub group_prefix: Option<String>,

    // Network
    pub fetch_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub stream_concurrency: usize,
    pub verify_xtream: bool,

    // Output
    pub allow_empty_playlist: bool,

    // Misc
    pub user_agent: String,
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Files
            credentials_path: env::var("CREDENTIALS_PATH")
                .unwrap_or_else(|_| "xtream_login.json".to_string()),
            output_path: env::var("OUTPUT_PATH")
                .unwrap_or_else(|_| "filtered_playlist.m3u".to_string()),

            // Filtering
            allowed_groups: parse_list(
                &env::var("ALLOWED_GROUPS")
                    .unwrap_or_else(|_| "INDIA,INDIAN,TELUGU,CRICKET".to_string()),
            ),
            group_prefix: Some(env::var("GROUP_PREFIX").unwrap_or_else(|_| "IN|".to_string()))
                .filter(|p| !p.is_empty()),

            // Network
            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap_or(10_000), // 10 seconds

            probe_timeout_ms: env::var("PROBE_TIMEOUT_MS")
                .unwrap_or_else(|_| "6000".to_string())
                .parse()
                .unwrap_or(6_000),

            stream_concurrency: env::var("STREAM_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .unwrap_or(4)
                .max(1),

            verify_xtream: env::var("VERIFY_XTREAM")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),

            // Output
            allow_empty_playlist: env::var("ALLOW_EMPTY_PLAYLIST")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),

            // Misc - Use VLC user agent to avoid IPTV server blocks
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "VLC/3.0.20 LibVLC/3.0.20".to_string()),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for Config {
    /// Built-in defaults, ignoring the environment
    fn default() -> Self {
        Self {
            credentials_path: "xtream_login.json".to_string(),
            output_path: "filtered_playlist.m3u".to_string(),
            allowed_groups: parse_list("INDIA,INDIAN,TELUGU,CRICKET"),
            group_prefix: Some("IN|".to_string()),
            fetch_timeout_ms: 10_000,
            probe_timeout_ms: 6_000,
            stream_concurrency: 4,
            verify_xtream: false,
            allow_empty_playlist: false,
            user_agent: "VLC/3.0.20 LibVLC/3.0.20".to_string(),
        }
    }
}
