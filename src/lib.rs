//! Filtered M3U playlists from Xtream Codes and Stalker IPTV portals.
//!
//! ```rust,ignore
//! let config = Config::from_env();
//! let creds = Credentials::from_json(&std::fs::read_to_string(&config.credentials_path)?)?;
//! let text = PlaylistGenerator::new(&config)?.generate(&creds).await?;
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{FetchError, PortalError};
pub use models::{Category, Channel, ChannelGroup, Credentials};
pub use services::filter::CategoryFilter;
pub use services::pipeline::{ChannelSource, PlaylistGenerator};
pub use services::playlist::{parse_playlist, render};
pub use services::probe::{detect_protocol, Discovery, Protocol};
