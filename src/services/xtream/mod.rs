//! Xtream Codes Integration
//!
//! Live-channel retrieval through the Xtream Player API:
//!
//! ```text
//! GET {host}/player_api.php?username=X&password=Y&action=get_live_categories
//! GET {host}/player_api.php?username=X&password=Y&action=get_live_streams&category_id=N
//! ```
//!
//! Play URLs are synthesized as `{host}/live/{username}/{password}/{stream_id}.m3u8`.

pub mod client;
pub mod types;

pub use client::XtreamClient;
pub use types::{XtreamCategory, XtreamLiveStream};
