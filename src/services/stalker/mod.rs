//! Stalker Middleware Integration
//!
//! Stateful portal API used by MAG set-top boxes:
//!
//! ```text
//! GET {host}{base}/server/load.php?type=stb&action=handshake&JsHttpRequest=1-xml
//! GET {host}{base}/server/load.php?type=itv&action=get_all_channels&JsHttpRequest=1-xml
//! ```
//!
//! The handshake yields a bearer token; `{base}` is discovered by the probe.

pub mod client;
pub mod types;

pub use client::{StalkerClient, StalkerSession};
pub use types::{PortalEndpoint, StalkerChannel};
