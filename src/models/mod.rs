pub mod credentials;
pub mod playlist;

pub use credentials::{normalize_host, Credentials, StalkerCredentials, XtreamCredentials};
pub use playlist::{group_by_category, Category, Channel, ChannelGroup, UNKNOWN};
