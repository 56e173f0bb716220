pub mod filter;
pub mod http;
pub mod pipeline;
pub mod playlist;
pub mod probe;
pub mod stalker;
pub mod xtream;
