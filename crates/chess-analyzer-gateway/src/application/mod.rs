//! Application layer for chess-analyzer-gateway.
//!
//! Pure routing rules shared by the server and the proxy.  Nothing here
//! touches a socket, so every rule is unit-tested without a listener.

pub mod routing;

pub use routing::{api_remainder, is_hop_by_hop, upstream_url, API_PREFIX, STATIC_PREFIX};
