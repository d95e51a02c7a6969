//! Peer Transport Module
//!
//! Everything a node needs to talk to the other nodes of the cache.
//!
//! ## Core Concepts
//! - **Picking**: `PeerPicker` maps a key to the client of the peer that owns it, or to
//!   nothing when this node is the owner (or knows no peers).
//! - **Fetching**: `PeerGetter` fetches `(group, key)` from one remote peer.
//! - **HTTP implementation**: `HttpPool` is both the picker (hash ring + one `HttpGetter` per
//!   peer) and the axum server answering other nodes' fetches.
//!
//! ## Submodules
//! - **`protocol`**: Path layout, base path handling and constants of the wire format.
//! - **`client`**: `HttpGetter`, the reqwest-based fetcher bound to a single peer.
//! - **`pool`**: `HttpPool`, membership-aware picker and router factory.
//! - **`handlers`**: axum handlers for the peer endpoint.
//! - **`error`**: Client and server error types.

pub mod client;
pub mod error;
pub mod handlers;
pub mod pool;
pub mod protocol;

pub use client::HttpGetter;
pub use error::{PeerError, ServeError};
pub use pool::HttpPool;

use async_trait::async_trait;
use std::sync::Arc;

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the owner's client, or `None` if the key should be served
    /// locally.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Client side of a single remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    /// Fetches the raw bytes of `key` in `group` from the peer.
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>, PeerError>;
}
