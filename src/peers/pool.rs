use std::collections::HashMap;
use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use parking_lot::RwLock;

use super::client::HttpGetter;
use super::error::PeerError;
use super::handlers::{handle_peer_get, handle_peer_query, handle_unexpected_path};
use super::protocol::normalize_peer_addr;
use super::{PeerGetter, PeerPicker};
use crate::config::PoolOptions;
use crate::group::GroupRegistry;
use crate::ring::HashRing;

struct PeerState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// A node's view of its peers, and the server side of the peer protocol.
///
/// Holds the hash ring and one [`HttpGetter`] per peer behind a single
/// read/write lock, so lookups never see a ring without its clients.
/// Membership changes swap both at once.
pub struct HttpPool {
    self_addr: String,
    options: PoolOptions,
    client: reqwest::Client,
    state: RwLock<PeerState>,
}

impl HttpPool {
    /// `self_addr` is this node's own peer address, in the same form that is
    /// passed to [`HttpPool::set_peers`].
    pub fn new(self_addr: impl Into<String>, options: PoolOptions) -> Result<Arc<Self>, PeerError> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(PeerError::Client)?;

        let ring = HashRing::with_hasher(options.replicas, options.hash.clone());

        Ok(Arc::new(Self {
            self_addr: normalize_peer_addr(&self_addr.into()),
            options,
            client,
            state: RwLock::new(PeerState {
                ring,
                getters: HashMap::new(),
            }),
        }))
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.options.base_path
    }

    /// Replaces the whole peer set. The list may (and usually does) include
    /// this node itself.
    pub fn set_peers<I, S>(&self, peers: I) -> Result<(), PeerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|p| normalize_peer_addr(p.as_ref()))
            .collect();
        let getters = self.build_getters(&peers)?;

        let mut ring = HashRing::with_hasher(self.options.replicas, self.options.hash.clone());
        ring.add(&peers);

        *self.state.write() = PeerState { ring, getters };
        tracing::info!("[Server {}] Peer set updated: {:?}", self.self_addr, peers);
        Ok(())
    }

    /// Adds peers to the current set. Peers already present are ignored.
    pub fn add_peers<I, S>(&self, peers: I) -> Result<(), PeerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|p| normalize_peer_addr(p.as_ref()))
            .collect();
        let getters = self.build_getters(&peers)?;

        let mut state = self.state.write();
        state.ring.add(&peers);
        state.getters.extend(getters);
        tracing::info!("[Server {}] Added peers: {:?}", self.self_addr, peers);
        Ok(())
    }

    pub fn remove_peer(&self, peer: &str) {
        let peer = normalize_peer_addr(peer);
        let mut state = self.state.write();
        state.ring.remove(&peer);
        if state.getters.remove(&peer).is_some() {
            tracing::info!("[Server {}] Removed peer {}", self.self_addr, peer);
        }
    }

    pub fn peers(&self) -> Vec<String> {
        self.state.read().ring.peers().to_vec()
    }

    /// Router answering `GET {base_path}{group}/{key}` (and its query form
    /// on the bare base path) from `registry`.
    pub fn router(self: &Arc<Self>, registry: Arc<GroupRegistry>) -> Router {
        let route = format!("{}*rest", self.options.base_path);
        Router::new()
            .route(&route, get(handle_peer_get))
            .route(&self.options.base_path, get(handle_peer_query))
            .fallback(handle_unexpected_path)
            .layer(Extension(registry))
            .layer(Extension(self.clone()))
    }

    pub(crate) fn log_request(&self, method: &str, path: &str) {
        tracing::info!("[Server {}] {} {}", self.self_addr, method, path);
    }

    fn build_getters(&self, peers: &[String]) -> Result<HashMap<String, Arc<HttpGetter>>, PeerError> {
        peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(self.client.clone(), peer, &self.options.base_path)?;
                Ok((peer.clone(), Arc::new(getter)))
            })
            .collect()
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.read();
        let peer = state.ring.get(key)?;
        if peer == self.self_addr {
            return None;
        }

        tracing::debug!("[Server {}] Pick peer {} for key {}", self.self_addr, peer, key);
        let getter: Arc<dyn PeerGetter> = state.getters.get(peer)?.clone();
        Some(getter)
    }
}
