use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

use super::error::GroupError;
use super::stats::GroupStats;
use crate::cache::{ByteView, Cache};
use crate::peers::PeerPicker;

/// Type alias for the backing-source loader of a group.
/// It takes the missing key and resolves to the value's bytes.
pub type LoaderFn = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send>> + Send + Sync,
>;

/// A named cache namespace with its own loader and local cache.
///
/// Lookups go local cache -> owning peer -> loader. Values loaded from the
/// backing source are cached here; values fetched from a peer are not, the
/// owning peer caches them.
pub struct Group {
    name: String,
    loader: LoaderFn,
    main_cache: Cache<ByteView>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: GroupStats,
}

impl Group {
    /// Creates a group whose local cache holds at most `cache_bytes`.
    pub fn new<F, Fut>(name: impl Into<String>, cache_bytes: usize, loader: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
    {
        // Box::pin erases the concrete future type so any async closure fits.
        let loader: LoaderFn = Arc::new(move |key: String| {
            Box::pin(loader(key)) as Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send>>
        });

        Self {
            name: name.into(),
            loader,
            main_cache: Cache::new(cache_bytes),
            peers: OnceLock::new(),
            stats: GroupStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the peer picker. Can only be done once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<(), GroupError> {
        self.peers
            .set(peers)
            .map_err(|_| GroupError::PeersAlreadyRegistered(self.name.clone()))
    }

    pub async fn get(&self, key: &str) -> Result<ByteView, GroupError> {
        self.stats.record_get();
        if key.is_empty() {
            return Err(GroupError::EmptyKey);
        }

        if let Some(view) = self.main_cache.get(key) {
            tracing::debug!("[{}] cache hit for {}", self.name, key);
            self.stats.record_cache_hit();
            return Ok(view);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView, GroupError> {
        self.stats.record_load();

        if let Some(picker) = self.peers.get()
            && let Some(peer) = picker.pick_peer(key)
        {
            match peer.fetch(&self.name, key).await {
                Ok(bytes) => {
                    self.stats.record_peer_load();
                    return Ok(ByteView::from(bytes));
                }
                Err(e) => {
                    self.stats.record_peer_error();
                    tracing::warn!("[{}] Failed to get {} from peer: {}", self.name, key, e);
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView, GroupError> {
        let bytes = match (self.loader)(key.to_string()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.stats.record_local_load_error();
                return Err(GroupError::Load(e));
            }
        };
        self.stats.record_local_load();

        let view = ByteView::from(bytes);
        self.main_cache.add(key, view.clone());
        Ok(view)
    }

    pub fn stats(&self) -> &GroupStats {
        &self.stats
    }

    pub fn cache(&self) -> &Cache<ByteView> {
        &self.main_cache
    }
}
