//! Node Configuration
//!
//! Defaults shared by the library and the `distcache` binary. The binary maps
//! its command line flags (and `DISTCACHE_*` environment variables) onto
//! [`PoolOptions`].

use std::fmt;
use std::time::Duration;

use crate::peers::protocol::{DEFAULT_BASE_PATH, normalize_base_path};
use crate::ring::{HashFn, crc32_ieee};

/// Virtual nodes per real peer.
pub const DEFAULT_REPLICAS: usize = 50;

/// Byte budget of a group's local cache in the demo node.
pub const DEFAULT_CACHE_BYTES: usize = 2 << 10;

/// Timeout applied to every peer fetch.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Settings of an [`HttpPool`](crate::peers::HttpPool).
#[derive(Clone)]
pub struct PoolOptions {
    pub base_path: String,
    pub replicas: usize,
    pub hash: HashFn,
    pub request_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: crc32_ieee(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl PoolOptions {
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_hash(mut self, hash: HashFn) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl fmt::Debug for PoolOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolOptions")
            .field("base_path", &self.base_path)
            .field("replicas", &self.replicas)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
