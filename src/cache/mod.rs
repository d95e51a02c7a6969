//! Local Cache Module
//!
//! The node-local, in-memory side of the distributed cache.
//!
//! ## Components
//! - **`byteview`**: `ByteView`, the immutable value type every group stores and ships to peers.
//! - **`lru`**: `LruCache`, an unsynchronised LRU core budgeted in bytes rather than entries.
//! - **`shared`**: `Cache`, the mutex-guarded wrapper used by request handlers, with an
//!   optional eviction callback that runs outside the lock.

pub mod byteview;
pub mod lru;
pub mod shared;

pub use byteview::ByteView;
pub use lru::{LruCache, Value};
pub use shared::{Cache, OnEvicted};

#[cfg(test)]
mod tests;
