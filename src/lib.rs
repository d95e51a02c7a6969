//! Distributed In-Process Cache Library
//!
//! Building blocks of a cache node that keeps a bounded local cache, knows which node
//! is authoritative for every key, and fetches keys it does not own from that node.
//! The binary (`main.rs`) wires them into a runnable node.
//!
//! ## Architecture Modules
//! - **`cache`**: The local store. `ByteView` values inside a byte-budgeted LRU cache
//!   with an eviction callback, safe for concurrent use.
//! - **`ring`**: Consistent hashing with virtual nodes, mapping keys to peer addresses.
//! - **`peers`**: The peer transport. `PeerPicker`/`PeerGetter` abstractions and their HTTP
//!   implementation (`HttpPool` server + picker, `HttpGetter` client).
//! - **`group`**: A minimal cache-group coordinator and the registry the peer server
//!   resolves group names against.
//! - **`config`**: Defaults and `PoolOptions`.

pub mod cache;
pub mod config;
pub mod group;
pub mod peers;
pub mod ring;
