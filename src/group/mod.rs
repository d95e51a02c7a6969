//! Cache Group Module
//!
//! A minimal coordinator on top of the local cache and the peer transport.
//!
//! ## Core Concepts
//! - **Group**: A named namespace with a byte-budgeted local cache and a loader for its
//!   backing source. A miss is routed to the owning peer when there is one, and loaded
//!   locally otherwise (or when the peer fails).
//! - **Registry**: The explicit group directory the peer server resolves group names against.
//! - **Stats**: Lock-free counters describing how each `get` was satisfied.
//!
//! Concurrent misses for the same key are not deduplicated.

pub mod error;
pub mod group;
pub mod handlers;
pub mod registry;
pub mod stats;

pub use error::GroupError;
pub use group::{Group, LoaderFn};
pub use registry::GroupRegistry;
pub use stats::{GroupStats, StatsSnapshot};
