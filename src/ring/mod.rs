//! Peer Placement Module
//!
//! Decides which node is authoritative for a key.
//!
//! ## Core Concepts
//! - **Consistent hashing**: Keys and peers are hashed onto the same `u32` ring; a key is owned
//!   by the first peer position at or after its hash, wrapping around at the end.
//! - **Virtual nodes**: Every real peer occupies `replicas` positions so that load spreads
//!   evenly even with few peers.
//! - **Pluggable hash**: CRC-32 by default, replaceable for deterministic tests.

pub mod hash_ring;

pub use hash_ring::{HashFn, HashRing, crc32_ieee};
