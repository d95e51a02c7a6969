use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Hash function used to place virtual nodes and keys on the ring.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// CRC-32 (IEEE) checksum, the default ring hash.
pub fn crc32_ieee() -> HashFn {
    Arc::new(crc32fast::hash)
}

/// Consistent hash ring with virtual nodes.
///
/// Each real peer is placed `replicas` times, at `hash(i.to_string() + peer)`
/// for `i` in `0..replicas`. A key belongs to the first virtual node whose
/// hash is `>=` the key's hash, wrapping around to the start of the ring.
///
/// Virtual nodes from different peers that hash to the same value are not
/// deduplicated: both positions stay on the ring and the peer added last owns
/// the shared hash.
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    keys: Vec<u32>,
    hash_map: HashMap<u32, String>,
    members: Vec<String>,
}

impl HashRing {
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32_ieee())
    }

    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            keys: Vec::new(),
            hash_map: HashMap::new(),
            members: Vec::new(),
        }
    }

    /// Adds real peers to the ring. The ring is sorted once per call.
    ///
    /// Peers already on the ring are skipped, so repeating a peer never
    /// grows its share of keys.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            if self.contains(peer) {
                continue;
            }
            for i in 0..self.replicas {
                let hash = self.virtual_hash(i, peer);
                self.keys.push(hash);
                self.hash_map.insert(hash, peer.to_string());
            }
            self.members.push(peer.to_string());
        }
        self.keys.sort_unstable();
    }

    /// Removes `peer` and its virtual nodes.
    ///
    /// The ring is rebuilt from the remaining peers in their original order,
    /// so a hash shared by two peers goes back to whichever was added later.
    pub fn remove(&mut self, peer: &str) {
        if !self.contains(peer) {
            return;
        }
        let remaining: Vec<String> = self.members.drain(..).filter(|m| m != peer).collect();
        self.keys.clear();
        self.hash_map.clear();
        self.add(remaining);
    }

    /// Returns the peer owning `key`, or `None` for an empty ring or key.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key.is_empty() || self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&h| h < hash);
        let owner = self.keys[idx % self.keys.len()];
        self.hash_map.get(&owner).map(String::as_str)
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Real peers in the order they were added.
    pub fn peers(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, peer: &str) -> bool {
        self.members.iter().any(|m| m == peer)
    }

    fn virtual_hash(&self, i: usize, peer: &str) -> u32 {
        (self.hash)(format!("{}{}", i, peer).as_bytes())
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .field("peers", &self.peers())
            .finish()
    }
}
