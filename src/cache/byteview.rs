use std::fmt;
use std::sync::Arc;

use super::lru::Value;

/// Immutable snapshot of a cached value.
///
/// The buffer is shared between clones (cloning a `ByteView` never copies the
/// bytes) and is never mutated after construction. Every accessor that hands
/// out owned bytes returns a fresh copy, so callers can modify what they get
/// back without touching the cached value.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteView {
    b: Arc<[u8]>,
}

impl ByteView {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            b: Arc::from(bytes.into()),
        }
    }

    /// Number of bytes held by the view.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Returns an owned copy of the underlying bytes.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Read-only borrow of the bytes, for writing them out without a copy.
    pub fn as_slice(&self) -> &[u8] {
        &self.b
    }
}

impl Value for ByteView {
    fn len(&self) -> usize {
        self.b.len()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.b
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

/// Lossy UTF-8 rendering; `to_string()` always yields a new `String`.
impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.b.len())
            .field("value", &String::from_utf8_lossy(&self.b))
            .finish()
    }
}
