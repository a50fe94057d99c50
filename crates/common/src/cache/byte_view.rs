//! Immutable byte payloads handed out by the cache.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::value::Value;

/// An immutable view over a sequence of bytes.
///
/// Cloning shares the underlying storage. A `ByteView` never aliases a buffer
/// the caller can still mutate: it either copies a borrowed slice or takes
/// ownership of a `Vec<u8>`.
///
/// # Example
/// ```
/// use distcache_common::cache::ByteView;
///
/// let view = ByteView::copy_from(b"world");
/// assert_eq!(view.len(), 5);
/// assert_eq!(view.to_string(), "world");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    /// Build a view by copying `bytes`.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self { bytes: Arc::from(bytes) }
    }

    /// Number of bytes in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-length view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the bytes without copying.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return a fresh, caller-owned copy of the bytes.
    #[must_use]
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl Default for ByteView {
    fn default() -> Self {
        Self { bytes: Arc::from(Vec::new()) }
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes: Arc::from(bytes) }
    }
}

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self::copy_from(bytes)
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::copy_from(s.as_bytes())
    }
}

impl From<String> for ByteView {
    fn from(s: String) -> Self {
        Self::from(s.into_bytes())
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView").field("len", &self.len()).finish()
    }
}

impl Value for ByteView {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
