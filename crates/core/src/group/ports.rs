//! Port interfaces for loading values on a cache miss
//!
//! These traits define the boundary between the cache and whatever backs it
//! (a database, a remote service, a computation).

use std::error::Error;
use std::fmt;

/// Boxed error returned by loaders.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Trait for fetching the value of a key from the source of truth
pub trait Loader: Send + Sync {
    /// Load the bytes for `key`
    ///
    /// The returned buffer is owned by the cache afterwards.
    fn load(&self, key: &str) -> Result<Vec<u8>, BoxError>;
}

/// Adapts a closure into a [`Loader`]
///
/// # Example
/// ```
/// use distcache_core::{Loader, LoaderFn};
///
/// let loader = LoaderFn::new(|key: &str| Ok(key.as_bytes().to_vec()));
/// assert_eq!(loader.load("abc").unwrap(), b"abc".to_vec());
/// ```
pub struct LoaderFn<F>(F);

impl<F> LoaderFn<F> {
    /// Wrap `f` as a loader
    pub fn new(f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
    {
        Self(f)
    }
}

impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn load(&self, key: &str) -> Result<Vec<u8>, BoxError> {
        (self.0)(key)
    }
}

impl<F> fmt::Debug for LoaderFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoaderFn")
    }
}
