//! Test fixture generators
//!
//! For deterministic tests, use the `*_seeded` variants with a fixed seed.

use rand::{Rng, SeedableRng};

use crate::cache::ByteView;

/// A `len`-byte view filled with a repeating pattern
///
/// # Examples
///
/// ```
/// use distcache_common::testing::fixtures::payload;
///
/// assert_eq!(payload(1024).len(), 1024);
/// ```
#[must_use]
pub fn payload(len: usize) -> ByteView {
    ByteView::from((0..len).map(|i| b'a' + (i % 26) as u8).collect::<Vec<u8>>())
}

/// A `len`-byte view of random bytes drawn from a seeded RNG (deterministic)
///
/// # Examples
///
/// ```
/// use distcache_common::testing::fixtures::payload_seeded;
///
/// assert_eq!(payload_seeded(16, 42), payload_seeded(16, 42));
/// ```
#[must_use]
pub fn payload_seeded(len: usize, seed: u64) -> ByteView {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    ByteView::from((0..len).map(|_| rng.gen::<u8>()).collect::<Vec<u8>>())
}
