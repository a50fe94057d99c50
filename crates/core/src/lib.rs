//! # distcache Core
//!
//! Cache-aside orchestration on top of `distcache-common`.
//!
//! This crate contains:
//! - The [`Loader`] port used to fetch values on a miss
//! - [`Group`], a named cache that loads through a single-flight gate
//! - [`GroupRegistry`], the name → group map (process-wide or injected)
//!
//! ## Architecture Principles
//! - Only depends on `distcache-common`
//! - No network, storage, or runtime code
//! - Data sources plug in through the [`Loader`] trait
//!
//! ## Example
//! ```
//! use distcache_core::{GroupRegistry, LoaderFn};
//!
//! let registry = GroupRegistry::new();
//! let group = registry.new_group("scores", 2 << 10, LoaderFn::new(|key: &str| {
//!     Ok(format!("value-for-{key}").into_bytes())
//! }));
//!
//! let view = group.get("tom").unwrap();
//! assert_eq!(view.to_string(), "value-for-tom");
//! assert!(registry.get("scores").is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod group;

pub use error::{GroupError, GroupResult};
pub use group::ports::{BoxError, Loader, LoaderFn};
pub use group::registry::{get_group, new_group, GroupRegistry};
pub use group::service::{Group, GroupBuilder, GroupStats};
