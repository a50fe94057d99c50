//! Name → group registry.
//!
//! A [`GroupRegistry`] can be created and passed around explicitly, which is
//! what tests do. [`GroupRegistry::global`] is the process-wide instance used
//! by [`new_group`] and [`get_group`]; it starts empty and lives for the rest
//! of the process.

use std::collections::HashMap;
use std::sync::Arc;

use distcache_common::error::{CommonError, CommonResult};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::info;

use super::ports::Loader;
use super::service::Group;

static GLOBAL: Lazy<GroupRegistry> = Lazy::new(GroupRegistry::new);

/// Thread-safe map of group names to groups
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static GroupRegistry {
        &GLOBAL
    }

    /// Register `group` under its name, replacing any earlier group with that
    /// name
    pub fn register(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        let name = group.name().to_string();
        let previous = self.groups.write().insert(name.clone(), Arc::clone(&group));

        if previous.is_some() {
            info!(group = %name, "replaced registered group");
        } else {
            info!(group = %name, "registered group");
        }
        group
    }

    /// Create an LRU group and register it
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: u64,
        loader: impl Loader + 'static,
    ) -> Arc<Group> {
        self.register(Group::new(name, cache_bytes, loader))
    }

    /// Look up a group by name
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Look up a group by name, failing when it is not registered
    pub fn require(&self, name: &str) -> CommonResult<Arc<Group>> {
        self.get(name).ok_or_else(|| CommonError::not_found_with_id("group", name))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered groups
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Returns `true` when no group is registered
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

/// Create an LRU group and register it in the global registry
pub fn new_group(
    name: impl Into<String>,
    cache_bytes: u64,
    loader: impl Loader + 'static,
) -> Arc<Group> {
    GroupRegistry::global().new_group(name, cache_bytes, loader)
}

/// Look up a group in the global registry
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    GroupRegistry::global().get(name)
}
