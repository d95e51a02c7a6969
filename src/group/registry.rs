//! Group Registry
//!
//! Explicit, process-owned map from group name to [`Group`]. It is built at
//! startup and handed to the peer server, which resolves the group named in
//! each incoming request through it.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;

use super::group::Group;

pub struct GroupRegistry {
    groups: DashMap<String, Arc<Group>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a group and registers it under its name.
    ///
    /// An existing group with the same name is replaced.
    pub fn new_group<F, Fut>(&self, name: &str, cache_bytes: usize, loader: F) -> Arc<Group>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
    {
        self.register(Group::new(name, cache_bytes, loader))
    }

    pub fn register(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        if self
            .groups
            .insert(group.name().to_string(), group.clone())
            .is_some()
        {
            tracing::warn!("Replaced existing group: {}", group.name());
        } else {
            tracing::info!("Registered group: {}", group.name());
        }
        group
    }

    /// Looks up a group by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// Returns the names of all registered groups, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
