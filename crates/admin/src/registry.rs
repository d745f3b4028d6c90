//! Entity registry
//!
//! An explicit, ordered collection of entity configs keyed by entity
//! name. Built once at startup and handed to whatever renders
//! navigation; it plays no part in fetching or validation.
//!
//! Registering a key twice replaces the earlier config in place: the
//! entry keeps its original registration slot for tie-breaking and a
//! warning is logged.

use crate::config::AdminEntityConfig;
use serde::Serialize;
use std::sync::Arc;

/// One registered entity
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub key: String,
    pub config: Arc<AdminEntityConfig>,
    pub route: String,
    pub icon: String,
    pub order: i32,
    sequence: usize,
}

impl RegistryEntry {
    pub fn title(&self) -> &str {
        &self.config.title
    }
}

/// Navigation item rendered for one registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub key: String,
    pub title: String,
    pub route: String,
    pub icon: String,
    pub order: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavChild>,
}

/// Child page link under a navigation item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavChild {
    pub label: String,
    pub icon: String,
    /// Full route template, e.g. `/modules/:moduleId/lessons`
    pub route: String,
}

/// Ordered collection of entity configs
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: Vec<RegistryEntry>,
    next_sequence: usize,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`
    ///
    /// Returns the config previously registered under `key`, if any.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        config: impl Into<Arc<AdminEntityConfig>>,
        route: impl Into<String>,
        icon: impl Into<String>,
        order: i32,
    ) -> Option<Arc<AdminEntityConfig>> {
        let key = key.into();
        let config = config.into();
        let route = route.into();
        let icon = icon.into();

        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            tracing::warn!(%key, "entity registered twice, replacing previous config");
            let previous = std::mem::replace(&mut existing.config, config);
            existing.route = route;
            existing.icon = icon;
            existing.order = order;
            return Some(previous);
        }

        tracing::info!(%key, %route, order, "registered entity");
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(RegistryEntry {
            key,
            config,
            route,
            icon,
            order,
            sequence,
        });
        None
    }

    /// All entries ascending by order, ties by registration sequence
    pub fn list(&self) -> Vec<&RegistryEntry> {
        let mut entries: Vec<&RegistryEntry> = self.entries.iter().collect();
        entries.sort_by_key(|e| (e.order, e.sequence));
        entries
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Look up a config by key
    pub fn config(&self, key: &str) -> Option<Arc<AdminEntityConfig>> {
        self.get(key).map(|e| Arc::clone(&e.config))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Registered keys in list order
    pub fn keys(&self) -> Vec<&str> {
        self.list().into_iter().map(|e| e.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigation items in list order
    pub fn navigation(&self) -> Vec<NavItem> {
        self.list()
            .into_iter()
            .map(|e| NavItem {
                key: e.key.clone(),
                title: e.config.title.clone(),
                route: e.route.clone(),
                icon: e.icon.clone(),
                order: e.order,
                children: e
                    .config
                    .children
                    .iter()
                    .map(|child| NavChild {
                        label: child.label.clone(),
                        icon: child.icon.clone(),
                        route: child.template(&e.route),
                    })
                    .collect(),
            })
            .collect()
    }
}
