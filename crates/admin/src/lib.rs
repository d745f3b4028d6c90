//! # Forge Admin
//!
//! Entity administration on top of schemas and services:
//!
//! - [`config`]: [`AdminEntityConfig`] and [`create_admin_entity`]
//! - [`registry`]: the ordered [`EntityRegistry`] driving navigation
//! - [`hooks`]: cached list queries and notifying mutations
//! - [`notify`]: user-facing notifications

pub mod config;
pub mod hooks;
pub mod notify;
pub mod registry;

pub use config::{
    Action, Actions, AdminEntityConfig, ChildRoute, DEFAULT_PAGE_SIZE, EntityOptions, FormLayout,
    FormUi, ParentConfig, RecordTransform, TableUi, create_admin_entity,
};
pub use hooks::{CacheEntry, EntityQuery, Mutation, QueryClient, QueryKey};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier, TracingNotifier};
pub use registry::{EntityRegistry, NavChild, NavItem, RegistryEntry};
