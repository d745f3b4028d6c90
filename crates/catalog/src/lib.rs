//! # Forge Catalog
//!
//! The administered entities: a transport network (drivers, vehicles,
//! routes, trips, schedules, bookings), a shop (categories) and a course
//! catalog (modules and their lessons).
//!
//! Each entity module declares its schema, its mock seed data and its
//! [`AdminEntityConfig`](forge_admin::AdminEntityConfig).
//! [`register_all`] puts them in a registry for navigation.

pub mod backend;
pub mod entities;

pub use backend::Backend;
pub use entities::{
    bookings, categories, drivers, lessons, modules, routes, schedules, trips, vehicles,
};

use forge_admin::{DEFAULT_PAGE_SIZE, EntityRegistry, TableUi};
use forge_core::AdminResult;

/// Settings shared by every catalog entity
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub backend: Backend,
    pub page_size: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            backend: Backend::mock(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogOptions {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Table options every entity starts from
    pub fn table(&self) -> TableUi {
        TableUi::default().with_page_size(self.page_size)
    }
}

macro_rules! register_entities {
    ($registry:expr, $options:expr, $($entity:ident),+ $(,)?) => {
        $(
            $registry.register(
                $entity::KEY,
                $entity::config($options)?,
                $entity::ROUTE,
                $entity::ICON,
                $entity::ORDER,
            );
        )+
    };
}

/// Register every catalog entity
pub fn register_all(registry: &mut EntityRegistry, options: &CatalogOptions) -> AdminResult<()> {
    register_entities!(
        registry, options, categories, drivers, vehicles, routes, trips, schedules, bookings,
        modules, lessons,
    );
    tracing::debug!(entities = registry.len(), "catalog registered");
    Ok(())
}

/// A registry holding every catalog entity
pub fn build_registry(options: &CatalogOptions) -> AdminResult<EntityRegistry> {
    let mut registry = EntityRegistry::new();
    register_all(&mut registry, options)?;
    Ok(registry)
}
