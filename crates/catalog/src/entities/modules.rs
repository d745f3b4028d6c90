//! Course modules; each one owns a list of lessons

use crate::CatalogOptions;
use crate::entities::lessons;
use forge_admin::{AdminEntityConfig, ChildRoute, EntityOptions, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::ServiceBinding;
use serde_json::{Value, json};

pub const KEY: &str = "modules";
pub const ROUTE: &str = "/modules";
pub const ICON: &str = "layers";
pub const ORDER: i32 = 80;

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field("title", string("Titre").min_length(3))
        .field("summary", textarea(FieldMeta::labeled("Résumé").hide_in_table()).optional())
        .field("position", number("Position").min(0.0))
        .field("published", boolean("Publié"))
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({"id": "module-1", "title": "Sécurité à bord", "position": 1, "published": true}),
        json!({"id": "module-2", "title": "Relation client", "position": 2, "published": false}),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Module", seed());
    create_admin_entity(
        "Modules",
        schema(),
        EntityOptions::new()
            .description("Driver training modules")
            .icon(ICON)
            .table(options.table().sorted_by("position"))
            .services(ServiceBinding::Flat(service))
            .child(
                ChildRoute::new(lessons::KEY, "Leçons", lessons::ICON).param(lessons::PARENT_KEY),
            ),
    )
}
