//! Shop product categories

use crate::CatalogOptions;
use forge_admin::{AdminEntityConfig, EntityOptions, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::ServiceBinding;
use serde_json::{Value, json};

pub const KEY: &str = "categories";
pub const ROUTE: &str = "/categories";
pub const ICON: &str = "tag";
pub const ORDER: i32 = 10;

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field(
            "name",
            string(FieldMeta::labeled("Nom").placeholder("Livres").order(1))
                .min_length(2)
                .max_length(60),
        )
        .field(
            "slug",
            string(FieldMeta::labeled("Slug").order(2).hide_in_table())
                .pattern("^[a-z0-9-]+$", "Lowercase letters, digits and dashes only"),
        )
        .field(
            "description",
            textarea(FieldMeta::labeled("Description").order(3).hide_in_table()).optional(),
        )
        .field("active", boolean(FieldMeta::labeled("Active").order(4)).optional())
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({"id": "cat-1", "name": "Livres", "slug": "livres", "active": true}),
        json!({"id": "cat-2", "name": "Électronique", "slug": "electronique", "active": true}),
        json!({"id": "cat-3", "name": "Vêtements", "slug": "vetements", "active": true}),
        json!({"id": "cat-4", "name": "Maison", "slug": "maison", "active": false}),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Category", seed());
    create_admin_entity(
        "Categories",
        schema(),
        EntityOptions::new()
            .description("Product categories shown in the shop")
            .icon(ICON)
            .table(options.table().sorted_by("name"))
            .services(ServiceBinding::Flat(service)),
    )
}
