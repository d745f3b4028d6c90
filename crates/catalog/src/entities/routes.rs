//! Network routes between two cities

use crate::CatalogOptions;
use forge_admin::{AdminEntityConfig, EntityOptions, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::ServiceBinding;
use serde_json::{Value, json};

pub const KEY: &str = "routes";
pub const ROUTE: &str = "/routes";
pub const ICON: &str = "map";
pub const ORDER: i32 = 40;

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field("name", string("Nom").min_length(3))
        .field("origin", string("Départ"))
        .field("destination", string("Arrivée"))
        .field(
            "distanceKm",
            number(FieldMeta::labeled("Distance").suffix(" km")).min(0.0),
        )
        .field(
            "durationMinutes",
            number(FieldMeta::labeled("Durée").suffix(" min")).min(1.0),
        )
        .field(
            "stops",
            list(FieldMeta::labeled("Arrêts").hide_in_table()).optional(),
        )
        .field("active", boolean("Active"))
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "route-1", "name": "Paris - Lyon", "origin": "Paris", "destination": "Lyon",
            "distanceKm": 465, "durationMinutes": 270, "stops": ["Auxerre", "Mâcon"], "active": true
        }),
        json!({
            "id": "route-2", "name": "Lyon - Marseille", "origin": "Lyon", "destination": "Marseille",
            "distanceKm": 315, "durationMinutes": 200, "stops": ["Valence", "Avignon"], "active": true
        }),
        json!({
            "id": "route-3", "name": "Paris - Lille", "origin": "Paris", "destination": "Lille",
            "distanceKm": 225, "durationMinutes": 150, "stops": [], "active": false
        }),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Route", seed());
    create_admin_entity(
        "Routes",
        schema(),
        EntityOptions::new()
            .description("Intercity lines served by the network")
            .icon(ICON)
            .table(options.table())
            .services(ServiceBinding::Flat(service)),
    )
}
