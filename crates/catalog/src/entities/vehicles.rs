//! Fleet vehicles

use crate::CatalogOptions;
use forge_admin::{AdminEntityConfig, EntityOptions, FormLayout, FormUi, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::ServiceBinding;
use serde_json::{Value, json};

pub const KEY: &str = "vehicles";
pub const ROUTE: &str = "/vehicles";
pub const ICON: &str = "bus";
pub const ORDER: i32 = 30;

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field(
            "plate",
            string(FieldMeta::labeled("Immatriculation").placeholder("AB-123-CD").order(1))
                .pattern("^[A-Z]{2}-[0-9]{3}-[A-Z]{2}$", "Expected a plate like AB-123-CD"),
        )
        .field("brand", string("Marque"))
        .field("model", string("Modèle"))
        .field(
            "kind",
            select(
                [("bus", "Bus"), ("minibus", "Minibus"), ("coach", "Autocar")],
                "Type",
            ),
        )
        .field(
            "capacity",
            number(FieldMeta::labeled("Places").suffix(" seats"))
                .min(1.0)
                .max(90.0),
        )
        .field("photo", image(FieldMeta::labeled("Photo").hide_in_table()).optional())
        .field("inService", boolean("En service"))
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "vehicle-1", "plate": "AB-123-CD", "brand": "Mercedes", "model": "Citaro",
            "kind": "bus", "capacity": 70, "inService": true
        }),
        json!({
            "id": "vehicle-2", "plate": "EF-456-GH", "brand": "Iveco", "model": "Daily",
            "kind": "minibus", "capacity": 19, "inService": true
        }),
        json!({
            "id": "vehicle-3", "plate": "IJ-789-KL", "brand": "Setra", "model": "S 515 HD",
            "kind": "coach", "capacity": 49, "inService": false
        }),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Vehicle", seed());
    create_admin_entity(
        "Vehicles",
        schema(),
        EntityOptions::new()
            .description("Buses, minibuses and coaches")
            .icon(ICON)
            .table(options.table().sorted_by("plate"))
            .form(FormUi {
                layout: FormLayout::Grid,
                columns: Some(2),
            })
            .services(ServiceBinding::Flat(service)),
    )
}
