//! Drivers of the transport network

use crate::CatalogOptions;
use forge_admin::{Action, Actions, AdminEntityConfig, EntityOptions, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::ServiceBinding;
use serde_json::{Value, json};

pub const KEY: &str = "drivers";
pub const ROUTE: &str = "/drivers";
pub const ICON: &str = "id-card";
pub const ORDER: i32 = 20;

const LICENSES: [(&str, &str); 4] = [
    ("B", "B - car"),
    ("C", "C - truck"),
    ("D1", "D1 - minibus"),
    ("D", "D - bus"),
];

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field("firstName", string("Prénom").min_length(1))
        .field("lastName", string("Nom").min_length(1))
        .field("email", string(FieldMeta::labeled("Email").hide_in_table()).email())
        .field("phone", string("Téléphone").optional())
        .field(
            "licenses",
            multiselect(LICENSES, FieldMeta::labeled("Permis").widget(Widget::Tag)),
        )
        .field("hiredAt", date(FieldMeta::labeled("Embauché le").hide_in_table()).optional())
        .field("active", boolean("Actif"))
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "driver-1", "firstName": "Amina", "lastName": "Diallo",
            "email": "amina.diallo@example.com", "phone": "+33 6 12 34 56 78",
            "licenses": ["B", "D"], "hiredAt": "2019-03-01", "active": true
        }),
        json!({
            "id": "driver-2", "firstName": "Lucas", "lastName": "Martin",
            "email": "lucas.martin@example.com", "licenses": ["B", "D1"],
            "hiredAt": "2021-09-15", "active": true
        }),
        json!({
            "id": "driver-3", "firstName": "Sofia", "lastName": "Moreau",
            "email": "sofia.moreau@example.com", "licenses": ["B", "C", "D"],
            "hiredAt": "2016-06-20", "active": false
        }),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Driver", seed());
    create_admin_entity(
        "Drivers",
        schema(),
        EntityOptions::new()
            .description("Bus and coach drivers")
            .icon(ICON)
            .actions(Actions::default().with(Action::Export, true))
            .table(options.table().sorted_by("lastName"))
            .services(ServiceBinding::Flat(service)),
    )
}
