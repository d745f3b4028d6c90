//! Recurring timetables

use crate::CatalogOptions;
use forge_admin::{AdminEntityConfig, EntityOptions, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::ServiceBinding;
use serde_json::{Value, json};

pub const KEY: &str = "schedules";
pub const ROUTE: &str = "/schedules";
pub const ICON: &str = "calendar";
pub const ORDER: i32 = 60;

const DAYS: [(&str, &str); 7] = [
    ("mon", "Lundi"),
    ("tue", "Mardi"),
    ("wed", "Mercredi"),
    ("thu", "Jeudi"),
    ("fri", "Vendredi"),
    ("sat", "Samedi"),
    ("sun", "Dimanche"),
];

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field("routeId", relation("routes", "name", false, "Ligne"))
        .field("days", multiselect(DAYS, "Jours"))
        .field(
            "departureTime",
            string(FieldMeta::labeled("Heure de départ").placeholder("08:30"))
                .pattern("^([01][0-9]|2[0-3]):[0-5][0-9]$", "Expected HH:MM"),
        )
        .field("validFrom", date("Valide du"))
        .field("validUntil", date("Valide jusqu'au").optional())
        .field("active", boolean("Actif"))
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "schedule-1", "routeId": "route-1", "days": ["mon", "wed", "fri"],
            "departureTime": "08:00", "validFrom": "2026-09-01", "active": true
        }),
        json!({
            "id": "schedule-2", "routeId": "route-2", "days": ["sat", "sun"],
            "departureTime": "07:15", "validFrom": "2026-09-01", "validUntil": "2027-06-30",
            "active": true
        }),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Schedule", seed());
    create_admin_entity(
        "Schedules",
        schema(),
        EntityOptions::new()
            .description("Weekly departure patterns per route")
            .icon(ICON)
            .table(options.table())
            .services(ServiceBinding::Flat(service)),
    )
}
