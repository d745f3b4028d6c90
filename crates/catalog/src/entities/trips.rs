//! Scheduled departures on a route

use crate::CatalogOptions;
use forge_admin::{AdminEntityConfig, EntityOptions, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_schema::coerce_dates;
use forge_service::ServiceBinding;
use serde_json::{Value, json};

pub const KEY: &str = "trips";
pub const ROUTE: &str = "/trips";
pub const ICON: &str = "clock";
pub const ORDER: i32 = 50;

const STATUSES: [(&str, &str); 5] = [
    ("scheduled", "Programmé"),
    ("boarding", "Embarquement"),
    ("departed", "Parti"),
    ("arrived", "Arrivé"),
    ("cancelled", "Annulé"),
];

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field("routeId", relation("routes", "name", false, "Ligne"))
        .field("vehicleId", relation("vehicles", "plate", false, "Véhicule"))
        .field("driverId", relation("drivers", "lastName", false, "Chauffeur"))
        .field("departureAt", date(FieldMeta::labeled("Départ").order(0)))
        .field("arrivalAt", date("Arrivée"))
        .field(
            "price",
            number(FieldMeta::labeled("Prix").suffix(" €").format(|v| {
                v.as_f64()
                    .map(|p| format!("{p:.2}"))
                    .unwrap_or_default()
            }))
            .min(0.0),
        )
        .field("status", select(STATUSES, "Statut"))
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "trip-1", "routeId": "route-1", "vehicleId": "vehicle-1", "driverId": "driver-1",
            "departureAt": "2026-11-02", "arrivalAt": "2026-11-02T12:30:00Z",
            "price": 29.9, "status": "scheduled"
        }),
        json!({
            "id": "trip-2", "routeId": "route-2", "vehicleId": "vehicle-3", "driverId": "driver-2",
            "departureAt": "2026-11-03T07:15:00Z", "arrivalAt": "2026-11-03T10:35:00Z",
            "price": 24.5, "status": "scheduled"
        }),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Trip", seed());
    let dates = schema();
    create_admin_entity(
        "Trips",
        schema(),
        EntityOptions::new()
            .description("Departures with their vehicle and driver")
            .icon(ICON)
            .table(options.table().sorted_by("departureAt"))
            .services(ServiceBinding::Flat(service))
            .parse_data(move |record| coerce_dates(&dates, record)),
    )
}
