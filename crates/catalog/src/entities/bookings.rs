//! Passenger bookings, administered read-only
//!
//! Bookings are created by the checkout flow; the admin only lists and
//! exports them. Mutations reach a service that refuses them.

use crate::CatalogOptions;
use forge_admin::{Action, Actions, AdminEntityConfig, EntityOptions, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::{ReadOnlyService, ServiceBinding};
use serde_json::{Value, json};

pub const KEY: &str = "bookings";
pub const ROUTE: &str = "/bookings";
pub const ICON: &str = "ticket";
pub const ORDER: i32 = 70;

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field("reference", string(FieldMeta::labeled("Référence").order(0)))
        .field("tripId", relation("trips", "departureAt", false, "Trajet"))
        .field("passengerName", string("Passager"))
        .field("passengerEmail", string(FieldMeta::labeled("Email").hide_in_table()).email())
        .field("seats", list("Sièges"))
        .field(
            "total",
            number(FieldMeta::labeled("Total").suffix(" €")).min(0.0),
        )
        .field(
            "status",
            select(
                [
                    ("pending", "En attente"),
                    ("paid", "Payée"),
                    ("cancelled", "Annulée"),
                    ("refunded", "Remboursée"),
                ],
                "Statut",
            ),
        )
        .field("createdAt", date(FieldMeta::labeled("Créée le").hide_in_form()))
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "booking-1", "reference": "BK-0001", "tripId": "trip-1",
            "passengerName": "Claire Petit", "passengerEmail": "claire.petit@example.com",
            "seats": ["12A"], "total": 29.9, "status": "paid", "createdAt": "2026-10-01"
        }),
        json!({
            "id": "booking-2", "reference": "BK-0002", "tripId": "trip-1",
            "passengerName": "Hugo Bernard", "passengerEmail": "hugo.bernard@example.com",
            "seats": ["14C", "14D"], "total": 59.8, "status": "pending", "createdAt": "2026-10-04"
        }),
        json!({
            "id": "booking-3", "reference": "BK-0003", "tripId": "trip-2",
            "passengerName": "Inès Laurent", "passengerEmail": "ines.laurent@example.com",
            "seats": ["3B"], "total": 24.5, "status": "cancelled", "createdAt": "2026-10-06"
        }),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = ReadOnlyService::new(options.backend.service(KEY, "Booking", seed()), "Bookings");
    create_admin_entity(
        "Bookings",
        schema(),
        EntityOptions::new()
            .description("Seat reservations made by passengers")
            .icon(ICON)
            .actions(Actions::read_only().with(Action::Export, true))
            .table(options.table().sorted_by("createdAt"))
            .services(ServiceBinding::flat(service)),
    )
}
