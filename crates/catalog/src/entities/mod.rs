//! Entity modules, one per administered entity
//!
//! Every module exposes `KEY`, `ROUTE`, `ICON`, `ORDER`, `schema()`,
//! `seed()` and `config(&CatalogOptions)`.

pub mod bookings;
pub mod categories;
pub mod drivers;
pub mod lessons;
pub mod modules;
pub mod routes;
pub mod schedules;
pub mod trips;
pub mod vehicles;
