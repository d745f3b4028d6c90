//! Lessons, always handled within their module

use crate::CatalogOptions;
use forge_admin::{AdminEntityConfig, EntityOptions, ParentConfig, create_admin_entity};
use forge_core::AdminResult;
use forge_schema::prelude::*;
use forge_service::{ParentKeyed, ServiceBinding};
use serde_json::{Value, json};

pub const KEY: &str = "lessons";
pub const ROUTE: &str = "/modules/:moduleId/lessons";
pub const ICON: &str = "book-open";
pub const ORDER: i32 = 85;

/// Field holding the owning module's identifier
pub const PARENT_KEY: &str = "moduleId";

pub fn schema() -> EntitySchema {
    EntitySchema::new()
        .field("title", string(FieldMeta::labeled("Titre").order(1)).min_length(3))
        .field("content", textarea(FieldMeta::labeled("Contenu").hide_in_table()))
        .field(
            "durationMinutes",
            number(FieldMeta::labeled("Durée").suffix(" min")).min(1.0),
        )
        .field(
            PARENT_KEY,
            relation(
                "modules",
                "title",
                false,
                FieldMeta::labeled("Module").hide_in_form().hide_in_table(),
            )
            .optional(),
        )
}

pub fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "lesson-1", "moduleId": "module-1", "title": "Avant le départ",
            "content": "Vérifications du véhicule.", "durationMinutes": 20
        }),
        json!({
            "id": "lesson-2", "moduleId": "module-1", "title": "Évacuation",
            "content": "Procédure d'évacuation.", "durationMinutes": 35
        }),
        json!({
            "id": "lesson-3", "moduleId": "module-2", "title": "Accueil des passagers",
            "content": "Saluer, orienter, rassurer.", "durationMinutes": 25
        }),
    ]
}

pub fn config(options: &CatalogOptions) -> AdminResult<AdminEntityConfig> {
    let service = options.backend.service(KEY, "Lesson", seed());
    create_admin_entity(
        "Lessons",
        schema(),
        EntityOptions::new()
            .description("Lessons of a training module")
            .icon(ICON)
            .table(options.table())
            .services(ServiceBinding::parent_aware(ParentKeyed::from_arc(
                service, PARENT_KEY,
            )))
            .parent(
                ParentConfig::new(PARENT_KEY, PARENT_KEY)
                    .entity("modules")
                    .label("Module"),
            )
            .form_fields(["title", "durationMinutes", "content"]),
    )
}
