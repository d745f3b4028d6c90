//! Command execution

use crate::config::AppConfig;
use crate::output;
use crate::{Cli, Command};
use anyhow::{Context, Result, anyhow, bail};
use forge_admin::{
    Action, AdminEntityConfig, EntityQuery, EntityRegistry, NotificationLog, QueryClient,
};
use forge_catalog::build_registry;
use forge_core::{Filters, Record, Validatable, ValidationError};
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;

/// Everything a command needs
pub struct Session {
    pub registry: EntityRegistry,
    pub client: QueryClient,
    pub notifications: Arc<NotificationLog>,
    pub json: bool,
}

impl Session {
    pub fn new(config: &AppConfig, json: bool) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let options = config.catalog_options()?;
        let registry = build_registry(&options).context("failed to build entity registry")?;
        Ok(Self {
            registry,
            client: QueryClient::new(),
            notifications: Arc::new(NotificationLog::new()),
            json,
        })
    }

    fn entity(&self, key: &str) -> Result<Arc<AdminEntityConfig>> {
        self.registry.config(key).ok_or_else(|| {
            anyhow!(
                "unknown entity '{key}' (available: {})",
                self.registry.keys().join(", ")
            )
        })
    }

    fn query(&self, config: &AdminEntityConfig, parent: Option<&str>) -> Result<EntityQuery> {
        match (config.is_nested(), parent) {
            (true, None) => {
                let key = config.parent.as_ref().map(|p| p.key.as_str()).unwrap_or("parent");
                bail!(
                    "{} are nested records; pass --parent <{key}>",
                    config.title
                )
            }
            (true, Some(parent)) => Ok(EntityQuery::within(
                config,
                parent,
                self.client.clone(),
                self.notifications.clone(),
            )),
            (false, _) => Ok(EntityQuery::new(
                config,
                self.client.clone(),
                self.notifications.clone(),
            )),
        }
    }

    fn flush_notifications(&self, out: &mut dyn Write) -> Result<()> {
        for notification in self.notifications.take() {
            output::write_notification(out, &notification)?;
        }
        Ok(())
    }
}

/// Run a parsed command line against a configuration
pub async fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    if let Some(mode) = cli.backend {
        config.backend.mode = mode;
    }
    let session = Session::new(&config, cli.json)?;
    let mut out = std::io::stdout();
    execute(&session, &cli.command, &mut out).await
}

/// Execute one command, writing its output to `out`
pub async fn execute(session: &Session, command: &Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Nav => {
            let nav = session.registry.navigation();
            if session.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&nav)?)?;
            } else {
                output::write_navigation(out, &nav)?;
            }
        }

        Command::Describe { entity } => {
            let config = session.entity(entity)?;
            if session.json {
                let doc = output::description_json(&config);
                writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
            } else {
                output::write_description(out, &config)?;
            }
        }

        Command::List {
            entity,
            filters,
            parent,
            search,
            page,
        } => {
            let config = session.entity(entity)?;
            let query = session.query(&config, parent.as_deref())?;

            let mut filters: Filters = filters.iter().cloned().collect();
            filters.insert("limit", config.table.page_size.to_string());
            filters.insert("page", page.unwrap_or(1).to_string());
            if let Some(search) = search {
                filters.insert("search", search.as_str());
            }

            let list = query
                .list(&filters)
                .await
                .with_context(|| format!("failed to list {}", config.title))?;
            if session.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
            } else {
                output::write_list(out, &config, &list)?;
            }
        }

        Command::Create {
            entity,
            data,
            parent,
        } => {
            let config = session.entity(entity)?;
            ensure_allowed(&config, Action::Create)?;
            let query = session.query(&config, parent.as_deref())?;
            let record = config
                .validate_input(&parse_data(data)?)
                .map_err(invalid)?;

            let result = query.create(record).await;
            session.flush_notifications(out)?;
            print_record(out, &result?)?;
        }

        Command::Update {
            entity,
            id,
            data,
            parent,
        } => {
            let config = session.entity(entity)?;
            ensure_allowed(&config, Action::Update)?;
            let query = session.query(&config, parent.as_deref())?;
            let patch = config
                .validate_patch(&parse_data(data)?)
                .map_err(invalid)?;

            let result = query.update(id, patch).await;
            session.flush_notifications(out)?;
            print_record(out, &result?)?;
        }

        Command::Delete { entity, id, parent } => {
            let config = session.entity(entity)?;
            ensure_allowed(&config, Action::Delete)?;
            let query = session.query(&config, parent.as_deref())?;

            let result = query.delete(id).await;
            session.flush_notifications(out)?;
            result?;
        }
    }
    Ok(())
}

fn ensure_allowed(config: &AdminEntityConfig, action: Action) -> Result<()> {
    if !config.can(action) {
        bail!("{action} is disabled for {}", config.title);
    }
    Ok(())
}

fn parse_data(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("--data must be a JSON object")
}

fn invalid(err: ValidationError) -> anyhow::Error {
    let details: Vec<String> = err
        .field_errors()
        .into_iter()
        .map(|(field, message)| {
            if field.is_empty() {
                message
            } else {
                format!("{field}: {message}")
            }
        })
        .collect();
    anyhow!("invalid data: {}", details.join("; "))
}

fn print_record(out: &mut dyn Write, record: &Record) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        colored::control::set_override(false);
        Session::new(&AppConfig::default(), false).unwrap()
    }

    async fn run_text(session: &Session, command: Command) -> Result<String> {
        let mut out = Vec::new();
        execute(session, &command, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    fn list(entity: &str, parent: Option<&str>) -> Command {
        Command::List {
            entity: entity.into(),
            filters: Vec::new(),
            parent: parent.map(Into::into),
            search: None,
            page: None,
        }
    }

    #[tokio::test]
    async fn test_nav_lists_entities() {
        let text = run_text(&session(), Command::Nav).await.unwrap();
        assert!(text.contains("Categories"));
        assert!(text.contains("/modules/:moduleId/lessons"));
    }

    #[tokio::test]
    async fn test_list_uses_table_columns() {
        let text = run_text(&session(), list("categories", None)).await.unwrap();
        assert!(text.contains("Nom"));
        assert!(text.contains("Livres"));
        // slug is hidden from tables
        assert!(!text.contains("Slug"));
        assert!(text.contains("4 of 4 categories"));
    }

    #[tokio::test]
    async fn test_nested_list_requires_parent() {
        let err = run_text(&session(), list("lessons", None)).await.unwrap_err();
        assert!(err.to_string().contains("--parent"));

        let text = run_text(&session(), list("lessons", Some("module-2")))
            .await
            .unwrap();
        assert!(text.contains("Accueil des passagers"));
        assert!(!text.contains("Évacuation"));
    }

    #[tokio::test]
    async fn test_create_then_list_in_same_session() {
        let session = session();
        let text = run_text(
            &session,
            Command::Create {
                entity: "categories".into(),
                data: r#"{"name": "Jouets", "slug": "jouets"}"#.into(),
                parent: None,
            },
        )
        .await
        .unwrap();
        assert!(text.contains("Categories created"));
        assert!(text.contains("Jouets"));

        let text = run_text(&session, list("categories", None)).await.unwrap();
        assert!(text.contains("5 of 5 categories"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_data() {
        let err = run_text(
            &session(),
            Command::Create {
                entity: "categories".into(),
                data: r#"{"name": "J"}"#.into(),
                parent: None,
            },
        )
        .await
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name"));
        assert!(message.contains("slug"));
    }

    #[tokio::test]
    async fn test_create_on_read_only_entity_refused() {
        let err = run_text(
            &session(),
            Command::Create {
                entity: "bookings".into(),
                data: "{}".into(),
                parent: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "create is disabled for Bookings");
    }

    #[tokio::test]
    async fn test_delete_unknown_reports_error_notification() {
        let session = session();
        let mut out = Vec::new();
        let err = execute(
            &session,
            &Command::Delete {
                entity: "routes".into(),
                id: "route-42".into(),
                parent: None,
            },
            &mut out,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("route-42"));
    }

    #[tokio::test]
    async fn test_describe_json_lists_select_options() {
        let mut session = session();
        session.json = true;
        let text = run_text(
            &session,
            Command::Describe {
                entity: "bookings".into(),
            },
        )
        .await
        .unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();
        let columns = doc["columns"].as_array().unwrap();

        let status = columns.iter().find(|c| c["name"] == "status").unwrap();
        assert_eq!(status["options"][1]["value"], "paid");
        assert_eq!(status["multiple"], false);

        let seats = columns.iter().find(|c| c["name"] == "seats").unwrap();
        assert_eq!(seats["options"], serde_json::json!([]));
        assert_eq!(seats["multiple"], true);
    }

    #[tokio::test]
    async fn test_unknown_entity() {
        let err = run_text(
            &session(),
            Command::Describe {
                entity: "planets".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("available: categories"));
    }
}
