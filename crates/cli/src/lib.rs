//! # Forge CLI
//!
//! Command-line front end for Admin Forge.
//!
//! ## Commands
//!
//! - `nav` - Show the navigation built from the entity registry
//! - `describe` - Show an entity's actions, columns and form fields
//! - `list` - List records (`--filter key=value`, `--parent <id>`)
//! - `create` / `update` / `delete` - Mutate records
//!
//! Data comes from in-memory mock lists or a REST backend, per
//! configuration (see [`config::AppConfig`]).

pub mod commands;
pub mod config;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::run;
pub use config::{AppConfig, BackendMode};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(
    name = "admin-forge",
    version,
    about = "Administer declarative entities from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./admin-forge.toml when present)
    #[arg(short, long, global = true, env = "ADMIN_FORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured backend
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendMode>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the navigation menu
    Nav,

    /// Describe an entity
    Describe {
        /// Entity key (e.g. "categories")
        entity: String,
    },

    /// List records of an entity
    List {
        entity: String,
        /// Equality filter, repeatable
        #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
        /// Parent record identifier (nested entities)
        #[arg(short, long)]
        parent: Option<String>,
        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,
        /// 1-based page number
        #[arg(long)]
        page: Option<u32>,
    },

    /// Create a record from a JSON object
    Create {
        entity: String,
        #[arg(short, long)]
        data: String,
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Update fields of a record from a JSON object
    Update {
        entity: String,
        id: String,
        #[arg(short, long)]
        data: String,
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Delete a record
    Delete {
        entity: String,
        id: String,
        #[arg(short, long)]
        parent: Option<String>,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("status=paid").unwrap(),
            ("status".to_string(), "paid".to_string())
        );
        assert_eq!(
            parse_filter("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_filter("status").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "admin-forge",
            "list",
            "lessons",
            "--parent",
            "module-1",
            "-f",
            "title=Évacuation",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::List {
                entity,
                filters,
                parent,
                ..
            } => {
                assert_eq!(entity, "lessons");
                assert_eq!(parent.as_deref(), Some("module-1"));
                assert_eq!(filters, vec![("title".to_string(), "Évacuation".to_string())]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_backend_override_flag() {
        let cli = Cli::try_parse_from(["admin-forge", "--backend", "remote", "nav"]).unwrap();
        assert_eq!(cli.backend, Some(BackendMode::Remote));
        assert!(Cli::try_parse_from(["admin-forge", "--backend", "ftp", "nav"]).is_err());
    }

    #[test]
    fn test_create_requires_data() {
        assert!(Cli::try_parse_from(["admin-forge", "create", "categories"]).is_err());
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
