//! Application configuration
//!
//! Loaded from a TOML file; every section has defaults so an empty (or
//! missing) file is valid.
//!
//! ```toml
//! [backend]
//! mode = "remote"
//! base_url = "http://localhost:3000/api"
//! timeout_secs = 30
//!
//! [mock]
//! latency_ms = 150
//!
//! [ui]
//! page_size = 20
//!
//! [log]
//! level = "debug"
//! ```

use clap::ValueEnum;
use forge_admin::DEFAULT_PAGE_SIZE;
use forge_catalog::{Backend, CatalogOptions};
use forge_core::{AdminError, AdminResult, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "admin-forge.toml";

/// Environment variable overriding `backend.base_url`
pub const API_URL_ENV: &str = "ADMIN_FORGE_API_URL";

// ============================================================================
// Sections
// ============================================================================

/// Where entity data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Mock,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub mode: BackendMode,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Mock,
            base_url: "http://localhost:3000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Simulated delay per call, in milliseconds
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub page_size: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ============================================================================
// AppConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub mock: MockConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(source: &str) -> AdminResult<Self> {
        toml::from_str(source).map_err(|e| AdminError::config(e.to_string()))
    }

    /// Read a TOML file
    pub fn load(path: &Path) -> AdminResult<Self> {
        let source = std::fs::read_to_string(path)?;
        toml::from_str(&source)
            .map_err(|e| AdminError::config(format!("{}: {e}", path.display())))
    }

    /// Resolve the configuration to use
    ///
    /// An explicit path must exist. Without one, `admin-forge.toml` in
    /// `dir` is used when present, otherwise the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> AdminResult<Self> {
        let path: Option<PathBuf> = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(dir.join(CONFIG_FILE)).filter(|p| p.is_file()),
        };
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply an API URL override (from the environment)
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend.base_url = url;
        }
        self
    }

    /// Apply environment overrides
    pub fn with_env(self) -> Self {
        self.with_api_url(std::env::var(API_URL_ENV).ok())
    }

    /// Catalog settings derived from this configuration
    pub fn catalog_options(&self) -> AdminResult<CatalogOptions> {
        let backend = match self.backend.mode {
            BackendMode::Mock => {
                Backend::mock_with_latency(Duration::from_millis(self.mock.latency_ms))
            }
            BackendMode::Remote => Backend::remote(
                self.backend.base_url.as_str(),
                Duration::from_secs(self.backend.timeout_secs),
            )?,
        };
        Ok(CatalogOptions::new(backend).with_page_size(self.ui.page_size))
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> AdminResult<()> {
        if self.backend.mode == BackendMode::Remote {
            if self.backend.base_url.trim().is_empty() {
                return Err(AdminError::config("backend.base_url cannot be empty in remote mode"));
            }
            if self.backend.timeout_secs == 0 {
                return Err(AdminError::config("backend.timeout_secs must be greater than 0"));
            }
        }
        if self.ui.page_size == 0 {
            return Err(AdminError::config("ui.page_size must be greater than 0"));
        }
        Ok(())
    }
}
