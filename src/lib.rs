//! pump-inventory: client core for an infusion-pump inventory service.
//!
//! The crate keeps local, in-memory mirrors of the inventory's REST collections
//! (pumps, pump models, institutions, services) in sync with the server, and
//! derives everything a list screen needs from them: filtered views, match
//! highlights, and transient feedback after a create, update or delete.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - AppContext (dependency container)                │
//! │  - Action hooks with expiring messages              │
//! │  - Search overlay                                   │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Store Layer   │   │ Storage Layer │
//! │ (ui/)         │   │ (store/)      │   │ (storage/)    │
//! │ - List views  │   │ - Collections │   │ - Snapshots   │
//! │ - Text render │   │ - Auth        │   │ - Atomic JSON │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                             │
//! ┌─────────────────────────────────────────────────────┐
//! │  Client Layer (client/)                             │
//! │  - Transport trait, reqwest transport               │
//! │  - Envelope decoding, shared credentials            │
//! └─────────────────────────────────────────────────────┘
//!                             │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Records, Resource/Searchable traits, errors      │
//! │  - Data directory layout                            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/pump-inventory/config.toml
//! api_base_url = "https://inventory.example.org/api"
//! request_timeout_secs = 15
//! message_ttl_secs = 3
//! data_dir = "~/.local/share/pump-inventory"
//! persist = true
//! trace_level = "debug"
//! trace_to_stderr = false
//! ```
//!
//! `PUMP_INVENTORY_API_URL`, `PUMP_INVENTORY_DATA_DIR` and
//! `PUMP_INVENTORY_TRACE_LEVEL` override the file.
//!
//! # Example
//!
//! ```no_run
//! use pump_inventory::{initialize, Config};
//!
//! # async fn run() -> pump_inventory::Result<()> {
//! let context = initialize(&Config::default().with_env_overrides())?;
//! context.pumps.set_search_term("maintenance");
//! context.pumps.fetch_all().await;
//! println!("{}", context.pumps.filtered().summary());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod store;
pub mod ui;

pub mod observability;

pub use app::{ActionHook, AppContext};
pub use domain::{InventoryError, Result};

use client::{ApiClient, Credentials, HttpTransport};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use storage::{JsonSnapshotStore, SnapshotStore};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MESSAGE_TTL_SECS: u64 = 3;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL every endpoint path is appended to.
    pub api_base_url: String,

    /// Per-request timeout. Default: 15 seconds.
    pub request_timeout_secs: u64,

    /// How long action feedback stays visible. Default: 3 seconds.
    pub message_ttl_secs: u64,

    /// Where credentials, snapshots and traces are kept. `~` is expanded.
    pub data_dir: Option<String>,

    /// Persist credentials and collection snapshots between runs.
    pub persist: bool,

    /// Filter directive for tracing (`trace`, `debug`, `info`, ...).
    pub trace_level: Option<String>,

    /// Also print tracing events to stderr.
    pub trace_to_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            message_ttl_secs: DEFAULT_MESSAGE_TTL_SECS,
            data_dir: None,
            persist: true,
            trace_level: None,
            trace_to_stderr: false,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Config {
    /// Loads a TOML config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| InventoryError::Config(format!("{}: {e}", path.display())))
    }

    /// Builds a config from string key/value pairs.
    ///
    /// Keys match the file format. Values that fail to parse fall back to their
    /// defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use pump_inventory::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base_url".to_string(), "https://inv.example.org/api".to_string());
    /// map.insert("message_ttl_secs".to_string(), "7".to_string());
    /// map.insert("persist".to_string(), "maybe".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.api_base_url, "https://inv.example.org/api");
    /// assert_eq!(config.message_ttl_secs, 7);
    /// assert!(config.persist);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| map.get(key).map(String::as_str);

        Self {
            api_base_url: get("api_base_url")
                .and_then(non_empty)
                .unwrap_or(defaults.api_base_url),
            request_timeout_secs: get("request_timeout_secs")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            message_ttl_secs: get("message_ttl_secs")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.message_ttl_secs),
            data_dir: get("data_dir").and_then(non_empty),
            persist: get("persist").and_then(parse_bool).unwrap_or(defaults.persist),
            trace_level: get("trace_level").and_then(non_empty),
            trace_to_stderr: get("trace_to_stderr")
                .and_then(parse_bool)
                .unwrap_or(defaults.trace_to_stderr),
        }
    }

    /// Applies `PUMP_INVENTORY_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`, keyed by environment variable name.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("PUMP_INVENTORY_API_URL").as_deref().and_then(non_empty) {
            self.api_base_url = url;
        }
        if let Some(dir) = lookup("PUMP_INVENTORY_DATA_DIR").as_deref().and_then(non_empty) {
            self.data_dir = Some(dir);
        }
        if let Some(level) = lookup("PUMP_INVENTORY_TRACE_LEVEL").as_deref().and_then(non_empty) {
            self.trace_level = Some(level);
        }
        self
    }

    /// Checks values that would otherwise fail later in confusing ways.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Config`] for a non-HTTP base URL or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(InventoryError::Config(format!(
                "api_base_url must start with http:// or https://, got {url:?}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(InventoryError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Resolved data directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        infrastructure::resolve_data_dir(self.data_dir.as_deref())
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// How long action feedback stays visible.
    #[must_use]
    pub const fn message_ttl(&self) -> Duration {
        Duration::from_secs(self.message_ttl_secs)
    }
}

/// Builds the application context.
///
/// With `config.persist`, credentials are loaded from and saved to
/// `<data_dir>/credentials.json` and every collection store hydrates from
/// `<data_dir>/snapshots/`. Otherwise everything lives in memory.
///
/// # Errors
///
/// Returns an error if the config is invalid, the HTTP client cannot be built, or
/// the data directory cannot be prepared.
pub fn initialize(config: &Config) -> Result<AppContext> {
    config.validate()?;
    tracing::debug!(api = %config.api_base_url, persist = config.persist, "initializing client");

    let transport = Arc::new(HttpTransport::new(config.request_timeout())?);

    let (credentials, snapshots) = if config.persist {
        let data_dir = config.data_dir();
        let credentials = Credentials::persisted(infrastructure::credentials_file(&data_dir))?;
        let snapshots: Arc<dyn SnapshotStore> =
            Arc::new(JsonSnapshotStore::new(infrastructure::snapshots_dir(&data_dir))?);
        (credentials, Some(snapshots))
    } else {
        (Credentials::in_memory(), None)
    };

    let api = ApiClient::new(&config.api_base_url, transport, credentials);
    Ok(AppContext::new(api, snapshots, config.message_ttl()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://inv.example.org/api\"\nmessage_ttl_secs = 7\npersist = false\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_base_url, "https://inv.example.org/api");
        assert_eq!(config.message_ttl(), Duration::from_secs(7));
        assert!(!config.persist);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "message_ttl_secs = \"soon\"").unwrap();

        assert!(matches!(Config::from_file(&path), Err(InventoryError::Config(_))));
    }

    #[test]
    fn map_falls_back_on_bad_values() {
        let map = BTreeMap::from([
            ("request_timeout_secs".to_string(), "fast".to_string()),
            ("trace_to_stderr".to_string(), "yes".to_string()),
            ("data_dir".to_string(), "  ".to_string()),
        ]);
        let config = Config::from_map(&map);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(config.trace_to_stderr);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = Config::default().with_overrides(|key| match key {
            "PUMP_INVENTORY_API_URL" => Some("https://override.example/api".into()),
            "PUMP_INVENTORY_TRACE_LEVEL" => Some(" ".into()),
            _ => None,
        });
        assert_eq!(config.api_base_url, "https://override.example/api");
        assert!(config.trace_level.is_none());
    }

    #[test]
    fn validation_rejects_bad_urls() {
        let config = Config {
            api_base_url: "inventory.local".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn initialize_in_memory() {
        let config = Config {
            persist: false,
            ..Config::default()
        };
        let context = initialize(&config).unwrap();
        assert!(!context.auth.is_authenticated());
        assert_eq!(context.pumps.name(), "pumps");
    }

    #[test]
    fn initialize_with_persistence_prepares_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().display().to_string()),
            ..Config::default()
        };
        let context = initialize(&config).unwrap();
        context.credentials.set_token("t");

        assert!(dir.path().join("snapshots").is_dir());
        assert!(dir.path().join("credentials.json").exists());
    }
}
