//! Application configuration management.
//!
//! Configuration selects the backend (a remote API or the in-memory fixture)
//! and its tuning knobs. It is stored at `~/.config/txview/config.json`;
//! environment variables override individual values.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::api::{Backend, Dataset, FixtureBackend, HttpBackend};

/// Application name used for the config directory path
const APP_NAME: &str = "txview";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const ENV_API_URL: &str = "TXVIEW_API_URL";
pub const ENV_FIXTURE: &str = "TXVIEW_FIXTURE";
pub const ENV_LATENCY_MS: &str = "TXVIEW_LATENCY_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Remote API base URL. When unset the fixture backend is used.
    pub api_base_url: Option<String>,
    /// Dataset file for the fixture backend; the bundled dataset otherwise.
    pub fixture_path: Option<PathBuf>,
    pub simulated_latency_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Write to the default location and return the path written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `TXVIEW_*` environment variables on top of the file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(path) = lookup(ENV_FIXTURE).filter(|v| !v.is_empty()) {
            self.fixture_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_LATENCY_MS) {
            match raw.parse() {
                Ok(ms) => self.simulated_latency_ms = Some(ms),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid {}", ENV_LATENCY_MS),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn simulated_latency(&self) -> Option<Duration> {
        self.simulated_latency_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }

    /// Short human-readable description of the configured backend.
    pub fn backend_description(&self) -> String {
        match (&self.api_base_url, &self.fixture_path) {
            (Some(url), _) => format!("remote API at {}", url),
            (None, Some(path)) => format!("fixture {}", path.display()),
            (None, None) => "bundled fixture".to_string(),
        }
    }

    pub fn build_backend(&self) -> Result<Arc<dyn Backend>> {
        if let Some(ref url) = self.api_base_url {
            info!(%url, "Using remote API backend");
            let backend = HttpBackend::with_timeout(url, self.request_timeout())
                .context("Failed to create API client")?;
            return Ok(Arc::new(backend));
        }

        let dataset = match self.fixture_path {
            Some(ref path) => Dataset::from_path(path)?,
            None => Dataset::bundled()?,
        };
        info!(
            employees = dataset.employees.len(),
            transactions = dataset.transactions.len(),
            "Using fixture backend"
        );

        let mut backend = FixtureBackend::new(dataset);
        if let Some(latency) = self.simulated_latency() {
            backend = backend.with_latency(latency);
        }
        Ok(Arc::new(backend))
    }
}
