use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::DEFAULT_CONTEXT_LIMIT;
use crate::error::{Result, StoreError};
use crate::ledger::{ConfiguredLedger, DisabledLedger, HttpLedger};
use crate::store::MemoryStore;

pub const DEFAULT_LEDGER_TIMEOUT_MS: u64 = 5_000;
pub const MIN_LEDGER_TIMEOUT_MS: u64 = 1;
pub const MAX_LEDGER_TIMEOUT_MS: u64 = 30_000;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "LUX_CONFIG";

/// On-disk configuration. Every field has a default, so an empty or
/// missing file is valid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuxConfig {
    pub ledger: LedgerConfig,
    pub context: ContextConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// HTTP endpoint receiving ledger records; absent means disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: DEFAULT_LEDGER_TIMEOUT_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub limit: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_CONTEXT_LIMIT,
        }
    }
}

impl LuxConfig {
    /// Load from `path`. `None` or a nonexistent file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if let Some(endpoint) = &config.ledger.endpoint
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(StoreError::Config(format!(
                "ledger.endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Ledger timeout clamped to the honoured range.
    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_millis(
            self.ledger
                .timeout_ms
                .clamp(MIN_LEDGER_TIMEOUT_MS, MAX_LEDGER_TIMEOUT_MS),
        )
    }

    pub fn build_ledger(&self) -> Result<ConfiguredLedger> {
        match &self.ledger.endpoint {
            Some(endpoint) => Ok(ConfiguredLedger::Http(HttpLedger::new(
                endpoint.clone(),
                self.ledger_timeout(),
            )?)),
            None => Ok(ConfiguredLedger::Disabled(DisabledLedger)),
        }
    }

    /// Store wired to the configured ledger and timeout.
    pub fn build_store(&self) -> Result<MemoryStore<ConfiguredLedger>> {
        Ok(MemoryStore::with_timeout(
            self.build_ledger()?,
            self.ledger_timeout(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        let config = LuxConfig::from_toml_str("").unwrap();
        assert_eq!(config, LuxConfig::default());
        assert_eq!(config.ledger_timeout(), Duration::from_secs(5));
        assert_eq!(config.context.limit, 100);
    }

    #[test]
    fn test_full_file() {
        let config = LuxConfig::from_toml_str(
            r#"
            [ledger]
            endpoint = "http://localhost:8545/memory"
            timeout_ms = 1500

            [context]
            limit = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.ledger.endpoint.as_deref(), Some("http://localhost:8545/memory"));
        assert_eq!(config.ledger_timeout(), Duration::from_millis(1500));
        assert_eq!(config.context.limit, 25);
    }

    #[test]
    fn test_timeout_clamped() {
        let mut config = LuxConfig::default();
        config.ledger.timeout_ms = 0;
        assert_eq!(config.ledger_timeout(), Duration::from_millis(1));
        config.ledger.timeout_ms = 120_000;
        assert_eq!(config.ledger_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let err = LuxConfig::from_toml_str("[ledger]\nendpoint = \"ftp://x\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = LuxConfig::from_toml_str("[ledger\nendpoint=").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = LuxConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, LuxConfig::default());
        assert_eq!(LuxConfig::load(None).unwrap(), LuxConfig::default());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lux.toml");
        std::fs::write(&path, "[context]\nlimit = 7\n").unwrap();
        let config = LuxConfig::load(Some(&path)).unwrap();
        assert_eq!(config.context.limit, 7);
        assert!(config.ledger.endpoint.is_none());
    }

    #[test]
    fn test_build_ledger() {
        let config = LuxConfig::default();
        assert_eq!(config.build_ledger().unwrap().describe(), "disabled");

        let config =
            LuxConfig::from_toml_str("[ledger]\nendpoint = \"http://127.0.0.1:1/r\"").unwrap();
        assert_eq!(config.build_ledger().unwrap().describe(), "http http://127.0.0.1:1/r");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config =
            LuxConfig::from_toml_str("[ledger]\nendpoint = \"https://l.example/r\"").unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(LuxConfig::from_toml_str(&text).unwrap(), config);
    }
}
