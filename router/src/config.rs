//! Configuration for the compliance router.

use std::{path::Path, time::Duration};

use accredit_common::{config::KYC_COMPLIANCE_CIRCUIT_ID, crypto::Address};
use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Default timeout of a single account fetch, in milliseconds.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Default timeout of a full pool index sync, in milliseconds.
pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 30_000;

const fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

const fn default_sync_timeout_ms() -> u64 {
    DEFAULT_SYNC_TIMEOUT_MS
}

fn default_circuit_id() -> String {
    KYC_COMPLIANCE_CIRCUIT_ID.to_string()
}

/// Verbosity of the router logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Configuration of the compliance router components.
#[derive(Debug, Clone, clap::Args, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Transfer-hook program owning the KYC registries and whitelist entries.
    #[clap(name = "transfer-hook-program-id", long)]
    #[serde(default)]
    pub transfer_hook_program_id: Option<Address>,

    /// Program owning the compliant pool registries.
    #[clap(name = "registry-program-id", long)]
    #[serde(default)]
    pub registry_program_id: Option<Address>,

    /// Authority whose pool registry is indexed.
    #[clap(name = "registry-authority", long)]
    #[serde(default)]
    pub registry_authority: Option<Address>,

    /// Timeout of a single account fetch.
    #[clap(name = "fetch-timeout-ms", long, default_value_t = default_fetch_timeout_ms())]
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Timeout of a full pool index sync.
    #[clap(name = "sync-timeout-ms", long, default_value_t = default_sync_timeout_ms())]
    #[serde(default = "default_sync_timeout_ms")]
    pub sync_timeout_ms: u64,

    /// Maximum number of cached whitelist entries.
    ///
    /// If not provided, the cache is unbounded.
    #[clap(name = "cache-capacity", long)]
    #[serde(default)]
    pub cache_capacity: Option<usize>,

    /// Lifetime of a cached whitelist entry in seconds.
    ///
    /// If not provided, entries stay cached until invalidated.
    #[clap(name = "entry-ttl-secs", long)]
    #[serde(default)]
    pub entry_ttl_secs: Option<u64>,

    /// Circuit used for compliance proofs.
    #[clap(name = "circuit-id", long, default_value_t = default_circuit_id())]
    #[serde(default = "default_circuit_id")]
    pub circuit_id: String,

    /// Log level of the console output.
    #[clap(name = "log-level", long, value_enum, default_value_t = LogLevel::Info)]
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional file receiving a copy of the logs.
    #[clap(name = "log-file", long)]
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            transfer_hook_program_id: None,
            registry_program_id: None,
            registry_authority: None,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            sync_timeout_ms: DEFAULT_SYNC_TIMEOUT_MS,
            cache_capacity: None,
            entry_ttl_secs: None,
            circuit_id: default_circuit_id(),
            log_level: LogLevel::Info,
            log_file: None,
        }
    }
}

impl RouterConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Error while parsing router configuration")
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Error while reading config file {}", path.display()))?;
        Self::from_json_str(&content)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms)
    }

    pub fn entry_ttl(&self) -> Option<Duration> {
        self.entry_ttl_secs.map(Duration::from_secs)
    }

    pub fn require_transfer_hook_program_id(&self) -> Result<Address> {
        self.transfer_hook_program_id
            .context("transfer_hook_program_id is not configured")
    }

    pub fn require_registry_program_id(&self) -> Result<Address> {
        self.registry_program_id
            .context("registry_program_id is not configured")
    }

    pub fn require_registry_authority(&self) -> Result<Address> {
        self.registry_authority
            .context("registry_authority is not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();

        assert!(config.transfer_hook_program_id.is_none());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.sync_timeout(), Duration::from_secs(30));
        assert!(config.cache_capacity.is_none());
        assert!(config.entry_ttl().is_none());
        assert_eq!(config.circuit_id, "kyc_compliance");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = RouterConfig::from_json_str("{}").unwrap();
        assert_eq!(config.fetch_timeout_ms, DEFAULT_FETCH_TIMEOUT_MS);
        assert_eq!(config.sync_timeout_ms, DEFAULT_SYNC_TIMEOUT_MS);
        assert_eq!(config.circuit_id, KYC_COMPLIANCE_CIRCUIT_ID);
    }

    #[test]
    fn test_json_overrides() {
        let program = Address::new([7u8; 32]);
        let json = format!(
            r#"{{
                "transfer_hook_program_id": "{program}",
                "fetch_timeout_ms": 250,
                "cache_capacity": 1000,
                "entry_ttl_secs": 60,
                "log_level": "debug"
            }}"#
        );

        let config = RouterConfig::from_json_str(&json).unwrap();
        assert_eq!(config.require_transfer_hook_program_id().unwrap(), program);
        assert_eq!(config.fetch_timeout(), Duration::from_millis(250));
        assert_eq!(config.cache_capacity, Some(1000));
        assert_eq!(config.entry_ttl(), Some(Duration::from_secs(60)));
        assert_eq!(LevelFilter::from(config.log_level), LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_address_rejected() {
        let json = r#"{ "registry_authority": "not-base58-0OIl" }"#;
        assert!(RouterConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_missing_program_id() {
        let config = RouterConfig::default();
        let err = config.require_registry_program_id().unwrap_err();
        assert!(err.to_string().contains("registry_program_id"));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(RouterConfig::from_json_file("/nonexistent/router.json").is_err());
    }
}
