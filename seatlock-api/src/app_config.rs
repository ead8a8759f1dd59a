use seatlock_core::{
    seat_catalog, validate_catalog, CatalogError, LockExpiryPolicy, DEFAULT_LOCK_DURATION_MS,
    MAX_LOCK_DURATION_MS,
};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub seats: SeatsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeatsConfig {
    #[serde(default = "default_lock_duration_ms")]
    pub lock_duration_ms: u64,
    /// 0 turns the background sweep off; lazy expiry still applies
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
    /// Explicit seat ids. When absent the catalog is generated from rows x seats_per_row.
    pub catalog: Option<Vec<String>>,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_seats_per_row")]
    pub seats_per_row: u32,
}

impl Default for SeatsConfig {
    fn default() -> Self {
        Self {
            lock_duration_ms: default_lock_duration_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
            catalog: None,
            rows: default_rows(),
            seats_per_row: default_seats_per_row(),
        }
    }
}

fn default_port() -> u16 { 8080 }
fn default_lock_duration_ms() -> u64 { DEFAULT_LOCK_DURATION_MS }
fn default_sweep_interval_ms() -> u64 { 1_000 }
fn default_rows() -> u32 { 5 }
fn default_seats_per_row() -> u32 { 10 }

impl SeatsConfig {
    pub fn policy(&self) -> LockExpiryPolicy {
        LockExpiryPolicy::from_millis(self.lock_duration_ms)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_ms > 0).then(|| Duration::from_millis(self.sweep_interval_ms))
    }

    pub fn catalog_ids(&self) -> Result<Vec<String>, CatalogError> {
        match &self.catalog {
            Some(ids) => validate_catalog(ids),
            None => validate_catalog(seat_catalog(self.rows, self.seats_per_row)?),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("seats.lock_duration_ms must be greater than zero")]
    InvalidLockDuration,

    #[error("seats.lock_duration_ms must not exceed {max} ms")]
    LockDurationTooLong { max: u64 },

    #[error("Invalid seat catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. SEATLOCK__SEATS__LOCK_DURATION_MS=30000
            .add_source(
                config::Environment::with_prefix("SEATLOCK")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("seats.catalog"),
            );

        Self::from_builder(builder)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats.lock_duration_ms == 0 {
            return Err(ConfigError::InvalidLockDuration);
        }
        if self.seats.lock_duration_ms > MAX_LOCK_DURATION_MS {
            return Err(ConfigError::LockDurationTooLong { max: MAX_LOCK_DURATION_MS });
        }
        self.seats.catalog_ids()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.seats.lock_duration_ms, 60_000);
        assert_eq!(config.seats.sweep_interval(), Some(Duration::from_secs(1)));

        let ids = config.seats.catalog_ids().unwrap();
        assert_eq!(ids.len(), 50);
        assert_eq!(ids.first().map(String::as_str), Some("A1"));
        assert_eq!(ids.last().map(String::as_str), Some("E10"));
    }

    #[test]
    fn test_explicit_catalog_and_overrides() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [seats]
            lock_duration_ms = 5000
            sweep_interval_ms = 0
            catalog = ["A1", "A2", "VIP1"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.seats.policy().lock_duration(), chrono::Duration::seconds(5));
        assert_eq!(config.seats.sweep_interval(), None);
        assert_eq!(config.seats.catalog_ids().unwrap(), vec!["A1", "A2", "VIP1"]);
    }

    #[test]
    fn test_rejects_zero_lock_duration() {
        let err = Config::from_toml_str("[seats]\nlock_duration_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLockDuration));
    }

    #[test]
    fn test_lock_duration_upper_bound() {
        let with_duration = |lock_duration_ms| Config {
            seats: SeatsConfig { lock_duration_ms, ..SeatsConfig::default() },
            ..Config::default()
        };

        for ms in [u64::MAX, 9_000_000_000_000_000_000, MAX_LOCK_DURATION_MS + 1] {
            let err = with_duration(ms).validate().unwrap_err();
            assert!(matches!(err, ConfigError::LockDurationTooLong { max: MAX_LOCK_DURATION_MS }));
        }
        assert!(with_duration(MAX_LOCK_DURATION_MS).validate().is_ok());

        let err = Config::from_toml_str("[seats]\nlock_duration_ms = 86400001").unwrap_err();
        assert!(matches!(err, ConfigError::LockDurationTooLong { .. }));
    }

    #[test]
    fn test_rejects_oversized_generated_catalog() {
        let err = Config::from_toml_str("[seats]\nrows = 70000\nseats_per_row = 70000").unwrap_err();
        assert!(matches!(err, ConfigError::Catalog(CatalogError::TooLarge { .. })));
    }

    #[test]
    fn test_load_without_config_files() {
        // The crate directory has no config/ folder, so every file source is skipped
        let config = Config::load().unwrap();
        assert!(config.seats.lock_duration_ms > 0);
        assert!(config.seats.catalog_ids().is_ok());
    }

    #[test]
    fn test_rejects_duplicate_seats() {
        let err = Config::from_toml_str("[seats]\ncatalog = [\"A1\", \"A1\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Catalog(CatalogError::Duplicate(_))));
    }
}
