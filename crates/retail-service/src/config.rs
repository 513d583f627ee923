//! # Service Configuration
//!
//! Configuration loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`retail.toml`, explicit path or the platform config dir)
//! 3. Environment variables (`RETAIL_*`)
//!
//! ## Example `retail.toml`
//! ```toml
//! [store]
//! name = "Corner Shop"
//! currency_symbol = "$"
//!
//! [limits]
//! max_item_quantity = 999
//! max_transaction_units = 100
//!
//! [logging]
//! filter = "info,retail=debug"
//! ```

use std::path::{Path, PathBuf};

use retail_core::{Money, StoreLimits, MAX_ITEM_QUANTITY, MAX_TRANSACTION_UNITS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "retail.toml";

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,retail=debug";

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Store identity and display settings.
    #[serde(default)]
    pub store: StoreSettings,

    /// Transaction limits handed to the core.
    #[serde(default)]
    pub limits: LimitSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Store name (shown on receipts)
    pub name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Retail Store".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// `[limits]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_item_quantity: i64,
    pub max_transaction_units: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        LimitSettings {
            max_item_quantity: MAX_ITEM_QUANTITY,
            max_transaction_units: MAX_TRANSACTION_UNITS,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive string. `RUST_LOG` still wins when set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a file that exists but does not
    /// parse is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading service config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load service config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        info!(?path, "Service config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(invalid("store.name", "must not be empty"));
        }

        if self.limits.max_item_quantity <= 0 {
            return Err(invalid(
                "limits.max_item_quantity",
                "must be greater than 0",
            ));
        }

        if self.limits.max_transaction_units == 0 {
            return Err(invalid(
                "limits.max_transaction_units",
                "must be greater than 0",
            ));
        }

        EnvFilter::try_new(&self.logging.filter)
            .map_err(|e| invalid("logging.filter", &e.to_string()))?;

        Ok(())
    }

    /// Applies `RETAIL_*` environment variable overrides.
    fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup. Numeric values that fail to
    /// parse are rejected rather than ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("RETAIL_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Some(symbol) = lookup("RETAIL_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(raw) = lookup("RETAIL_MAX_ITEM_QUANTITY") {
            self.limits.max_item_quantity = raw
                .trim()
                .parse()
                .map_err(|_| invalid("RETAIL_MAX_ITEM_QUANTITY", &raw))?;
        }

        if let Some(raw) = lookup("RETAIL_MAX_TRANSACTION_UNITS") {
            self.limits.max_transaction_units = raw
                .trim()
                .parse()
                .map_err(|_| invalid("RETAIL_MAX_TRANSACTION_UNITS", &raw))?;
        }

        if let Some(filter) = lookup("RETAIL_LOG_FILTER") {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.logging.filter = filter;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "retail", "store")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Limits in the form the core store takes.
    pub fn to_limits(&self) -> StoreLimits {
        StoreLimits {
            max_item_quantity: self.limits.max_item_quantity,
            max_transaction_units: self.limits.max_transaction_units,
        }
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.store.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("retail-{}.toml", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.limits.max_item_quantity, 999);
        assert_eq!(config.limits.max_transaction_units, 100);
        assert_eq!(config.to_limits(), StoreLimits::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServiceConfig::default();

        config.limits.max_item_quantity = 0;
        assert!(config.validate().is_err());

        config.limits.max_item_quantity = 10;
        config.limits.max_transaction_units = 0;
        assert!(config.validate().is_err());

        config.limits.max_transaction_units = 10;
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());

        config.store.name = "Corner Shop".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(lookup(&[
                ("RETAIL_STORE_NAME", "Corner Shop"),
                ("RETAIL_CURRENCY_SYMBOL", "€"),
                ("RETAIL_MAX_ITEM_QUANTITY", "12"),
                ("RETAIL_MAX_TRANSACTION_UNITS", " 40 "),
                ("RETAIL_LOG_FILTER", "warn"),
            ]))
            .unwrap();

        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.store.currency_symbol, "€");
        assert_eq!(config.limits.max_item_quantity, 12);
        assert_eq!(config.limits.max_transaction_units, 40);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_bad_numeric_override_is_rejected() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_overrides(lookup(&[("RETAIL_MAX_ITEM_QUANTITY", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "RETAIL_MAX_ITEM_QUANTITY"));
        assert_eq!(config.limits.max_item_quantity, 999);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [store]
            name = "Corner Shop"

            [limits]
            max_transaction_units = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.store.currency_symbol, "$");
        assert_eq!(config.limits.max_transaction_units, 5);
        assert_eq!(config.limits.max_item_quantity, 999);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = temp_path();
        let mut config = ServiceConfig::default();
        config.store.name = "Saved Shop".to_string();
        config.limits.max_item_quantity = 50;

        config.save(Some(path.clone())).unwrap();
        let loaded = ServiceConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let path = temp_path();
        std::fs::write(&path, "[limits]\nmax_item_quantity = \"many\"\n").unwrap();

        let result = ServiceConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ServiceConfig::load_or_default(Some(temp_path()));
        assert_eq!(config.limits, LimitSettings::default());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ServiceConfig::default()).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[limits]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_format_currency() {
        let config = ServiceConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(999)), "$9.99");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "-$5.50");
        assert_eq!(config.format_currency(Money::from_cents(-5)), "-$0.05");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
    }
}
