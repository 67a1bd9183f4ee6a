//! # Shop Configuration
//!
//! TOML-backed shop settings with `AYMUR_*` environment overrides.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Config Resolution Pipeline                          │
//! │                                                                         │
//! │   built-in defaults                                                     │
//! │        │                                                                │
//! │        ▼  overridden by                                                 │
//! │   config.toml (platform config dir, or explicit path)                   │
//! │        │                                                                │
//! │        ▼  overridden by                                                 │
//! │   AYMUR_* environment variables                                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   validate() ── reject before anything downstream sees bad values      │
//! │                                                                         │
//! │  Unknown TOML keys are rejected (deny_unknown_fields): a typo'd key    │
//! │  fails loudly instead of silently using the default.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use aymur_core::types::TaxRate;
use aymur_core::validation::{validate_currency_code, validate_tax_rate_bps};
use aymur_core::DEFAULT_SHOP_ID;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Shop Config
// =============================================================================

/// Per-shop settings: identity, currency presentation, default tax rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShopConfig {
    /// Tenant id this installation belongs to.
    pub shop_id: String,

    /// Display name on receipts and the title bar.
    pub shop_name: String,

    /// ISO 4217 code, 3 uppercase ASCII letters.
    pub currency_code: String,

    /// Symbol prefixed to formatted amounts.
    pub currency_symbol: String,

    /// Fractional digits shown when formatting (0..=4).
    pub currency_decimals: u32,

    /// Default tax rate in basis points (825 = 8.25%).
    pub tax_rate_bps: u32,

    /// Explicit session snapshot path; `None` uses the platform data dir.
    pub session_file: Option<PathBuf>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            shop_id: DEFAULT_SHOP_ID.to_string(),
            shop_name: "Aymur Jewellers".to_string(),
            currency_code: "PKR".to_string(),
            currency_symbol: "₨".to_string(),
            currency_decimals: 2,
            tax_rate_bps: 0,
            session_file: None,
        }
    }
}

impl ShopConfig {
    /// The platform-standard config file path
    /// (e.g. `~/.config/aymur/config.toml` on Linux).
    pub fn default_path() -> ConfigResult<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "aymur", "aymur")
            .ok_or(ConfigError::NoPath)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Loads from an explicit TOML file, applies env overrides, validates.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: ShopConfig = toml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        info!(path = ?path, shop = %config.shop_name, "config loaded");
        Ok(config)
    }

    /// Loads from the platform config path, falling back to defaults when no
    /// file exists. Env overrides and validation apply either way.
    pub fn load_or_default() -> ConfigResult<Self> {
        Self::load_or_default_from(&Self::default_path()?)
    }

    /// Same fallback behavior against an explicit path.
    pub fn load_or_default_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            return Self::load(path);
        }

        debug!(path = ?path, "no config file, using defaults");
        let mut config = ShopConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Writes the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        info!(path = ?path, "config saved");
        Ok(())
    }

    /// Applies `AYMUR_*` environment variables over the current values.
    /// Unparseable numeric values are left alone rather than erroring.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("AYMUR_SHOP_ID") {
            self.shop_id = v;
        }
        if let Ok(v) = env::var("AYMUR_SHOP_NAME") {
            self.shop_name = v;
        }
        if let Ok(v) = env::var("AYMUR_CURRENCY_CODE") {
            self.currency_code = v;
        }
        if let Ok(v) = env::var("AYMUR_CURRENCY_SYMBOL") {
            self.currency_symbol = v;
        }
        if let Ok(v) = env::var("AYMUR_CURRENCY_DECIMALS") {
            if let Ok(n) = v.parse() {
                self.currency_decimals = n;
            }
        }
        if let Ok(v) = env::var("AYMUR_TAX_RATE_BPS") {
            if let Ok(n) = v.parse() {
                self.tax_rate_bps = n;
            }
        }
        if let Ok(v) = env::var("AYMUR_SESSION_FILE") {
            self.session_file = Some(PathBuf::from(v));
        }
    }

    /// Rejects out-of-range or malformed settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shop_name.trim().is_empty() {
            return Err(ConfigError::invalid("shop_name", "must not be empty"));
        }
        validate_currency_code(&self.currency_code)
            .map_err(|e| ConfigError::invalid("currency_code", e.to_string()))?;
        if self.currency_decimals > 4 {
            return Err(ConfigError::invalid(
                "currency_decimals",
                "must be at most 4",
            ));
        }
        validate_tax_rate_bps(self.tax_rate_bps)
            .map_err(|e| ConfigError::invalid("tax_rate_bps", e.to_string()))?;
        Ok(())
    }

    /// The configured default tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Formats integer cents for display: symbol, thousands-separated
    /// integer part, configured decimals.
    ///
    /// With the defaults, `125_000` renders as `₨1,250.00` and `-50`
    /// as `-₨0.50`.
    pub fn format_currency(&self, cents: i64) -> String {
        let negative = cents < 0;
        let cents = cents.unsigned_abs();

        let divisor = 10u64.pow(self.currency_decimals.min(4));
        let (whole, frac) = if divisor == 1 {
            (cents, 0)
        } else {
            (cents / divisor, cents % divisor)
        };

        let mut grouped = String::new();
        for (i, digit) in whole.to_string().chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        let grouped: String = grouped.chars().rev().collect();

        let sign = if negative { "-" } else { "" };
        if self.currency_decimals == 0 {
            format!("{}{}{}", sign, self.currency_symbol, grouped)
        } else {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                grouped,
                frac,
                width = self.currency_decimals as usize
            )
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // std::env is process-global and tests run in parallel. Every test that
    // sets AYMUR_* vars, or that goes through a load path (which reads
    // them), must hold this lock so a writer can never interleave with a
    // reader.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ShopConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.currency_code, "PKR");
        assert_eq!(config.tax_rate().bps(), 0);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ShopConfig::default();
        config.shop_name = "Aymur Karachi".to_string();
        config.tax_rate_bps = 1700;
        config.session_file = Some(PathBuf::from("/tmp/aymur-session.json"));

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ShopConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: ShopConfig = toml::from_str("shop_name = \"Aymur Lahore\"").unwrap();
        assert_eq!(parsed.shop_name, "Aymur Lahore");
        assert_eq!(parsed.currency_code, "PKR");
        assert_eq!(parsed.currency_decimals, 2);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<ShopConfig, _> = toml::from_str("shop_nmae = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ShopConfig::default();
        config.currency_code = "pkr".to_string();
        assert!(config.validate().is_err());

        let mut config = ShopConfig::default();
        config.currency_decimals = 5;
        assert!(config.validate().is_err());

        let mut config = ShopConfig::default();
        config.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());

        let mut config = ShopConfig::default();
        config.shop_name = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        let config = ShopConfig::default();
        assert_eq!(config.format_currency(125_000), "₨1,250.00");
        assert_eq!(config.format_currency(50), "₨0.50");
        assert_eq!(config.format_currency(0), "₨0.00");
        assert_eq!(config.format_currency(-125_000), "-₨1,250.00");
        assert_eq!(config.format_currency(100_000_000), "₨1,000,000.00");
    }

    #[test]
    fn test_format_currency_zero_decimals() {
        let mut config = ShopConfig::default();
        config.currency_decimals = 0;
        config.currency_symbol = "Rs ".to_string();
        assert_eq!(config.format_currency(1_250), "Rs 1,250");
    }

    #[test]
    fn test_save_and_load() {
        let _guard = env_guard();
        let dir = std::env::temp_dir().join(format!("aymur-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = ShopConfig::default();
        config.shop_name = "Aymur Islamabad".to_string();
        config.save(&path).unwrap();

        let loaded = ShopConfig::load(&path).unwrap();
        assert_eq!(loaded.shop_name, "Aymur Islamabad");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let _guard = env_guard();
        let path = std::env::temp_dir().join("aymur-no-such-config.toml");

        let config = ShopConfig::load_or_default_from(&path).unwrap();
        assert_eq!(config, ShopConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let _guard = env_guard();
        env::set_var("AYMUR_SHOP_NAME", "Env Shop");
        env::set_var("AYMUR_TAX_RATE_BPS", "825");
        env::set_var("AYMUR_CURRENCY_DECIMALS", "not-a-number");

        let mut config = ShopConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.shop_name, "Env Shop");
        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.currency_decimals, 2); // unparseable value ignored

        // Env wins over a value loaded from file
        let dir = std::env::temp_dir().join(format!("aymur-env-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut on_disk = ShopConfig::default();
        on_disk.shop_name = "Aymur Islamabad".to_string();
        on_disk.save(&path).unwrap();

        let loaded = ShopConfig::load(&path).unwrap();
        assert_eq!(loaded.shop_name, "Env Shop");
        assert_eq!(loaded.tax_rate_bps, 825);

        let _ = fs::remove_dir_all(&dir);
        env::remove_var("AYMUR_SHOP_NAME");
        env::remove_var("AYMUR_TAX_RATE_BPS");
        env::remove_var("AYMUR_CURRENCY_DECIMALS");
    }
}
