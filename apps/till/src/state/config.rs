//! # Till Configuration
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`DUKA_*`)
//! 2. Config file (`DUKA_CONFIG`, or `config.toml` in the platform config dir)
//! 3. Defaults (this file)
//!
//! ## Example config.toml
//! ```toml
//! walk_in_label = "Walk-in"
//! stock_policy = "reject"
//! receipt_dir = "/srv/duka/receipts"
//!
//! [store]
//! name = "Duka Orthopedics"
//! address = ["Moi Avenue", "Nairobi"]
//!
//! [currency]
//! symbol = "KES"
//! decimals = 0
//!
//! [receipt]
//! logo_path = "/srv/duka/logo.png"
//! footer = "Asante sana!"
//!
//! [receipt.page]
//! top_margin_mm = 20.0
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization and shared behind an
//! `Arc`, so no mutex is needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use duka_core::{CurrencyFormat, Money, StockPolicy, WALK_IN_CUSTOMER};
use duka_receipt::{Issuer, ReceiptRenderer, ReceiptSettings};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DUKA_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Load(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TillConfig {
    /// Customer name recorded when the cashier leaves it blank.
    #[serde(default = "default_walk_in_label")]
    pub walk_in_label: String,

    #[serde(default)]
    pub stock_policy: StockPolicy,

    /// Load the demo catalog on startup.
    #[serde(default = "default_true")]
    pub seed_demo: bool,

    /// Where receipt PDFs are written. Defaults to the platform data dir.
    #[serde(default)]
    pub receipt_dir: Option<PathBuf>,

    /// Window for the "expiring soon" inventory report.
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,

    /// Shop identity printed at the top of every receipt.
    #[serde(default)]
    pub store: Issuer,

    #[serde(default)]
    pub currency: CurrencyFormat,

    #[serde(default)]
    pub receipt: ReceiptSettings,
}

fn default_walk_in_label() -> String {
    WALK_IN_CUSTOMER.to_string()
}

fn default_true() -> bool {
    true
}

fn default_expiry_warning_days() -> i64 {
    30
}

impl Default for TillConfig {
    fn default() -> Self {
        TillConfig {
            walk_in_label: default_walk_in_label(),
            stock_policy: StockPolicy::default(),
            seed_demo: default_true(),
            receipt_dir: None,
            expiry_warning_days: default_expiry_warning_days(),
            store: Issuer::default(),
            currency: CurrencyFormat::default(),
            receipt: ReceiptSettings::default(),
        }
    }
}

impl TillConfig {
    /// Loads configuration: defaults, then the TOML file, then `DUKA_*`
    /// environment overrides, then validation.
    ///
    /// `config_path` wins over `DUKA_CONFIG`, which wins over the platform
    /// default. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);
        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading till config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Checks the values the rest of the till relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walk_in_label.trim().is_empty() {
            return Err(ConfigError::Invalid("walk_in_label must not be empty".into()));
        }

        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store.name must not be empty".into()));
        }

        if self.currency.decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "currency.decimals must be at most 4, got {}",
                self.currency.decimals
            )));
        }

        if self.expiry_warning_days < 0 {
            return Err(ConfigError::Invalid(
                "expiry_warning_days must not be negative".into(),
            ));
        }

        if self.receipt.wrap_width < 8 {
            return Err(ConfigError::Invalid(
                "receipt.wrap_width must be at least 8".into(),
            ));
        }

        if self.receipt.logo_width_mm <= 0.0 {
            return Err(ConfigError::Invalid(
                "receipt.logo_width_mm must be greater than 0".into(),
            ));
        }

        let page = &self.receipt.page;
        if page.line_height_mm <= 0.0
            || page.left_margin_mm + page.right_margin_mm >= page.page_width_mm
            || page.top_margin_mm + page.bottom_margin_mm >= page.page_height_mm
        {
            return Err(ConfigError::Invalid(
                "receipt.page margins leave no printable area".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `DUKA_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("DUKA_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Some(symbol) = lookup("DUKA_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(decimals) = lookup("DUKA_CURRENCY_DECIMALS") {
            match decimals.parse::<u8>() {
                Ok(d) => self.currency.decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring invalid DUKA_CURRENCY_DECIMALS"),
            }
        }

        if let Some(policy) = lookup("DUKA_STOCK_POLICY") {
            match policy.parse::<StockPolicy>() {
                Ok(parsed) => {
                    debug!(policy = %parsed, "Overriding stock policy from environment");
                    self.stock_policy = parsed;
                }
                Err(_) => warn!(policy = %policy, "Unknown stock policy in environment"),
            }
        }

        if let Some(label) = lookup("DUKA_WALK_IN_LABEL") {
            self.walk_in_label = label;
        }

        if let Some(dir) = lookup("DUKA_RECEIPT_DIR") {
            self.receipt_dir = Some(PathBuf::from(dir));
        }

        if let Some(logo) = lookup("DUKA_LOGO_PATH") {
            self.receipt.logo_path = Some(PathBuf::from(logo));
        }

        if let Some(seed) = lookup("DUKA_SEED_DEMO") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed_demo = true,
                "0" | "false" | "no" => self.seed_demo = false,
                _ => warn!(value = %seed, "Ignoring invalid DUKA_SEED_DEMO"),
            }
        }
    }

    /// `config.toml` in the platform config directory.
    fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "duka", "pos").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Directory receipt PDFs are written to.
    ///
    /// ## Platform-Specific Defaults
    /// - **macOS**: `~/Library/Application Support/com.duka.pos/receipts`
    /// - **Windows**: `%APPDATA%\duka\pos\data\receipts`
    /// - **Linux**: `~/.local/share/pos/receipts`
    pub fn receipt_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.receipt_dir {
            return dir.clone();
        }

        ProjectDirs::from("com", "duka", "pos")
            .map(|dirs| dirs.data_dir().join("receipts"))
            .unwrap_or_else(|| PathBuf::from("receipts"))
    }

    /// Formats an amount with the configured currency (`KES 2,500`).
    pub fn format_money(&self, money: Money) -> String {
        self.currency.format(money)
    }

    /// Builds the receipt renderer for this shop.
    pub fn renderer(&self) -> ReceiptRenderer {
        ReceiptRenderer::new(self.store.clone(), self.currency.clone(), self.receipt.clone())
    }
}
