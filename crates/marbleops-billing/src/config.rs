//! # Billing Configuration
//!
//! Seller profile and tax calculation settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MARBLEOPS_SELLER_GSTIN=27AAPFU0939F1ZV                             │
//! │     MARBLEOPS_SELLER_STATE=27                                          │
//! │     MARBLEOPS_ROUNDING=rupee | paisa                                   │
//! │     MARBLEOPS_TAX_MODE=exclusive | inclusive                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/marbleops/billing.toml (Linux)                           │
//! │     ~/Library/Application Support/com.marbleops.marbleops/billing.toml │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Seller in state 27, whole-rupee rounding, exclusive prices         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [seller]
//! name = "Shree Marble Traders"
//! gstin = "27AAPFU0939F1ZV"   # state code is taken from the GSTIN
//!
//! [tax]
//! rounding = "rupee"
//! tax_mode = "exclusive"
//! ```

use marbleops_core::gst::state_name;
use marbleops_core::{Gstin, RoundingPolicy, TaxCalculator, TaxMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{BillingError, BillingResult};

const CONFIG_FILE_NAME: &str = "billing.toml";

// =============================================================================
// Seller Configuration
// =============================================================================

/// The business issuing invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerConfig {
    /// Trade name printed on documents.
    #[serde(default = "default_seller_name")]
    pub name: String,

    /// GSTIN, if registered. Takes precedence for the state code.
    #[serde(default)]
    pub gstin: Option<String>,

    /// State code, for when no GSTIN is configured.
    #[serde(default)]
    pub state_code: Option<String>,
}

fn default_seller_name() -> String {
    "MarbleOps".to_string()
}

fn default_state_code() -> String {
    "27".to_string()
}

impl Default for SellerConfig {
    fn default() -> Self {
        SellerConfig {
            name: default_seller_name(),
            gstin: None,
            state_code: Some(default_state_code()),
        }
    }
}

impl SellerConfig {
    /// The seller's state code: from the GSTIN if set, else `state_code`.
    ///
    /// ## Errors
    /// - GSTIN fails validation
    /// - Both are set and disagree
    /// - Neither is set
    pub fn resolved_state_code(&self) -> BillingResult<String> {
        let explicit = self
            .state_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        match (&self.gstin, explicit) {
            (Some(raw), explicit) => {
                let gstin = Gstin::parse(raw)
                    .map_err(|e| BillingError::InvalidConfig(format!("seller {}", e)))?;
                if let Some(code) = explicit {
                    if marbleops_core::determine_supply_type(code, gstin.state_code()).is_inter_state() {
                        return Err(BillingError::InvalidConfig(format!(
                            "seller state code {} does not match GSTIN state {}",
                            code,
                            gstin.state_code()
                        )));
                    }
                }
                Ok(gstin.state_code().to_string())
            }
            (None, Some(code)) => Ok(code.to_string()),
            (None, None) => Err(BillingError::InvalidConfig(
                "seller needs a GSTIN or a state code".into(),
            )),
        }
    }
}

// =============================================================================
// Tax Settings
// =============================================================================

/// How documents are calculated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Grand total granularity.
    #[serde(default)]
    pub rounding: RoundingPolicy,

    /// Whether unit prices include GST.
    #[serde(default)]
    pub tax_mode: TaxMode,
}

impl TaxSettings {
    pub fn calculator(&self) -> TaxCalculator {
        TaxCalculator::new(self.rounding, self.tax_mode)
    }
}

// =============================================================================
// Main Billing Configuration
// =============================================================================

/// Complete billing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub seller: SellerConfig,

    #[serde(default)]
    pub tax: TaxSettings,
}

impl BillingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (billing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> BillingResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with overrides read through `lookup`.
    fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> BillingResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading billing config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load billing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> BillingResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses TOML text.
    pub fn from_toml(contents: &str) -> BillingResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BillingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BillingError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| BillingError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| BillingError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Billing config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BillingResult<()> {
        if self.seller.name.trim().is_empty() {
            return Err(BillingError::InvalidConfig("seller name is required".into()));
        }

        let state = self.seller.resolved_state_code()?;
        if state_name(&state).is_none() {
            warn!(state_code = %state, "Seller state code is not a GST state code");
        }

        Ok(())
    }

    /// Applies overrides from any key lookup (environment in production).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(gstin) = lookup("MARBLEOPS_SELLER_GSTIN") {
            debug!(gstin = %gstin, "Overriding seller GSTIN from environment");
            self.seller.gstin = Some(gstin);
        }

        if let Some(code) = lookup("MARBLEOPS_SELLER_STATE") {
            debug!(state_code = %code, "Overriding seller state from environment");
            self.seller.state_code = Some(code);
        }

        if let Some(rounding) = lookup("MARBLEOPS_ROUNDING") {
            match rounding.parse() {
                Ok(parsed) => self.tax.rounding = parsed,
                Err(_) => warn!(rounding = %rounding, "Unknown rounding policy in environment"),
            }
        }

        if let Some(mode) = lookup("MARBLEOPS_TAX_MODE") {
            match mode.parse() {
                Ok(parsed) => self.tax.tax_mode = parsed,
                Err(_) => warn!(mode = %mode, "Unknown tax mode in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "marbleops", "marbleops")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
