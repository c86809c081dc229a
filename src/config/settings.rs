//! User settings for coinlog
//!
//! Preferences that shape import parsing and the default list view.

use serde::{Deserialize, Serialize};

use super::paths::CoinlogPaths;
use crate::error::CoinlogError;
use crate::ledger::LedgerFilter;

/// User settings for coinlog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date format tried first when parsing imported date cells (strftime)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_date_format: Option<String>,

    /// Year the list view filters on when none is given (None = every year)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_year: Option<i32>,

    /// Maximum rows printed by `coinlog list`
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    /// Whether the demo sample data has been seeded
    #[serde(default)]
    pub sample_data_seeded: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_list_limit() -> usize {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            import_date_format: None,
            default_year: None,
            list_limit: default_list_limit(),
            sample_data_seeded: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &CoinlogPaths) -> Result<Self, CoinlogError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| CoinlogError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| CoinlogError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CoinlogPaths) -> Result<(), CoinlogError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CoinlogError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CoinlogError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Start a list filter from the saved defaults
    pub fn base_filter(&self) -> LedgerFilter {
        match self.default_year {
            Some(year) => LedgerFilter::new().year(year),
            None => LedgerFilter::new(),
        }
    }
}
