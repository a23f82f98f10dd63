// Application settings
// Loaded from ~/.config/vendorsync/config.toml (or an explicit --config path)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_NAME: &str = "comparison_report.json";

#[derive(Debug)]
pub enum ConfigError {
    /// Explicitly requested file could not be read.
    Read { path: PathBuf, message: String },
    /// File exists but is not valid settings TOML.
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "cannot read config {}: {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Spreadsheet column mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Worksheet holding the vendor table
    pub sheet: String,
    pub id_column: String,
    pub name_column: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            sheet: "vendors".into(),
            id_column: "ID".into(),
            name_column: "Name".into(),
        }
    }
}

/// Remote directory (qbXML relay) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Relay base URL. None = must be given on the command line.
    pub url: Option<String>,
    pub app_name: String,
    /// Company file path; empty = the company currently open in QuickBooks
    pub company_file: String,
    pub qbxml_version: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            url: None,
            app_name: "Vendor Sync".into(),
            company_file: String::new(),
            qbxml_version: "13.0".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub output: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_REPORT_NAME),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub gateway: GatewaySettings,
    pub report: ReportSettings,
}

impl Settings {
    /// Default settings file location
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vendorsync")
            .join("config.toml")
    }

    /// Load from `explicit` if given (must exist), else from the default
    /// location (missing file = defaults).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
