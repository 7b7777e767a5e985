use serde::Deserialize;
use std::path::Path;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "MOVIEPOLL_CONFIG";

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "secrets.toml";

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

/// Application configuration, read from a TOML secrets file
///
/// The file is optional: without it the server binds locally and keeps
/// records in memory only.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the web server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Remote sheet settings; absent means in-memory storage
    pub sheets: Option<SheetsConfig>,
}

/// Settings for the spreadsheet-backed store
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Identifier of the remote spreadsheet document
    pub spreadsheet_id: String,

    /// Worksheet (tab) holding the records table
    pub worksheet: String,

    /// Service-account bearer token
    pub token: String,

    /// API endpoint; overridable so tests can point at a local stub
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: default_bind_addr(),
            sheets: None,
        }
    }
}

impl AppConfig {
    /// Load the configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the secrets file
    ///
    /// # Returns
    /// * `Result<AppConfig, String>` - The parsed configuration or an error message
    ///
    /// # Errors
    /// * Returns an error if the file cannot be read or parsed, or if the
    ///   sheet settings are present but incomplete
    pub fn load(path: impl AsRef<Path>) -> Result<AppConfig, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read config file: {}", e))?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.bind_addr.is_empty() {
            return Err("bind_addr cannot be empty".to_string());
        }

        if let Some(sheets) = &self.sheets {
            if sheets.spreadsheet_id.is_empty() {
                return Err("sheets.spreadsheet_id cannot be empty".to_string());
            }
            if sheets.worksheet.is_empty() {
                return Err("sheets.worksheet cannot be empty".to_string());
            }
            if sheets.token.is_empty() {
                return Err("sheets.token cannot be empty".to_string());
            }
        }

        Ok(())
    }
}
