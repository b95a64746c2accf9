//! Layered settings: config file, then environment, then flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;

use crate::error::CliError;

pub const ENV_BASE_URL: &str = "ERPKIT_BASE_URL";
pub const ENV_TOKEN: &str = "ERPKIT_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: 30,
            log_level: "info".to_string(),
            page_size: 10,
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub verbose: bool,
}

impl Settings {
    /// Read `path`; a missing file gives the defaults.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(CliError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.base_url = Some(url);
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.is_empty()) {
            self.token = Some(token);
        }
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.base_url {
            self.base_url = Some(url);
        }
        if let Some(token) = overrides.token {
            self.token = Some(token);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
        if overrides.verbose {
            self.log_level = "debug".to_string();
        }
    }

    /// Config file, environment and flags, in that order.
    pub fn load(overrides: Overrides) -> Result<Self, CliError> {
        let mut settings = match crate::paths::config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings.apply_overrides(overrides);
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Unknown levels fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"base_url": "https://erp.example.com/api"}"#).unwrap();
        assert_eq!(settings.base_url.as_deref(), Some("https://erp.example.com/api"));
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.page_size, 10);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("erpkit-no-such-config.json");
        assert_eq!(Settings::from_file(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_layering() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_BASE_URL, "https://env.example.com"), (ENV_TOKEN, "")]);
        let mut settings = Settings {
            token: Some("from-file".to_string()),
            ..Settings::default()
        };

        settings.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(settings.token.as_deref(), Some("from-file"));

        settings.apply_overrides(Overrides {
            base_url: Some("https://flag.example.com".to_string()),
            verbose: true,
            ..Overrides::default()
        });
        assert_eq!(settings.base_url.as_deref(), Some("https://flag.example.com"));
        assert_eq!(settings.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_bad_level_falls_back() {
        let settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.level_filter(), LevelFilter::Info);
    }
}
