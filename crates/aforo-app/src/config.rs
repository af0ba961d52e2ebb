//! Configuration management for aforo
//!
//! Config stored at: ~/.config/aforo/config.json

use std::path::{Path, PathBuf};

use aforo_domain::model::Catalogue;
use aforo_infra::catalogue_loader;
use aforo_types::{ConfigError, OutputFormat, Result, SourceEncoding};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Wide CSV export to load by default
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// Encoding of the source CSV (utf8, latin1)
    #[serde(default)]
    pub encoding: SourceEncoding,

    /// Field catalogue TOML override (built-in catalogue when unset)
    #[serde(default)]
    pub catalogue_path: Option<PathBuf>,

    /// Months to forecast
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon: usize,

    /// Default output format (table, json, csv)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Dashboard listen address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_forecast_horizon() -> usize {
    12
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            encoding: SourceEncoding::default(),
            catalogue_path: None,
            forecast_horizon: default_forecast_horizon(),
            output_format: default_output_format(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("aforo");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// CSV to load: the explicit path if given, else the configured one
    pub fn data_path<'a>(&'a self, explicit: Option<&'a Path>) -> Result<&'a Path> {
        explicit
            .or(self.data_path.as_deref())
            .ok_or_else(|| ConfigError::MissingDataPath.into())
    }

    /// Field catalogue: the configured TOML file, or the built-in one
    pub fn catalogue(&self) -> Result<Catalogue> {
        match &self.catalogue_path {
            Some(path) => catalogue_loader::load_from_file(path),
            None => Ok(Catalogue::default()),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Aforo Configuration")?;
        writeln!(f, "===================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Data file:        {}",
            self.data_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        writeln!(f, "Encoding:         {}", self.encoding)?;
        writeln!(
            f,
            "Catalogue:        {}",
            self.catalogue_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(built-in)".to_string())
        )?;
        writeln!(f, "Forecast horizon: {} months", self.forecast_horizon)?;
        writeln!(f, "Output format:    {}", self.output_format)?;
        writeln!(f, "Dashboard addr:   {}", self.bind_addr)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aforo_types::Error;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"encoding": "utf8"}"#).unwrap();
        assert_eq!(config.encoding, SourceEncoding::Utf8);
        assert_eq!(config.forecast_horizon, 12);
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.output_format, OutputFormat::Table);
    }

    #[test]
    fn test_default_encoding_is_latin1() {
        assert_eq!(Config::default().encoding, SourceEncoding::Latin1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            data_path: Some(PathBuf::from("data/aforos.csv")),
            forecast_horizon: 6,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_data_path_precedence() {
        let config = Config {
            data_path: Some(PathBuf::from("configured.csv")),
            ..Config::default()
        };
        let explicit = PathBuf::from("explicit.csv");
        assert_eq!(config.data_path(Some(&explicit)).unwrap(), explicit.as_path());
        assert_eq!(config.data_path(None).unwrap(), Path::new("configured.csv"));

        let err = Config::default().data_path(None).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingDataPath)));
    }
}
