//! Configuration loaded from `billflow.toml`.
//!
//! The [`BillflowConfig`] struct holds every tunable. Values missing from
//! the file fall back to defaults. The `BILLFLOW_LOG` environment variable
//! takes precedence over the file for the log level.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::billers::BillerCatalog;
use crate::error::BillflowError;

pub const DEFAULT_CONFIG_FILE: &str = "billflow.toml";
pub const LOG_ENV_VAR: &str = "BILLFLOW_LOG";

#[derive(Debug, Clone, Deserialize)]
pub struct BillflowConfig {
    /// Load the three sample bills on startup.
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,

    /// JSON biller catalog. The built-in catalog is used when unset.
    #[serde(default)]
    pub billers_file: Option<PathBuf>,

    /// `tracing` filter directive, e.g. "warn" or "billflow=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BillflowConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: default_seed_sample_data(),
            billers_file: None,
            log_level: default_log_level(),
        }
    }
}

impl BillflowConfig {
    /// Loads `billflow.toml` from the working directory, or defaults.
    pub fn load() -> Result<Self, BillflowError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE), false)
    }

    /// Loads `path`. A missing file yields defaults unless `required`.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, BillflowError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                BillflowError::Config(format!("cannot read {}: {e}", path.display()))
            })?;
            Self::parse(&contents)
                .map_err(|e| BillflowError::Config(format!("{}: {e}", path.display())))?
        } else if required {
            return Err(BillflowError::Config(format!(
                "config file {} not found",
                path.display()
            )));
        } else {
            Self::default()
        };

        if let Ok(level) = std::env::var(LOG_ENV_VAR)
            && !level.is_empty()
        {
            config.log_level = level;
        }

        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// The configured biller catalog, or the built-in one.
    pub fn biller_catalog(&self) -> Result<BillerCatalog, BillflowError> {
        match &self.billers_file {
            Some(path) => BillerCatalog::load(path),
            None => Ok(BillerCatalog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = BillflowConfig::default();
        assert!(config.seed_sample_data);
        assert!(config.billers_file.is_none());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn deserialize_partial_toml() {
        let config = BillflowConfig::parse("seed_sample_data = false").unwrap();
        assert!(!config.seed_sample_data);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn missing_optional_file_falls_back_to_defaults() {
        let config =
            BillflowConfig::load_from(Path::new("/nonexistent/billflow.toml"), false).unwrap();
        assert!(config.seed_sample_data);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let err =
            BillflowConfig::load_from(Path::new("/nonexistent/billflow.toml"), true).unwrap_err();
        assert!(matches!(err, BillflowError::Config(_)));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "seed_sample_data = \"maybe\"").unwrap();
        let err = BillflowConfig::load_from(file.path(), true).unwrap_err();
        assert!(matches!(err, BillflowError::Config(_)));
    }

    #[test]
    fn billers_file_is_loaded() {
        let mut billers = tempfile::NamedTempFile::new().unwrap();
        write!(billers, r#"["Torrent Power - Ahmedabad"]"#).unwrap();
        let config = BillflowConfig {
            billers_file: Some(billers.path().to_path_buf()),
            ..BillflowConfig::default()
        };
        let catalog = config.biller_catalog().unwrap();
        assert_eq!(catalog.names(), ["Torrent Power - Ahmedabad"]);
    }
}
