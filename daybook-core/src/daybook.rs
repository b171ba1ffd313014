//! Daybook root: configuration plus the data directory it points at.

use std::path::PathBuf;

use config::{Config, Environment, File};
use tracing::debug;

use crate::daybook_config::DaybookConfig;
use crate::error::{DaybookError, DaybookResult};
use crate::store::Store;

#[derive(Clone)]
pub struct Daybook {
    config: DaybookConfig,
}

impl Daybook {
    /// Load ~/.config/daybook/config.toml (creating a commented default on
    /// first run), with `DAYBOOK_*` environment variables taking precedence.
    pub fn load() -> DaybookResult<Self> {
        let config_path = DaybookConfig::config_path()?;

        if !config_path.exists() {
            DaybookConfig::create_default_config(&config_path)?;
        }

        let config: DaybookConfig = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .add_source(Environment::with_prefix("DAYBOOK").try_parsing(true))
            .build()
            .map_err(|e| DaybookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DaybookError::Config(e.to_string()))?;

        debug!(path = %config_path.display(), "loaded config");

        Ok(Daybook { config })
    }

    pub fn config(&self) -> &DaybookConfig {
        &self.config
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.config.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Open the store backing this daybook, creating the data directory if needed.
    pub fn store(&self) -> DaybookResult<Store> {
        Store::open(self.data_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_created_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let daybook = Daybook {
            config: DaybookConfig {
                data_dir: data_dir.clone(),
                ..DaybookConfig::default()
            },
        };

        let store = daybook.store().unwrap();
        assert_eq!(store.path(), data_dir.as_path());
        assert!(data_dir.is_dir());
    }
}
