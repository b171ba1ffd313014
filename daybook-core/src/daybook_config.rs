//! Global daybook configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DaybookError, DaybookResult};
use crate::keyword::keyword_enum;

pub const DEFAULT_AGENDA_DAYS: i64 = 7;
pub const DEFAULT_MONTH_CELL_LIMIT: usize = 3;
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("daybook")
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

fn default_agenda_days() -> i64 {
    DEFAULT_AGENDA_DAYS
}

fn default_month_cell_limit() -> usize {
    DEFAULT_MONTH_CELL_LIMIT
}

fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}

/// Settings that `daybook config set` can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DataDir,
    AgendaDays,
    MonthCellLimit,
    UpcomingLimit,
}

keyword_enum!(ConfigKey, "setting", {
    DataDir => "data_dir",
    AgendaDays => "agenda_days",
    MonthCellLimit => "month_cell_limit",
    UpcomingLimit => "upcoming_limit",
});

/// Global configuration at ~/.config/daybook/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DaybookConfig {
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    /// Days covered by the agenda when no window is given.
    #[serde(default = "default_agenda_days")]
    pub agenda_days: i64,

    /// Events shown in a month cell before it reports "+N more".
    #[serde(default = "default_month_cell_limit")]
    pub month_cell_limit: usize,

    /// Events shown in the upcoming summary.
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            data_dir: default_data_dir(),
            agenda_days: DEFAULT_AGENDA_DAYS,
            month_cell_limit: DEFAULT_MONTH_CELL_LIMIT,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> DaybookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DaybookError::Config("Could not determine config directory".into()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Read the config file alone, without environment overrides. A missing
    /// file gives the defaults.
    pub fn read(path: &Path) -> DaybookResult<Self> {
        if !path.exists() {
            return Ok(DaybookConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DaybookError::Config(format!("Could not read config file: {e}")))?;
        toml::from_str(&content).map_err(|e| DaybookError::Config(e.to_string()))
    }

    pub fn set(&mut self, key: ConfigKey, value: &str) -> DaybookResult<()> {
        let value = value.trim();
        let number = || {
            value.parse::<usize>().map_err(|_| {
                DaybookError::validation(format!("{key} must be a whole number, got '{value}'"))
            })
        };

        match key {
            ConfigKey::DataDir => {
                if value.is_empty() {
                    return Err(DaybookError::validation("data_dir cannot be empty"));
                }
                self.data_dir = PathBuf::from(value);
            }
            ConfigKey::AgendaDays => {
                self.agenda_days = i64::try_from(number()?)
                    .map_err(|_| DaybookError::validation("agenda_days is too large"))?;
            }
            ConfigKey::MonthCellLimit => self.month_cell_limit = number()?,
            ConfigKey::UpcomingLimit => self.upcoming_limit = number()?,
        }
        Ok(())
    }

    /// Save the config to the given path.
    pub fn save(&self, path: &Path) -> DaybookResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DaybookError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DaybookResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where tasks, notes, goals, events and your profile are stored:
# data_dir = \"~/.local/share/daybook\"

# Days shown by `daybook cal agenda` when --days is not given:
# agenda_days = {DEFAULT_AGENDA_DAYS}

# Events listed per day in the month view:
# month_cell_limit = {DEFAULT_MONTH_CELL_LIMIT}

# Events listed in the upcoming summary:
# upcoming_limit = {DEFAULT_UPCOMING_LIMIT}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DaybookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
