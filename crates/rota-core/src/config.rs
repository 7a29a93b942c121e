use crate::error::{Result, RotaError};
use crate::week::{WeekClock, DEFAULT_UTC_OFFSET_HOURS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "rota.yaml";

/// Service configuration. Every field has a default, so a missing file or an
/// empty document yields the stock deployment: port 3000, `cleaning.db`,
/// UTC+9 civil time and a Monday 08:00 Asia/Seoul trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// IANA zone the weekly trigger is evaluated in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Six-field cron expression (sec min hour dom month dow).
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn default_port() -> u16 {
    3000
}

fn default_database() -> PathBuf {
    PathBuf::from("cleaning.db")
}

fn default_utc_offset_hours() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn default_timezone() -> String {
    "Asia/Seoul".to_string()
}

fn default_schedule() -> String {
    "0 0 8 * * Mon".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database: default_database(),
            utc_offset_hours: default_utc_offset_hours(),
            timezone: default_timezone(),
            schedule: default_schedule(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(-23..=23).contains(&self.utc_offset_hours) {
            return Err(RotaError::Config(format!(
                "utc_offset_hours must be within -23..=23, got {}",
                self.utc_offset_hours
            )));
        }
        if self.timezone.trim().is_empty() {
            return Err(RotaError::Config("timezone must not be empty".into()));
        }
        if self.schedule.trim().is_empty() {
            return Err(RotaError::Config("schedule must not be empty".into()));
        }
        Ok(())
    }

    pub fn clock(&self) -> Result<WeekClock> {
        WeekClock::from_hours(self.utc_offset_hours)
    }
}
