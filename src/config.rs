use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::DEFAULT_PALETTE;
use crate::date::WeekStart;
use crate::error::{Error, ErrorKind, Result};
use crate::expansion::{DayExpansionTracker, DEFAULT_PREVIEW_CAP};
use crate::tz::parse_timezone;

const CONFIG_PATH_ENV_VAR: &str = "ALMANAC_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("almanac").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".almanac.toml"));
    }

    locations
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: WeekStart,
    pub palette: Vec<String>,
    pub preview_cap: usize,
    pub timezone: Option<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            week_start: WeekStart::default(),
            palette: DEFAULT_PALETTE
                .colors()
                .iter()
                .map(|c| c.as_str().to_owned())
                .collect(),
            preview_cap: DEFAULT_PREVIEW_CAP,
            timezone: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        // Catch unknown zones at load time rather than on first use
        config.tz()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|err| {
            Error::new(
                ErrorKind::ConfigParse,
                &format!("could not read '{}': {}", path.display(), err),
            )
        })?;

        Config::from_toml(&content).map_err(|err| {
            let msg = format!(
                "{} (in '{}')",
                err.message.clone().unwrap_or_default(),
                path.display()
            );
            err.with_msg(&msg)
        })
    }

    pub fn tz(&self) -> Result<Option<Tz>> {
        self.timezone.as_deref().map(parse_timezone).transpose()
    }

    pub fn expansion_tracker(&self) -> DayExpansionTracker {
        DayExpansionTracker::new(self.preview_cap)
    }
}

/// Loads `path` if given, otherwise the first config file found in the usual locations.
/// Falls back to the defaults when there is none.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Using config file '{}'", path.display());
        return Config::from_file(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => {
            log::info!("Using config file '{}'", location.display());
            Config::from_file(&location)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
