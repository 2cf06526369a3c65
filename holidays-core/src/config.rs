//! Application configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{HolidayError, HolidayResult};

/// Prefix for environment overrides, e.g. `HOLIDAYS_OUTPUT_FILE`.
const ENV_PREFIX: &str = "HOLIDAYS";

const LOCAL_CONFIG_CANDIDATES: [&str; 2] = ["config/config.json", "config/config.toml"];

fn default_year_range() -> u32 {
    2
}

/// Where generation reads and writes, and how many years it covers by default.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Path of the generated .ics file
    pub output_file: PathBuf,

    /// Path of the computed-date cache
    pub cache_file: PathBuf,

    /// Years covered when no end year is given
    #[serde(default = "default_year_range")]
    pub default_year_range: u32,
}

impl AppConfig {
    /// Platform config location (~/.config/us-holidays/config.toml on Linux).
    pub fn user_config_path() -> HolidayResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HolidayError::ConfigNotFound(PathBuf::from("<config dir>")))?
            .join("us-holidays");

        Ok(config_dir.join("config.toml"))
    }

    /// Find the config file: `explicit` if given, otherwise the first of
    /// `config/config.json`, `config/config.toml` or the user config path.
    pub fn locate(explicit: Option<&Path>) -> HolidayResult<PathBuf> {
        if let Some(path) = explicit {
            return if path.exists() {
                Ok(path.to_path_buf())
            } else {
                Err(HolidayError::ConfigNotFound(path.to_path_buf()))
            };
        }

        if let Some(local) = LOCAL_CONFIG_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
        {
            return Ok(local);
        }

        let user = Self::user_config_path()?;
        if user.exists() {
            Ok(user)
        } else {
            Err(HolidayError::ConfigNotFound(PathBuf::from(
                LOCAL_CONFIG_CANDIDATES[0],
            )))
        }
    }

    /// Locate and load the config, applying `HOLIDAYS_*` environment overrides.
    pub fn load(explicit: Option<&Path>) -> HolidayResult<Self> {
        let path = Self::locate(explicit)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> HolidayResult<Self> {
        if !path.exists() {
            return Err(HolidayError::ConfigNotFound(path.to_path_buf()));
        }

        let config: AppConfig = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| HolidayError::malformed(path, e.to_string()))?
            .try_deserialize()
            .map_err(|e| HolidayError::malformed(path, e.to_string()))?;

        if config.default_year_range < 1 {
            return Err(HolidayError::malformed(
                path,
                "default_year_range must be at least 1",
            ));
        }

        Ok(config.expanded())
    }

    fn expanded(self) -> Self {
        AppConfig {
            output_file: expand_path(&self.output_file),
            cache_file: expand_path(&self.cache_file),
            ..self
        }
    }
}

/// Expand a leading `~` to the home directory.
fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
