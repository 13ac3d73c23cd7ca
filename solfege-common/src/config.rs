//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable consulted for the data folder
pub const DATA_DIR_ENV_VAR: &str = "SOLFEGE_DATA_DIR";

/// Default tempo used for note and cadence durations
pub const DEFAULT_TEMPO_BPM: f64 = 110.0;

/// Optional settings read from `config.toml`
///
/// Every field may be omitted; absent fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding session history and preferences
    pub data_dir: Option<PathBuf>,
    /// Log filter directive (e.g. "info", "solfege_trainer=debug")
    pub log_level: Option<String>,
    /// Playback tempo in beats per minute
    pub tempo_bpm: Option<f64>,
    /// Skip playback waits entirely
    pub instant_playback: Option<bool>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;

        if let Some(bpm) = config.tempo_bpm {
            if !(bpm.is_finite() && bpm > 0.0) {
                return Err(Error::Config(format!("tempo_bpm must be positive, got {}", bpm)));
            }
        }

        Ok(config)
    }

    /// Tempo with the compiled default applied
    pub fn tempo_bpm(&self) -> f64 {
        self.tempo_bpm.unwrap_or(DEFAULT_TEMPO_BPM)
    }

    /// Whether playback waits are disabled
    pub fn instant_playback(&self) -> bool {
        self.instant_playback.unwrap_or(false)
    }
}

/// Load the TOML config file
///
/// With an explicit path, that file is read. Without one, the platform config
/// location is tried. A missing file yields defaults; a malformed file is an error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => return Ok(TomlConfig::default()),
    };

    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    TomlConfig::from_toml_str(&content)
}

/// Data folder resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
        warn!("{} is set but empty, ignoring", env_var_name);
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.data_dir {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Platform location of `config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("solfege").join("config.toml"))
}

/// Get OS-dependent default data folder path
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("solfege"))
        .unwrap_or_else(|| PathBuf::from("./solfege_data"))
}
