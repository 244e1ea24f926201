//! Settings loaded from an optional TOML file.
//!
//! ```toml
//! [report]
//! restore_buffer_len = 1000
//! range_buffer_len = 2000
//! reserve = 200
//! status_lines = 32
//!
//! [report.estimator]
//! double_check_error_rate = 0.018
//! prp_double_check_error_rate = 0.0001
//!
//! [timing]
//! ms_per_iteration = 10.0
//! ```
//!
//! Every key is optional. A missing file means defaults; a file that exists
//! but does not parse is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ckpt_report::ReportOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::worktodo::TimingModel;

/// Errors loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not valid settings TOML.
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// All tunables for the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Report sizes and estimator rates.
    pub report: ReportOptions,
    /// Time estimates for queued work.
    pub timing: TimingModel,
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when `text` is not valid settings.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Load settings from `path`, or defaults when no path is given or the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file exists but cannot be read or parsed.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    match fs::read_to_string(path) {
        Ok(content) => {
            let settings = Settings::from_toml(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "loaded settings");
            Ok(settings)
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no settings file found, using defaults");
            Ok(Settings::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_round_trip() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed = Settings::from_toml(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml("[report]\nreserve = 50\n").unwrap();
        assert_eq!(settings.report.reserve, 50);
        assert_eq!(settings.report.range_buffer_len, 2000);
        assert_eq!(settings.timing, TimingModel::default());
    }
}
