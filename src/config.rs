//! Harvest configuration: built-in defaults, TOML config file, validation.
//!
//! Layering (highest wins) is CLI flags → config file → defaults. This module
//! owns the last two; the binary applies its flags on top and then calls
//! [`HarvestConfig::validate`].

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::download::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_GRACE_SECS,
    MAX_CONCURRENCY, MIN_CONCURRENCY,
};

/// Page harvested when no URL is configured.
pub const DEFAULT_TARGET_PAGE_URL: &str = "https://tstu.ru/r.php?r=tgtu.general.docum.standart";

/// Suffix matched against `href` values by default.
pub const DEFAULT_LINK_SUFFIX: &str = ".doc";

/// Directory downloads are written to by default.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "downloads";

/// Directory name under the XDG config home.
const CONFIG_DIR_NAME: &str = "doc-harvest";

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Upper bound for both timeout settings, in seconds.
const MAX_TIMEOUT_SECS: u64 = 3600;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys / wrong types.
    #[error("invalid config syntax: {0}")]
    Syntax(#[from] toml::de::Error),

    /// A value is out of range or malformed.
    #[error("invalid config value for `{field}`: {value}. Expected {expected}")]
    Invalid {
        /// Config key.
        field: &'static str,
        /// Offending value, as displayed.
        value: String,
        /// Human-readable constraint.
        expected: &'static str,
    },
}

/// Settings for one harvest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    /// Page whose links are harvested.
    pub target_page_url: String,
    /// Case-sensitive suffix an `href` must end with.
    pub link_suffix: String,
    /// Directory downloads are written to (created with parents if absent).
    pub output_directory: PathBuf,
    /// Whole-request timeout for the page fetch and each download.
    pub request_timeout_secs: u64,
    /// How long in-flight downloads may continue after a shutdown request.
    pub shutdown_grace_secs: u64,
    /// Maximum concurrent downloads.
    pub concurrency: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            target_page_url: DEFAULT_TARGET_PAGE_URL.to_string(),
            link_suffix: DEFAULT_LINK_SUFFIX.to_string(),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            shutdown_grace_secs: DEFAULT_SHUTDOWN_GRACE_SECS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl HarvestConfig {
    /// Parses a TOML document; keys that are absent keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Syntax`] for malformed TOML, unknown keys or
    /// wrong value types. Values are not range-checked here; call
    /// [`validate`](Self::validate) once all layers are applied.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Syntax`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&raw)
    }

    /// Loads the config file from the default location if it exists,
    /// otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) when the default file exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        match resolve_default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validates values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match Url::parse(&self.target_page_url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "target_page_url",
                    value: self.target_page_url.clone(),
                    expected: "an absolute URL",
                });
            }
        }

        if self.link_suffix.is_empty() {
            return Err(ConfigError::Invalid {
                field: "link_suffix",
                value: String::from("\"\""),
                expected: "a non-empty suffix such as \".doc\"",
            });
        }

        if self.output_directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output_directory",
                value: String::from("\"\""),
                expected: "a non-empty path",
            });
        }

        if !(1..=MAX_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                value: self.request_timeout_secs.to_string(),
                expected: "range 1..=3600",
            });
        }

        if self.shutdown_grace_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                field: "shutdown_grace_secs",
                value: self.shutdown_grace_secs.to_string(),
                expected: "range 0..=3600",
            });
        }

        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                value: self.concurrency.to_string(),
                expected: "range 1..=100",
            });
        }

        Ok(())
    }

    /// Returns the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the shutdown grace period as a `Duration`.
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/doc-harvest/config.toml`
/// 2. `$HOME/.config/doc-harvest/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}
