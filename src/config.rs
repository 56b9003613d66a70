//! Configuration file handling and settings resolution.
//!
//! The configuration is a small TOML document. Every key is optional:
//!
//! ```toml
//! dir = "."                        # directory to organize
//! ext = "ext"                      # folder for fixed-extension files
//! fixed_extension = "png"          # extension sent to the `ext` folder
//! prefix_extensions = ["jpg", "mov"] # extensions grouped by name prefix
//! ```
//!
//! A missing file is created with `dir` and `ext` set to their defaults. A
//! file that cannot be read or parsed is reported and treated as empty.
//! Values are resolved as command-line flag, then file, then default. Empty
//! strings count as unset.

use crate::destination_rule::{DestinationRule, RuleSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mediatidy.toml";
pub const DEFAULT_DIR: &str = ".";
pub const DEFAULT_EXT_FOLDER: &str = "ext";
pub const DEFAULT_FIXED_EXTENSION: &str = "png";
pub const DEFAULT_PREFIX_EXTENSIONS: [&str; 2] = ["jpg", "mov"];

/// Errors that can occur while reading or creating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("IO error reading configuration {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    /// The file is not valid TOML or has mistyped keys.
    #[error("Invalid configuration in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    /// The default file could not be written.
    #[error("Could not create configuration {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_extensions: Option<Vec<String>>,
}

impl MediaConfig {
    /// The document written when no configuration file exists yet.
    pub fn defaults() -> Self {
        Self {
            dir: Some(DEFAULT_DIR.to_string()),
            ext: Some(DEFAULT_EXT_FOLDER.to_string()),
            ..Self::default()
        }
    }

    /// Writes the default document to `path` unless something is already there.
    ///
    /// Returns `Ok(true)` if the file was created.
    pub fn ensure_exists(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        let content = toml::to_string(&Self::defaults()).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
        })?;
        fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(true)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read.
    /// Returns `ConfigError::Invalid` if TOML parsing fails.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Creates the file if missing, then loads it.
    ///
    /// Never fails: a creation failure is logged as a warning and a read or
    /// parse failure is logged as an error, yielding an empty configuration.
    pub fn load_or_create(path: &Path) -> Self {
        match Self::ensure_exists(path) {
            Ok(true) => tracing::info!("Created default config file: {}", path.display()),
            Ok(false) => {}
            Err(e) => tracing::warn!("{}", e),
        }

        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }
}

/// Values given on the command line, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub ext: Option<String>,
}

/// Fully resolved settings handed to the organizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target_dir: PathBuf,
    pub ext_folder: String,
    pub fixed_extension: String,
    pub prefix_extensions: Vec<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Resolves each value as flag, then file, then default.
    pub fn resolve(overrides: &Overrides, config: &MediaConfig) -> Self {
        let target_dir = overrides
            .dir
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .or_else(|| non_empty(config.dir.as_deref()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));

        let ext_folder = non_empty(overrides.ext.as_deref())
            .or_else(|| non_empty(config.ext.as_deref()))
            .unwrap_or(DEFAULT_EXT_FOLDER)
            .to_string();

        let fixed_extension = non_empty(config.fixed_extension.as_deref())
            .unwrap_or(DEFAULT_FIXED_EXTENSION)
            .to_string();

        let prefix_extensions = match &config.prefix_extensions {
            Some(exts) => exts
                .iter()
                .filter(|e| !e.trim().is_empty())
                .cloned()
                .collect(),
            None => DEFAULT_PREFIX_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        };

        Self {
            target_dir,
            ext_folder,
            fixed_extension,
            prefix_extensions,
        }
    }

    /// The rule table these settings describe.
    ///
    /// An extension listed more than once keeps only its first rule; each
    /// dropped entry is logged as a warning.
    pub fn rules(&self) -> RuleSet {
        let (rules, rejected) = self.build_rules();
        for ext in rejected {
            tracing::warn!("Ignoring duplicate rule for .{} files", ext);
        }
        rules
    }

    fn build_rules(&self) -> (RuleSet, Vec<String>) {
        let mut rules = RuleSet::new();
        let mut rejected = Vec::new();
        let candidates = std::iter::once(DestinationRule::fixed(
            &self.fixed_extension,
            &self.ext_folder,
        ))
        .chain(
            self.prefix_extensions
                .iter()
                .map(|ext| DestinationRule::prefix(ext)),
        );
        for rule in candidates {
            let ext = rule.extension().to_string();
            if !rules.add_rule(rule) {
                rejected.push(ext);
            }
        }
        (rules, rejected)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&Overrides::default(), &MediaConfig::default())
    }
}
