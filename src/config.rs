//! Layered configuration.
//!
//! Settings are merged from, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: `--config PATH`, or `config.toml` in the platform
//!    config directory (e.g. `~/.config/dupsift/config.toml`)
//! 3. `DUPSIFT_*` environment variables (`DUPSIFT_IO_THREADS=8`)
//! 4. Command-line flags ([`Config::apply_scan_args`])
//!
//! # Example
//!
//! ```toml
//! io_threads = 2
//! skip_hidden = true
//! min_size = 4096
//! ignore_patterns = ["*.tmp", "node_modules/"]
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::ScanArgs;
use crate::duplicates::{FinderConfig, DEFAULT_IO_THREADS};
use crate::scanner::WalkerConfig;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPSIFT_";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// A provider held a value that could not be parsed.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// `min_size` is larger than `max_size`.
    #[error("min_size ({min}) is larger than max_size ({max})")]
    InvalidSizeRange {
        /// Configured minimum
        min: u64,
        /// Configured maximum
        max: u64,
    },
}

/// Scan settings shared by the config file, environment, and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of I/O threads for hashing.
    pub io_threads: usize,
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Skip zero-length files.
    pub skip_empty: bool,
    /// Minimum file size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    /// Maximum file size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Gitignore-style patterns to skip.
    pub ignore_patterns: Vec<String>,
    /// Apply the `.gitignore` at the scan root.
    pub respect_gitignore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            follow_symlinks: false,
            skip_hidden: false,
            skip_empty: false,
            min_size: None,
            max_size: None,
            ignore_patterns: Vec::new(),
            respect_gitignore: false,
        }
    }
}

impl Config {
    /// Load configuration from defaults, a TOML file, and the environment.
    ///
    /// With `explicit` set, that file must exist and parse. Otherwise the
    /// default location is tried; if that file is malformed a warning is
    /// logged and it is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing or invalid,
    /// or if an environment override cannot be parsed.
    ///
    /// The result is not validated: command-line flags may still change
    /// it, so callers run [`Config::validate`] on the final settings.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                log::debug!("Loading configuration from {}", path.display());
                Self::extract(Self::figment(Some(path)))?
            }
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => match Self::extract(Self::figment(Some(&path))) {
                    Ok(config) => config,
                    Err(e) => {
                        log::warn!(
                            "Ignoring malformed configuration file {}: {}",
                            path.display(),
                            e
                        );
                        Self::extract(Self::figment(None))?
                    }
                },
                None => Self::extract(Self::figment(None))?,
            },
        };

        Ok(config)
    }

    /// Build the provider stack without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Platform-specific default location of `config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupsift").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reject settings that cannot describe any file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSizeRange`] if `min_size > max_size`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(ConfigError::InvalidSizeRange { min, max });
            }
        }
        Ok(())
    }

    /// Overlay the flags given on the command line.
    ///
    /// Each boolean setting has a `--flag` / `--no-flag` pair; with neither
    /// given the configured value is kept. Ignore patterns from the CLI are
    /// appended to the configured ones.
    pub fn apply_scan_args(&mut self, args: &ScanArgs) {
        if let Some(threads) = args.io_threads {
            self.io_threads = usize::from(threads);
        }
        if args.min_size.is_some() {
            self.min_size = args.min_size;
        }
        if args.max_size.is_some() {
            self.max_size = args.max_size;
        }
        overlay(&mut self.follow_symlinks, args.follow_symlinks, args.no_follow_symlinks);
        overlay(&mut self.skip_hidden, args.skip_hidden, args.no_skip_hidden);
        overlay(&mut self.skip_empty, args.skip_empty, args.no_skip_empty);
        overlay(
            &mut self.respect_gitignore,
            args.respect_gitignore,
            args.no_respect_gitignore,
        );
        self.ignore_patterns.extend(args.ignore_patterns.iter().cloned());
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_follow_symlinks(self.follow_symlinks)
            .with_skip_hidden(self.skip_hidden)
            .with_skip_empty(self.skip_empty)
            .with_size_bounds(self.min_size, self.max_size)
            .with_ignore_patterns(self.ignore_patterns.clone())
            .with_respect_gitignore(self.respect_gitignore)
    }

    /// Finder settings derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_walker_config(self.walker_config())
    }
}

/// Apply an on/off flag pair to a setting. clap rejects both at once.
fn overlay(setting: &mut bool, on: bool, off: bool) {
    if on {
        *setting = true;
    } else if off {
        *setting = false;
    }
}
