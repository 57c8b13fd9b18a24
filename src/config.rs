//! Run configuration and optional TOML defaults.
//!
//! A run is described by an immutable [`SortConfig`]. It is built from the
//! command line, with gaps filled from a configuration file if one is found:
//!
//! ```toml
//! [defaults]
//! ext = "zip"
//! region = "USA"
//! verbose = false
//! no_warn = false
//! preserve_case = false
//!
//! [filters]
//! skip_hidden = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.tmp"]
//! regex = ["^\\[BIOS\\]"]
//! ```

use crate::bucket::BucketCase;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_NAME: &str = ".romsortrc.toml";

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub filters: FilterRules,
}

/// Fallback values for command-line options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    pub ext: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub no_warn: bool,
    #[serde(default)]
    pub preserve_case: bool,
}

/// Extra exclusion rules applied after the extension and region checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Skip files whose name starts with ".". Off unless configured.
    #[serde(default)]
    pub skip_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the filename (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the filename.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl FileConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.romsortrc.toml` in the current directory
    /// 3. Look for `~/.config/romsort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_NAME);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("romsort")
                .join("config.toml");
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }
}

/// Immutable parameters for one run.
#[derive(Debug, Clone)]
pub struct SortConfig {
    directory: PathBuf,
    extension: Option<String>,
    region: Option<String>,
    confirm: bool,
    verbose: bool,
    dry_run: bool,
    bucket_case: BucketCase,
    filters: FilterRules,
    config_file: Option<PathBuf>,
}

impl SortConfig {
    /// Creates a configuration for `directory` with no filters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotADirectory` if the path does not exist or
    /// is not a directory.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(ConfigError::NotADirectory(directory));
        }

        Ok(Self {
            directory,
            extension: None,
            region: None,
            confirm: false,
            verbose: false,
            dry_run: false,
            bucket_case: BucketCase::default(),
            filters: FilterRules::default(),
            config_file: None,
        })
    }

    /// Sets the extension filter. A leading "." is added when missing.
    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.and_then(normalize_extension);
        self
    }

    pub fn with_region(mut self, region: Option<&str>) -> Self {
        self.region = region
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        self
    }

    /// Ask for confirmation before moving anything.
    pub fn with_confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_bucket_case(mut self, bucket_case: BucketCase) -> Self {
        self.bucket_case = bucket_case;
        self
    }

    pub fn with_filters(mut self, filters: FilterRules) -> Self {
        self.filters = filters;
        self
    }

    /// Records the configuration file this run was loaded from.
    ///
    /// That file is never moved, even when it sits in the target directory.
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The normalized extension filter, lowercase with a leading ".".
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn confirm(&self) -> bool {
        self.confirm
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn bucket_case(&self) -> BucketCase {
        self.bucket_case
    }

    pub fn filters(&self) -> &FilterRules {
        &self.filters
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}

/// Normalizes an extension filter: lowercase, with a leading ".".
///
/// Returns `None` for an empty value.
///
/// # Examples
///
/// ```
/// use romsort::config::normalize_extension;
///
/// assert_eq!(normalize_extension("ZIP").as_deref(), Some(".zip"));
/// assert_eq!(normalize_extension(".bin").as_deref(), Some(".bin"));
/// assert_eq!(normalize_extension(""), None);
/// ```
pub fn normalize_extension(extension: &str) -> Option<String> {
    let extension = extension.trim();
    if extension.is_empty() {
        return None;
    }
    let extension = extension.to_lowercase();
    if extension.starts_with('.') {
        Some(extension)
    } else {
        Some(format!(".{}", extension))
    }
}
