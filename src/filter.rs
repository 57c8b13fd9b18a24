//! Eligibility checks deciding which entries get moved.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. Entry must be a regular file
//! 2. Extension must equal the filter, ignoring case
//! 3. Region must appear in the parenthetical part of the name
//! 4. Configured exclude rules must not match, and the run's own
//!    configuration file is never eligible

use crate::config::{FilterRules, LOCAL_CONFIG_NAME, SortConfig};
use crate::error::ConfigError;
use crate::scanner::{CandidateEntry, EntryKind};
use glob::Pattern;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why an entry was left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotAFile { name: String },
    WrongExtension { name: String, extension: String },
    RegionMismatch { name: String, region: String },
    Excluded { name: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAFile { name } => {
                write!(f, "Not moving {} because it is not a file", name)
            }
            Self::WrongExtension { name, extension } => {
                write!(f, "Not moving {} because it is not a {} file", name, extension)
            }
            Self::RegionMismatch { name, region } => write!(
                f,
                "Not moving {} because the name did not contain {} region",
                name, region
            ),
            Self::Excluded { name } => {
                write!(f, "Not moving {} because it matches an exclude rule", name)
            }
        }
    }
}

/// Compiled form of the configured filters.
pub struct EligibilityFilter {
    extension: Option<String>,
    region: Option<String>,
    skip_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    protected_paths: Vec<PathBuf>,
}

impl EligibilityFilter {
    /// Compiles the filters of a run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex exclude pattern is invalid.
    pub fn new(config: &SortConfig) -> Result<Self, ConfigError> {
        let filter = Self::from_parts(config.extension(), config.region(), config.filters())?;
        Ok(match config.config_file() {
            Some(path) => filter.protect(path),
            None => filter,
        })
    }

    /// Compiles filters from their individual parts.
    ///
    /// # Arguments
    ///
    /// * `extension` - Extension filter in normalized form (see
    ///   [`normalize_extension`](crate::config::normalize_extension))
    /// * `region` - Region substring, matched case-insensitively
    /// * `rules` - Hidden-file and exclude rules from the configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex exclude pattern is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use romsort::config::FilterRules;
    /// use romsort::filter::EligibilityFilter;
    ///
    /// let filter = EligibilityFilter::from_parts(Some(".zip"), Some("USA"), &FilterRules::default());
    /// assert!(filter.is_ok());
    /// ```
    pub fn from_parts(
        extension: Option<&str>,
        region: Option<&str>,
        rules: &FilterRules,
    ) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            extension: extension.map(str::to_lowercase),
            region: region.map(str::to_string),
            skip_hidden: rules.skip_hidden,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_patterns,
            exclude_regexes,
            protected_paths: Vec::new(),
        })
    }

    /// Marks a file that must never be moved, such as the loaded
    /// configuration file.
    ///
    /// Paths are compared after canonicalization, so relative and absolute
    /// spellings of the same file both match.
    pub fn protect(mut self, path: &Path) -> Self {
        self.protected_paths
            .push(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
        self
    }

    /// Runs all checks against an entry, stopping at the first failure.
    ///
    /// # Arguments
    ///
    /// * `entry` - The scanned entry to test
    ///
    /// # Returns
    ///
    /// `Ok(())` if the entry should be moved, or the [`Rejection`] that
    /// explains why it stays in place.
    pub fn check(&self, entry: &CandidateEntry) -> Result<(), Rejection> {
        if entry.kind != EntryKind::File {
            return Err(Rejection::NotAFile {
                name: entry.name.clone(),
            });
        }

        if let Some(ref wanted) = self.extension {
            let actual = entry.extension().map(|e| e.to_lowercase());
            if actual.as_deref() != Some(wanted.as_str()) {
                return Err(Rejection::WrongExtension {
                    name: entry.name.clone(),
                    extension: wanted.clone(),
                });
            }
        }

        if let Some(ref region) = self.region
            && !region_matches(&entry.stem(), region)
        {
            return Err(Rejection::RegionMismatch {
                name: entry.name.clone(),
                region: region.clone(),
            });
        }

        if self.is_excluded(entry) {
            return Err(Rejection::Excluded {
                name: entry.name.clone(),
            });
        }

        Ok(())
    }

    /// Returns true if the entry passes every check.
    pub fn passes(&self, entry: &CandidateEntry) -> bool {
        self.check(entry).is_ok()
    }

    fn is_excluded(&self, entry: &CandidateEntry) -> bool {
        let name = entry.name.as_str();
        name == LOCAL_CONFIG_NAME
            || self.is_protected(&entry.path)
            || (self.skip_hidden && name.starts_with('.'))
            || self.exclude_filenames.contains(name)
            || self.exclude_patterns.iter().any(|p| p.matches(name))
            || self.exclude_regexes.iter().any(|r| r.is_match(name))
    }

    fn is_protected(&self, path: &Path) -> bool {
        if self.protected_paths.is_empty() {
            return false;
        }
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.protected_paths.contains(&path)
    }
}

/// Case-insensitive region search over the metadata part of a stem.
///
/// Only the text after the first "(" is searched, so a title word such as
/// "Europe Tour" does not count as a region. Stems without "(" are
/// searched whole.
///
/// # Examples
///
/// ```
/// use romsort::filter::region_matches;
///
/// assert!(region_matches("Sonic (Europe)", "europe"));
/// assert!(!region_matches("Europe Tour (USA)", "europe"));
/// assert!(region_matches("Tetris Japan", "JAPAN"));
/// ```
pub fn region_matches(stem: &str, region: &str) -> bool {
    let search_space = match stem.split_once('(') {
        Some((_, metadata)) => metadata,
        None => stem,
    };
    search_space
        .to_lowercase()
        .contains(&region.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExcludeRules;

    fn file(name: &str) -> CandidateEntry {
        CandidateEntry {
            path: PathBuf::from("/roms").join(name),
            name: name.to_string(),
            kind: EntryKind::File,
        }
    }

    fn filter(extension: Option<&str>, region: Option<&str>) -> EligibilityFilter {
        EligibilityFilter::from_parts(extension, region, &FilterRules::default()).unwrap()
    }

    #[test]
    fn test_directories_are_rejected() {
        let entry = CandidateEntry {
            path: PathBuf::from("/roms/A"),
            name: "A".to_string(),
            kind: EntryKind::Directory,
        };
        let result = filter(None, None).check(&entry);
        assert_eq!(
            result,
            Err(Rejection::NotAFile {
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn test_no_filters_accepts_any_file() {
        let f = filter(None, None);
        assert!(f.passes(&file("anything")));
        assert!(f.passes(&file(".hidden")));
        assert!(f.passes(&file("Game (USA).zip")));
    }

    #[test]
    fn test_extension_is_case_insensitive_and_exact() {
        let f = filter(Some(".zip"), None);
        assert!(f.passes(&file("game.zip")));
        assert!(f.passes(&file("game.ZIP")));
        assert!(!f.passes(&file("game.zipx")));
        assert!(!f.passes(&file("game.7z")));
        assert!(!f.passes(&file("zip")));
    }

    #[test]
    fn test_extension_uses_last_suffix_only() {
        let f = filter(Some(".gz"), None);
        assert!(f.passes(&file("archive.tar.gz")));
        assert!(!filter(Some(".tar"), None).passes(&file("archive.tar.gz")));
    }

    #[test]
    fn test_region_only_searches_parenthetical() {
        let f = filter(None, Some("europe"));
        assert!(f.passes(&file("Sonic (Europe).bin")));
        assert!(!f.passes(&file("Europe Tour (USA).bin")));
    }

    #[test]
    fn test_region_searches_all_parentheticals() {
        let f = filter(None, Some("Rev 1"));
        assert!(f.passes(&file("Game Title (USA) (Rev 1).zip")));
    }

    #[test]
    fn test_region_without_parenthesis_searches_whole_stem() {
        let f = filter(None, Some("japan"));
        assert!(f.passes(&file("Japan Story.zip")));
        assert!(!f.passes(&file("Japan Story (USA).zip")));
    }

    #[test]
    fn test_region_ignores_extension() {
        let f = filter(None, Some("bin"));
        assert!(!f.passes(&file("Sonic (Europe).bin")));
    }

    #[test]
    fn test_rejection_messages() {
        let f = filter(Some(".zip"), Some("USA"));
        let err = f.check(&file("Game.7z")).unwrap_err();
        assert_eq!(err.to_string(), "Not moving Game.7z because it is not a .zip file");

        let err = f.check(&file("Game (Japan).zip")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not moving Game (Japan).zip because the name did not contain USA region"
        );
    }

    #[test]
    fn test_extension_checked_before_region() {
        let f = filter(Some(".zip"), Some("USA"));
        let err = f.check(&file("Game (Japan).7z")).unwrap_err();
        assert!(matches!(err, Rejection::WrongExtension { .. }));
    }

    #[test]
    fn test_exclude_rules() {
        let rules = FilterRules {
            skip_hidden: true,
            exclude: ExcludeRules {
                filenames: vec!["Thumbs.db".to_string()],
                patterns: vec!["*.tmp".to_string()],
                regex: vec![r"^\[BIOS\]".to_string()],
            },
        };
        let f = EligibilityFilter::from_parts(None, None, &rules).unwrap();

        assert!(!f.passes(&file(".DS_Store")));
        assert!(!f.passes(&file("Thumbs.db")));
        assert!(!f.passes(&file("download.tmp")));
        assert!(!f.passes(&file("[BIOS] PlayStation (USA).bin")));
        assert!(f.passes(&file("Sonic (Europe).bin")));
    }

    #[test]
    fn test_local_config_file_is_never_eligible() {
        let f = filter(None, None);
        let err = f.check(&file(LOCAL_CONFIG_NAME)).unwrap_err();
        assert!(matches!(err, Rejection::Excluded { .. }));

        let f = filter(Some(".toml"), None);
        assert!(!f.passes(&file(LOCAL_CONFIG_NAME)));
        assert!(f.passes(&file("settings.toml")));
    }

    #[test]
    fn test_protected_config_path_is_never_eligible() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("romsort.toml");
        fs::write(&config_path, "").expect("Failed to write config");
        fs::write(temp_dir.path().join("other.toml"), "").expect("Failed to write test file");

        let f = filter(None, None).protect(&config_path);
        let entry = CandidateEntry::from_path(config_path.clone());
        assert!(matches!(f.check(&entry), Err(Rejection::Excluded { .. })));
        assert!(f.passes(&CandidateEntry::from_path(temp_dir.path().join("other.toml"))));

        // A non-canonical spelling of the same file is still protected.
        let dotted = temp_dir.path().join(".").join("romsort.toml");
        assert!(!f.passes(&CandidateEntry::from_path(dotted)));
    }

    #[test]
    fn test_invalid_patterns_are_errors() {
        let rules = FilterRules {
            skip_hidden: false,
            exclude: ExcludeRules {
                patterns: vec!["[invalid".to_string()],
                ..Default::default()
            },
        };
        assert!(matches!(
            EligibilityFilter::from_parts(None, None, &rules),
            Err(ConfigError::InvalidGlobPattern(_))
        ));

        let rules = FilterRules {
            skip_hidden: false,
            exclude: ExcludeRules {
                regex: vec!["[invalid(".to_string()],
                ..Default::default()
            },
        };
        assert!(matches!(
            EligibilityFilter::from_parts(None, None, &rules),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
