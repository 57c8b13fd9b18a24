//! Non-recursive directory listing.

use crate::error::{SortError, SortResult};
use std::fs;
use std::path::{Path, PathBuf};

/// What kind of filesystem object an entry is.
///
/// Symlinks are resolved, so a link to a regular file counts as a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, FIFOs, devices and dangling links.
    Other,
}

/// A direct child of the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    /// The full path to the entry.
    pub path: PathBuf,
    /// The file name, lossily converted to UTF-8.
    pub name: String,
    pub kind: EntryKind,
}

impl CandidateEntry {
    /// Builds an entry for `path`, reading its metadata.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let kind = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => EntryKind::File,
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        };

        Self { path, name, kind }
    }

    /// The filename without its final extension.
    ///
    /// Dotfiles such as `.hidden` keep their full name.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// The final extension including its leading ".", if there is one.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
    }
}

/// Lists the direct children of a directory.
pub struct DirectoryScanner;

impl DirectoryScanner {
    /// Returns every direct child of `dir`, sorted by lowercase name.
    ///
    /// Files, directories and special files are all returned; filtering is
    /// left to the caller. Names that differ only in case are ordered by
    /// their original spelling.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use romsort::scanner::DirectoryScanner;
    /// use std::path::Path;
    ///
    /// for entry in DirectoryScanner::scan(Path::new("/roms")).unwrap() {
    ///     println!("{}", entry.name);
    /// }
    /// ```
    pub fn scan(dir: &Path) -> SortResult<Vec<CandidateEntry>> {
        let read_dir = fs::read_dir(dir).map_err(|e| SortError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| SortError::ReadDir {
                path: dir.to_path_buf(),
                source: e,
            })?;
            entries.push(CandidateEntry::from_path(entry.path()));
        }

        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        tracing::debug!(dir = %dir.display(), count = entries.len(), "scanned directory");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_sorts_case_insensitively() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for name in ["banana.txt", "Apple.txt", "cherry.txt", "apple2.txt"] {
            fs::write(temp_dir.path().join(name), "x").expect("Failed to write test file");
        }

        let names: Vec<_> = DirectoryScanner::scan(temp_dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(
            names,
            vec!["Apple.txt", "apple2.txt", "banana.txt", "cherry.txt"]
        );
    }

    #[test]
    fn test_scan_is_not_recursive_and_keeps_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("A")).expect("Failed to create subdirectory");
        fs::write(temp_dir.path().join("A").join("inner.txt"), "x")
            .expect("Failed to write test file");
        fs::write(temp_dir.path().join("b.txt"), "x").expect("Failed to write test file");

        let entries = DirectoryScanner::scan(temp_dir.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "A");
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].name, "b.txt");
        assert_eq!(entries[1].kind, EntryKind::File);
    }

    #[test]
    fn test_scan_missing_directory() {
        let result = DirectoryScanner::scan(Path::new("/non/existent/path"));
        assert!(matches!(result, Err(SortError::ReadDir { .. })));
    }

    #[test]
    fn test_stem_and_extension() {
        let entry = CandidateEntry {
            path: PathBuf::from("/roms/Sonic (Europe).BIN"),
            name: "Sonic (Europe).BIN".to_string(),
            kind: EntryKind::File,
        };
        assert_eq!(entry.stem(), "Sonic (Europe)");
        assert_eq!(entry.extension().as_deref(), Some(".BIN"));

        let dotfile = CandidateEntry {
            path: PathBuf::from("/roms/.hidden"),
            name: ".hidden".to_string(),
            kind: EntryKind::File,
        };
        assert_eq!(dotfile.stem(), ".hidden");
        assert_eq!(dotfile.extension(), None);
    }
}
