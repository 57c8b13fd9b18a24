//! Planning and applying bucket moves.
//!
//! Organizing happens in two phases. [`MovePlan::build`] groups eligible
//! entries by bucket without touching the filesystem, so the plan can be
//! shown and confirmed first. [`Mover::apply`] then creates the bucket
//! directories and renames each file into place.
use crate::bucket::{BucketCase, BucketKey};
use crate::error::{SortError, SortResult};
use crate::filter::EligibilityFilter;
use crate::output::Output;
use crate::scanner::CandidateEntry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Files assigned to one bucket, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: BucketKey,
    pub entries: Vec<CandidateEntry>,
}

/// A planned move whose destination is already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// The grouping of eligible files by destination bucket.
///
/// Buckets are kept in the order their first file was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovePlan {
    buckets: Vec<Bucket>,
}

impl MovePlan {
    /// Filters `entries` and groups the survivors by bucket.
    ///
    /// Rejected entries are reported through `output` in verbose mode.
    ///
    /// # Arguments
    ///
    /// * `entries` - Directory entries in scan order
    /// * `filter` - Decides which entries are eligible
    /// * `bucket_case` - How letter buckets are named
    /// * `output` - Receives the rejection diagnostics
    ///
    /// # Example
    ///
    /// ```no_run
    /// use romsort::bucket::BucketCase;
    /// use romsort::config::SortConfig;
    /// use romsort::filter::EligibilityFilter;
    /// use romsort::organizer::MovePlan;
    /// use romsort::output::Output;
    /// use romsort::scanner::DirectoryScanner;
    ///
    /// let config = SortConfig::new("/roms").unwrap().with_extension(Some("zip"));
    /// let filter = EligibilityFilter::new(&config).unwrap();
    /// let entries = DirectoryScanner::scan(config.directory()).unwrap();
    /// let plan = MovePlan::build(entries, &filter, BucketCase::Upper, &Output::default());
    /// println!("{} files in {} buckets", plan.total_files(), plan.buckets().len());
    /// ```
    pub fn build(
        entries: impl IntoIterator<Item = CandidateEntry>,
        filter: &EligibilityFilter,
        bucket_case: BucketCase,
        output: &Output,
    ) -> Self {
        let mut plan = Self::default();
        let mut index: HashMap<BucketKey, usize> = HashMap::new();

        for entry in entries {
            if let Err(rejection) = filter.check(&entry) {
                output.verbose(&rejection.to_string());
                continue;
            }

            let key = BucketKey::classify(&entry.stem(), bucket_case);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                plan.buckets.push(Bucket {
                    key,
                    entries: Vec::new(),
                });
                plan.buckets.len() - 1
            });
            plan.buckets[slot].entries.push(entry);
        }

        tracing::debug!(
            buckets = plan.buckets.len(),
            files = plan.total_files(),
            "built move plan"
        );
        plan
    }

    /// Buckets in the order their first file was seen.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Looks up the bucket with the given directory name.
    ///
    /// # Arguments
    ///
    /// * `dir_name` - Bucket directory name, such as `"A"`, `"0"` or `"_"`
    pub fn bucket(&self, dir_name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.key.dir_name() == dir_name)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of files the plan would move.
    pub fn total_files(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }

    /// File count per bucket, in plan order.
    pub fn bucket_counts(&self) -> Vec<(BucketKey, usize)> {
        self.buckets
            .iter()
            .map(|b| (b.key.clone(), b.entries.len()))
            .collect()
    }

    /// Lists planned moves whose destination already exists under `base`.
    ///
    /// Broken symlinks count as taken.
    ///
    /// # Arguments
    ///
    /// * `base` - The directory being organized
    ///
    /// # Returns
    ///
    /// One [`Conflict`] per file that [`Mover::apply`] would refuse to move.
    pub fn conflicts(&self, base: &Path) -> Vec<Conflict> {
        self.buckets
            .iter()
            .flat_map(|bucket| {
                let dir = base.join(bucket.key.dir_name());
                bucket.entries.iter().filter_map(move |entry| {
                    let destination = dir.join(&entry.name);
                    destination.symlink_metadata().is_ok().then(|| Conflict {
                        source: entry.path.clone(),
                        destination,
                    })
                })
            })
            .collect()
    }
}

/// A completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moved {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bucket: String,
}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct MoveReport {
    pub moved: Vec<Moved>,
    pub failed: Vec<(PathBuf, SortError)>,
    /// Bucket directories that did not exist before the run.
    pub created_dirs: Vec<PathBuf>,
}

impl MoveReport {
    /// True when no move failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Moves planned files into their bucket directories.
pub struct Mover<'a> {
    base_path: &'a Path,
    output: &'a Output,
}

impl<'a> Mover<'a> {
    /// Creates a mover for one directory.
    ///
    /// # Arguments
    ///
    /// * `base_path` - The directory being organized; buckets are created here
    /// * `output` - Receives per-file messages and drives the progress bar
    pub fn new(base_path: &'a Path, output: &'a Output) -> Self {
        Self { base_path, output }
    }

    /// Applies every move in the plan.
    ///
    /// A failed move is recorded in the report and the remaining files are
    /// still processed. Files are never overwritten: a taken destination is
    /// reported as [`SortError::DestinationExists`]. If a bucket directory
    /// cannot be created, every file of that bucket is recorded as failed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use romsort::organizer::{MovePlan, Mover};
    /// # use romsort::output::Output;
    /// # use std::path::Path;
    /// # let plan = MovePlan::default();
    /// let output = Output::default();
    /// let report = Mover::new(Path::new("/roms"), &output).apply(&plan);
    /// for (path, error) in &report.failed {
    ///     eprintln!("{}: {}", path.display(), error);
    /// }
    /// ```
    pub fn apply(&self, plan: &MovePlan) -> MoveReport {
        let mut report = MoveReport::default();
        let pb = self.output.progress_bar(plan.total_files() as u64);

        for bucket in plan.buckets() {
            let dir_name = bucket.key.dir_name();
            let bucket_dir = self.base_path.join(dir_name);

            match ensure_dir(&bucket_dir) {
                Ok(true) => report.created_dirs.push(bucket_dir.clone()),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(dir = %bucket_dir.display(), error = %e, "cannot create bucket");
                    for entry in &bucket.entries {
                        report.failed.push((
                            entry.path.clone(),
                            SortError::DirectoryCreation {
                                path: bucket_dir.clone(),
                                source: std::io::Error::new(e.kind(), e.to_string()),
                            },
                        ));
                        pb.inc(1);
                    }
                    continue;
                }
            }

            for entry in &bucket.entries {
                pb.set_message(entry.name.clone());
                self.output
                    .verbose(&format!("Moving {} to {}", entry.name, dir_name));

                match move_into(&entry.path, &bucket_dir) {
                    Ok(destination) => report.moved.push(Moved {
                        source: entry.path.clone(),
                        destination,
                        bucket: dir_name.to_string(),
                    }),
                    Err(e) => {
                        tracing::warn!(file = %entry.path.display(), error = %e, "move failed");
                        report.failed.push((entry.path.clone(), e));
                    }
                }
                pb.inc(1);
            }
        }

        pb.finish_and_clear();
        report
    }
}

/// Creates `dir` if needed. Returns whether it was created.
fn ensure_dir(dir: &Path) -> std::io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    match fs::create_dir(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Renames `file` into `dir`, keeping its name.
fn move_into(file: &Path, dir: &Path) -> SortResult<PathBuf> {
    let file_name = file.file_name().ok_or_else(|| SortError::FileMove {
        from: file.to_path_buf(),
        to: dir.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "file has no name component",
        ),
    })?;
    let destination = dir.join(file_name);

    // rename() replaces existing files on Unix
    if destination.symlink_metadata().is_ok() {
        return Err(SortError::DestinationExists(destination));
    }

    fs::rename(file, &destination).map_err(|e| SortError::FileMove {
        from: file.to_path_buf(),
        to: destination.clone(),
        source: e,
    })?;

    tracing::debug!(from = %file.display(), to = %destination.display(), "moved file");
    Ok(destination)
}
