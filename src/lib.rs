//! romsort - sort a directory of ROMs into first-letter subdirectories
//!
//! This library scans a single directory, filters files by extension and
//! region, groups them by the first character of their name, and moves each
//! group into its own subdirectory after an optional confirmation.

pub mod bucket;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod organizer;
pub mod output;
pub mod prompt;
pub mod scanner;

pub use bucket::{BucketCase, BucketKey};
pub use config::{FileConfig, SortConfig};
pub use error::{ConfigError, SortError, SortResult};
pub use filter::{EligibilityFilter, Rejection};
pub use organizer::{MovePlan, MoveReport, Mover};
pub use prompt::{Confirm, LinePrompt};
pub use scanner::{CandidateEntry, DirectoryScanner, EntryKind};

pub use cli::{Args, RunOutcome, run_cli, run_organize};
