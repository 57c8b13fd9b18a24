//! Command-line interface module for romsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and merging with the configuration file
//! - The warning and summary confirmation gates
//! - Plan, dry-run and move orchestration

use crate::bucket::BucketCase;
use crate::config::{FileConfig, SortConfig};
use crate::error::{SortError, SortResult};
use crate::filter::EligibilityFilter;
use crate::logging::init_logging;
use crate::organizer::{MovePlan, MoveReport, Mover};
use crate::output::Output;
use crate::prompt::Confirm;
use crate::scanner::DirectoryScanner;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Moves matching files to subdirectories based on the first letter of the file's name"
)]
pub struct Args {
    /// The directory where the files are located
    #[arg(long, value_name = "PATH")]
    pub dir: PathBuf,

    /// If specified, only files with the given file extension will be moved
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,

    /// If specified, only files with the given region will be moved
    #[arg(long)]
    pub region: Option<String>,

    /// If specified, data will be logged to stdout
    #[arg(short, long)]
    pub verbose: bool,

    /// If specified, program will not confirm before taking action
    #[arg(long)]
    pub no_warn: bool,

    /// Show what would be moved without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Keep the case of the first letter instead of uppercasing bucket names
    #[arg(long)]
    pub preserve_case: bool,

    /// Configuration file to read defaults and exclude rules from
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Merges these arguments with file defaults into a run configuration.
    ///
    /// Values given on the command line win. Flags are enabled if either
    /// source enables them.
    pub fn into_config(self, file: FileConfig) -> SortResult<SortConfig> {
        let defaults = file.defaults;
        let extension = self.ext.or(defaults.ext);
        let region = self.region.or(defaults.region);
        let bucket_case = if self.preserve_case || defaults.preserve_case {
            BucketCase::Preserve
        } else {
            BucketCase::Upper
        };

        let config = SortConfig::new(self.dir)?
            .with_extension(extension.as_deref())
            .with_region(region.as_deref())
            .with_confirm(!(self.no_warn || defaults.no_warn))
            .with_verbose(self.verbose || defaults.verbose)
            .with_dry_run(self.dry_run)
            .with_bucket_case(bucket_case)
            .with_filters(file.filters)
            .with_config_file(self.config);
        Ok(config)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Moves were attempted; the report lists successes and failures.
    Completed(MoveReport),
    /// Nothing matched the filters.
    NothingToMove,
    /// The user declined a confirmation prompt.
    Aborted,
    /// Dry run; the plan was printed but not applied.
    DryRun(MovePlan),
}

impl RunOutcome {
    /// Whether the run finished without errors that should fail the process.
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::Completed(report) => report.is_complete_success(),
            _ => true,
        }
    }
}

/// Loads the configuration file named by `args` (or found in the usual
/// places), sets up logging, and runs the organizer.
///
/// # Arguments
///
/// * `args` - Parsed command-line arguments
/// * `prompt` - Where confirmation questions are asked
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use romsort::cli::{Args, run_cli};
/// use romsort::prompt::LinePrompt;
///
/// let args = Args::parse_from(["romsort", "--dir", "/roms", "--ext", "zip"]);
/// let outcome = run_cli(args, &mut LinePrompt::stdio());
/// ```
pub fn run_cli(args: Args, prompt: &mut dyn Confirm) -> SortResult<RunOutcome> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    let config = args.into_config(file_config)?;
    init_logging(config.verbose());
    let output = Output::new(config.verbose());
    run_organize(&config, prompt, &output)
}

/// Runs one organize pass: warn, plan, confirm, move.
pub fn run_organize(
    config: &SortConfig,
    prompt: &mut dyn Confirm,
    output: &Output,
) -> SortResult<RunOutcome> {
    let filter = EligibilityFilter::new(config)?;
    let base_path = config.directory();

    if config.confirm() && !config.dry_run() && !ask(prompt, &warning_question(config), false)? {
        output.plain("User aborted");
        return Ok(RunOutcome::Aborted);
    }

    if config.dry_run() {
        output.dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));
    } else {
        output.info(&format!("Organizing ROMs in {}", base_path.display()));
    }

    let entries = DirectoryScanner::scan(base_path)?;
    let plan = MovePlan::build(entries, &filter, config.bucket_case(), output);
    if plan.is_empty() {
        output.plain("No files found");
        return Ok(RunOutcome::NothingToMove);
    }

    let conflicts = plan.conflicts(base_path);
    for conflict in &conflicts {
        output.warning(&format!(
            "{} will not be moved: {} already exists",
            conflict.source.display(),
            conflict.destination.display()
        ));
    }

    if config.dry_run() {
        print_plan(&plan, output);
        output.summary_table(&plan.bucket_counts(), plan.total_files());
        output.dry_run_notice("No files were moved.");
        return Ok(RunOutcome::DryRun(plan));
    }

    let movable = plan.total_files() - conflicts.len();
    if config.confirm()
        && !ask(
            prompt,
            &format!("{} files will be moved. continue?", movable),
            true,
        )?
    {
        output.plain("User aborted");
        return Ok(RunOutcome::Aborted);
    }

    let report = Mover::new(base_path, output).apply(&plan);
    print_report(&report, base_path, output);
    Ok(RunOutcome::Completed(report))
}

fn ask(prompt: &mut dyn Confirm, question: &str, default: bool) -> SortResult<bool> {
    prompt.confirm(question, default).map_err(SortError::Prompt)
}

fn warning_question(config: &SortConfig) -> String {
    let dir = std::path::absolute(config.directory())
        .unwrap_or_else(|_| config.directory().to_path_buf());
    format!(
        "All *{} files in \"{}\" will be moved. Are you sure?",
        config.extension().unwrap_or(""),
        dir.display()
    )
}

fn print_plan(plan: &MovePlan, output: &Output) {
    output.header("Files would be organized as follows:");
    for bucket in plan.buckets() {
        output.plain(&format!("{}/", bucket.key));
        for entry in &bucket.entries {
            output.plain(&format!("  - {}", entry.name));
        }
    }
}

fn print_report(report: &MoveReport, base_path: &Path, output: &Output) {
    for (path, error) in &report.failed {
        let name = path.strip_prefix(base_path).unwrap_or(path);
        output.error(&format!("{}: {}", name.display(), error));
    }

    if !report.moved.is_empty() {
        output.success(&format!(
            "Moved {} {} ({} new {})",
            report.moved.len(),
            if report.moved.len() == 1 { "file" } else { "files" },
            report.created_dirs.len(),
            if report.created_dirs.len() == 1 { "directory" } else { "directories" }
        ));
    }

    if report.is_complete_success() {
        output.plain("Done");
    } else {
        output.warning(&format!(
            "{} {} could not be moved. Please review errors above.",
            report.failed.len(),
            if report.failed.len() == 1 { "file" } else { "files" }
        ));
    }
}
