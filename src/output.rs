//! Output formatting and styling module.
//!
//! All user-facing text goes through [`Output`], which also carries the
//! verbosity setting for the run. Output normally goes to the terminal; a
//! captured `Output` collects the lines in memory instead.

use crate::bucket::BucketKey;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

/// Prints styled messages to the terminal or into a capture buffer.
///
/// Verbose diagnostics are printed only when the value was created with
/// `verbose` set. Clones share the same capture buffer.
#[derive(Debug, Clone, Default)]
pub struct Output {
    verbose: bool,
    capture: Option<Rc<RefCell<String>>>,
}

impl Output {
    /// Creates an output that writes to stdout and stderr.
    ///
    /// # Arguments
    ///
    /// * `verbose` - Whether [`Output::verbose`] messages are shown
    ///
    /// # Example
    ///
    /// ```no_run
    /// use romsort::output::Output;
    /// let output = Output::new(true);
    /// output.verbose("Not moving saves because it is not a file");
    /// ```
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            capture: None,
        }
    }

    /// Creates an output that records every line instead of printing it.
    ///
    /// Errors are recorded in the same buffer as regular messages.
    ///
    /// # Example
    ///
    /// ```
    /// use romsort::output::Output;
    /// let output = Output::captured(false);
    /// output.plain("Done");
    /// assert_eq!(output.captured_text(), "Done\n");
    /// ```
    pub fn captured(verbose: bool) -> Self {
        Self {
            verbose,
            capture: Some(Rc::new(RefCell::new(String::new()))),
        }
    }

    /// Returns everything recorded so far. Empty for a terminal output.
    pub fn captured_text(&self) -> String {
        self.capture
            .as_ref()
            .map(|buf| buf.borrow().clone())
            .unwrap_or_default()
    }

    fn emit(&self, line: impl Display, to_stderr: bool) {
        match &self.capture {
            Some(buf) => buf.borrow_mut().push_str(&format!("{}\n", line)),
            None if to_stderr => eprintln!("{}", line),
            None => println!("{}", line),
        }
    }

    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn success(&self, message: &str) {
        self.emit(format!("{} {}", "✓".green(), message), false);
    }

    /// Prints an error message in red with an X mark, to stderr.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use romsort::output::Output;
    /// Output::default().error("Error: /roms is not a directory");
    /// ```
    pub fn error(&self, message: &str) {
        self.emit(format!("{} {}", "✗".red(), message), true);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    pub fn warning(&self, message: &str) {
        self.emit(format!("{} {}", "⚠".yellow(), message), false);
    }

    /// Prints an info message in cyan.
    pub fn info(&self, message: &str) {
        self.emit(message.cyan(), false);
    }

    pub fn plain(&self, message: &str) {
        self.emit(message, false);
    }

    /// Prints a bold section header preceded by a blank line.
    pub fn header(&self, header: &str) {
        self.emit(format!("\n{}", header.bold()), false);
    }

    /// Prints a diagnostic line, only in verbose mode.
    ///
    /// # Arguments
    ///
    /// * `message` - The diagnostic to display
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            self.emit(message.dimmed(), false);
        }
    }

    /// Creates a progress bar for the move loop.
    ///
    /// In verbose mode every move is already printed, so the bar is hidden.
    /// Captured outputs also get a hidden bar.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of files to move
    ///
    /// # Example
    ///
    /// ```no_run
    /// use romsort::output::Output;
    /// let pb = Output::new(false).progress_bar(3);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn progress_bar(&self, total: u64) -> ProgressBar {
        if self.verbose || self.capture.is_some() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints a table of file counts per bucket, in plan order.
    ///
    /// # Arguments
    ///
    /// * `bucket_counts` - Bucket keys with their file counts
    /// * `total_files` - Total number of planned files
    ///
    /// # Example
    ///
    /// ```
    /// use romsort::bucket::BucketKey;
    /// use romsort::output::Output;
    ///
    /// let output = Output::captured(false);
    /// output.summary_table(&[(BucketKey::Numeric, 2), (BucketKey::Other, 1)], 3);
    /// assert!(output.captured_text().contains("SUMMARY"));
    /// ```
    pub fn summary_table(&self, bucket_counts: &[(BucketKey, usize)], total_files: usize) {
        self.header("SUMMARY");

        let width = bucket_counts
            .iter()
            .map(|(key, _)| key.dir_name().chars().count())
            .max()
            .unwrap_or(0)
            .max(6); // "Bucket"

        self.emit(
            format!("{:<width$} | {}", "Bucket".bold(), "Files".bold(), width = width),
            false,
        );
        self.emit("-".repeat(width + 10), false);

        for (key, count) in bucket_counts {
            self.emit(
                format!(
                    "{:<width$} | {} {}",
                    key.dir_name(),
                    count.to_string().green(),
                    plural(*count),
                    width = width
                ),
                false,
            );
        }

        self.emit("-".repeat(width + 10), false);
        self.emit(
            format!(
                "{:<width$} | {} {}",
                "Total".bold(),
                total_files.to_string().green().bold(),
                plural(total_files),
                width = width
            ),
            false,
        );
    }

    /// Prints a dry-run notice in yellow.
    pub fn dry_run_notice(&self, message: &str) {
        self.emit(format!("[DRY RUN] {}", message).yellow(), false);
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
