//! Yes/no confirmation prompts.
//!
//! The organizer only talks to the [`Confirm`] trait, so tests can script
//! answers instead of reading a terminal.

use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question.
pub trait Confirm {
    /// Returns the answer, or `default` when the user just presses enter.
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool>;
}

/// Line-based prompt over any reader and writer.
///
/// Accepts `y`/`n` in either case, or an empty line for the default.
/// Anything else asks again. End of input counts as the default.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the prompt, returning what was written to the output.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    /// A prompt bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let choices = if default { "(Y/n)" } else { "(y/N)" };
        writeln!(self.output, "{} {}", question, choices)?;
        self.output.flush()?;

        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(default);
            }

            match line.trim_end_matches(['\r', '\n']).to_lowercase().as_str() {
                "" => return Ok(default),
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => {
                    writeln!(self.output, "Please enter 'y' or 'n'")?;
                    self.output.flush()?;
                }
            }
        }
    }
}

/// A prompt that answers every question the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoAnswer(pub bool);

impl Confirm for AutoAnswer {
    fn confirm(&mut self, _question: &str, _default: bool) -> io::Result<bool> {
        Ok(self.0)
    }
}
