//! Response type for command execution results.

use std::time::Duration;

use crate::error::{ParseError, Result};

/// Output of one command, read up to the expected prompt.
///
/// `output` is verbatim apart from pagination banners and escape sequences:
/// it still contains the command echo and the trailing prompt. Whether the
/// device accepted the command is decided by the caller.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was executed.
    pub command: String,

    /// The prompt that was waited for.
    pub prompt: String,

    /// The cleaned command output.
    pub output: String,

    /// Time taken to execute the command.
    pub elapsed: Duration,
}

impl Response {
    pub fn new(
        command: impl Into<String>,
        prompt: impl Into<String>,
        output: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            command: command.into(),
            prompt: prompt.into(),
            output: output.into(),
            elapsed,
        }
    }

    /// Get the output lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.output.lines()
    }

    /// Check if the output contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.output.contains(pattern)
    }

    /// Whether the expected prompt was actually reached (false when the
    /// stream ended first).
    pub fn reached_prompt(&self) -> bool {
        self.output.contains(&self.prompt)
    }

    /// The output without the device's echo of the command line, so that
    /// phrases inside the command itself (a description, a serial) are not
    /// mistaken for the device's answer.
    pub fn reply(&self) -> &str {
        let command = self.command.trim();
        match self.output.split_once('\n') {
            Some((first, rest)) if first.trim() == command => rest,
            None if self.output.trim() == command => "",
            _ => &self.output,
        }
    }

    /// Run a parser over the reply, attaching this exchange to its error.
    pub(crate) fn parse<T>(&self, parser: impl FnOnce(&str) -> std::result::Result<T, ParseError>) -> Result<T> {
        parser(self.reply()).map_err(|e| e.into_error(self.command.trim_end(), &self.prompt))
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output)
    }
}
