//! Reporting utilities for test progress and results.

use std::io::Write;

use colored::Colorize;

use crate::execution::RunResult;
use crate::policy::{Channel, Outcome, OutputPolicy};

/// Indentation of echoed output headers.
const HEADER_INDENT: &str = "      ";

/// Prefix of each echoed output line.
const OUTPUT_PREFIX: &str = "      >>";

/// Final tallies of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of test cases in the manifest.
    pub total: usize,
    /// Number of passing test cases.
    pub passed: usize,
    /// Number of failing test cases.
    pub failed: usize,
}

impl RunSummary {
    /// Returns the process exit code for this run: the number of failures.
    ///
    /// Hosts with narrow exit codes truncate this value, so a multiple of 256
    /// failures may be observed as success.
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.failed).unwrap_or(i32::MAX)
    }

    /// Writes the closing summary block.
    pub fn write_summary<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", "---[TEST SUMMARY]---".bold().yellow())?;

        if self.failed == 0 {
            writeln!(writer, "{}", "All tests passed".green())?;
        } else if self.passed == 0 {
            writeln!(writer, "{}", "All tests failed".red())?;
        } else {
            writeln!(writer, "{}", format!("Passed: {}", self.passed).green())?;
            writeln!(writer, "{}", format!("Failed: {}", self.failed).red())?;
        }

        Ok(())
    }
}

/// Writes the banner that opens a run.
pub(crate) fn write_banner<W: Write>(writer: &mut W, total: usize) -> std::io::Result<()> {
    writeln!(
        writer,
        "{}",
        format!("---[TEST {total} total]---").bold().yellow()
    )
}

/// Writes the notice shown when a manifest declares no tests.
pub fn write_no_tests<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "---[NO TESTS]---".bold().yellow())
}

/// Writes the progress prefix for a test, without a trailing newline.
pub(crate) fn write_progress<W: Write>(
    writer: &mut W,
    current: usize,
    total: usize,
    name: &str,
) -> std::io::Result<()> {
    write!(
        writer,
        "{}",
        format!("({current}/{total}) {name} ... ").bold().yellow()
    )?;
    writer.flush()
}

/// Writes the verdict for a test and any output its policy selects.
pub(crate) fn write_outcome<W: Write>(
    writer: &mut W,
    outcome: Outcome,
    policy: OutputPolicy,
    result: &RunResult,
) -> std::io::Result<()> {
    match outcome {
        Outcome::Pass => writeln!(writer, "{}", "OK".green())?,
        Outcome::Fail => writeln!(writer, "{}", "FAIL".red())?,
    }

    for channel in [Channel::Stdout, Channel::Stderr] {
        if !policy.should_show(channel, outcome) {
            continue;
        }

        let (label, text) = match channel {
            Channel::Stdout => ("stdout:", &result.stdout),
            Channel::Stderr => ("stderr:", &result.stderr),
        };

        writeln!(writer, "{HEADER_INDENT}{}", label.bold().blue())?;
        writeln!(writer, "{}", indent_output(text))?;
    }

    Ok(())
}

/// Prefixes each line of captured output; whitespace-only lines stay bare.
fn indent_output(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_owned()
            } else {
                indent::indent_all_with(OUTPUT_PREFIX, line)
            }
        })
        .collect()
}
