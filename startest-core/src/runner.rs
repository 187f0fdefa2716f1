//! Test runner implementation.

use std::io::Write;

use crate::error::Error;
use crate::manifest::{Manifest, TestCase};
use crate::policy::Outcome;
use crate::reporting::{self, RunSummary};

/// Tallies for a single run; starts from zero every time a run begins.
#[derive(Debug)]
struct RunState {
    total: usize,
    current: usize,
    passed: usize,
    failed: usize,
}

impl RunState {
    const fn new(total: usize) -> Self {
        Self {
            total,
            current: 1,
            passed: 0,
            failed: 0,
        }
    }

    const fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
        }
        self.current += 1;
    }

    const fn finish(self) -> RunSummary {
        RunSummary {
            total: self.total,
            passed: self.passed,
            failed: self.failed,
        }
    }
}

/// Runs the test cases of a manifest in order and reports on them.
pub struct TestRunner<'a> {
    manifest: &'a Manifest,
}

impl<'a> TestRunner<'a> {
    /// Creates a new test runner for the given manifest.
    pub const fn new(manifest: &'a Manifest) -> Self {
        Self { manifest }
    }

    /// Runs every test case, writing progress and the summary to `writer`.
    ///
    /// Test failures are counted, not returned as errors. The run is aborted
    /// only if a test process cannot be spawned or the writer fails.
    pub fn run<W: Write>(&self, writer: &mut W) -> Result<RunSummary, Error> {
        let mut state = RunState::new(self.manifest.cases.len());

        reporting::write_banner(writer, state.total)?;

        for test_case in &self.manifest.cases {
            let outcome = run_single_test(test_case, &state, writer)?;
            state.record(outcome);
        }

        let summary = state.finish();
        summary.write_summary(writer)?;

        tracing::debug!(
            "{} test case(s) ran: {} passed, {} failed",
            summary.total,
            summary.passed,
            summary.failed
        );

        Ok(summary)
    }
}

fn run_single_test<W: Write>(
    test_case: &TestCase,
    state: &RunState,
    writer: &mut W,
) -> Result<Outcome, Error> {
    tracing::debug!("running test case:\n{test_case}");

    reporting::write_progress(
        writer,
        state.current,
        state.total,
        &test_case.display_name(),
    )?;

    let result = match test_case.execute() {
        Ok(result) => result,
        Err(err) => {
            // Terminate the progress line before bailing out.
            writeln!(writer)?;
            return Err(err.into());
        }
    };

    let outcome = if result.exit_code == test_case.expected_exit_code {
        Outcome::Pass
    } else {
        Outcome::Fail
    };

    reporting::write_outcome(writer, outcome, test_case.policy, &result)?;

    Ok(outcome)
}
