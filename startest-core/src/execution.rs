//! Execution logic for running a single test process.

use std::borrow::Cow;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::error::ExecutionError;
use crate::manifest::TestCase;

/// Exit code reported when the platform provides neither a code nor a signal.
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Result of running a test process.
#[derive(Debug)]
pub struct RunResult {
    /// Exit code of the process.
    pub exit_code: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Duration of the process.
    pub duration: std::time::Duration,
}

impl TestCase {
    /// Runs this test case to completion, capturing its output.
    ///
    /// A test that exits with an unexpected code is still a successful
    /// execution; only failing to start the process is an error.
    pub fn execute(&self) -> Result<RunResult, ExecutionError> {
        let mut cmd = self.create_command();
        let program = std::path::PathBuf::from(cmd.get_program());

        tracing::debug!("spawning {cmd:?}");

        let start_time = std::time::Instant::now();
        let output = cmd
            .output()
            .map_err(|source| ExecutionError { program, source })?;
        let duration = start_time.elapsed();

        let exit_code = exit_code_of(output.status);

        tracing::debug!(
            "{} exited with {exit_code} after {duration:?}",
            self.path.display()
        );

        Ok(RunResult {
            exit_code,
            stdout: String::from_utf8_lossy(output.stdout.as_slice()).to_string(),
            stderr: String::from_utf8_lossy(output.stderr.as_slice()).to_string(),
            duration,
        })
    }

    fn create_command(&self) -> Command {
        let mut cmd = match &self.runner {
            Some(runner) => {
                let mut cmd = Command::new(runner);
                cmd.arg(&self.path);
                cmd
            }
            None => Command::new(self.program_path().as_os_str()),
        };

        cmd.args(&self.extra_args);
        cmd
    }

    /// Returns the path to execute when there is no runner.
    ///
    /// A bare file name is anchored to the working directory so that it is
    /// never looked up through `PATH`.
    fn program_path(&self) -> Cow<'_, Path> {
        if self.path.is_relative() && self.path.components().count() == 1 {
            Cow::Owned(Path::new(".").join(&self.path))
        } else {
            Cow::Borrowed(self.path.as_path())
        }
    }
}

/// Maps an exit status to an integer code.
///
/// On Unix, a process terminated by a signal is reported as the negated
/// signal number.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            tracing::warn!("test process terminated by signal {signal}");
            return -signal;
        }
    }

    UNKNOWN_EXIT_CODE
}
