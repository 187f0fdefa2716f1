//! Core library for startest, a declarative runner for external test programs.
//!
//! A manifest lists test programs together with the exit code each one is
//! expected to return. The runner executes them one at a time, in manifest
//! order, counts each as passed or failed, and echoes captured output
//! according to a per-test [`OutputPolicy`].
//!
//! ```no_run
//! use startest_core::{Manifest, TestRunner};
//!
//! # fn main() -> Result<(), startest_core::Error> {
//! let manifest = Manifest::load(std::path::Path::new("./tests.toml"))?;
//! let summary = TestRunner::new(&manifest).run(&mut std::io::stdout())?;
//! std::process::exit(summary.exit_code());
//! # }
//! ```

mod error;
mod execution;
mod manifest;
mod policy;
mod reporting;
mod runner;

pub use error::{ConfigError, Error, ExecutionError};
pub use execution::{RunResult, UNKNOWN_EXIT_CODE};
pub use manifest::{DEFAULT_MANIFEST_PATH, DEFAULT_TEST_DIR, Manifest, TestCase};
pub use policy::{Channel, Outcome, OutputPolicy, Visibility};
pub use reporting::{RunSummary, write_no_tests};
pub use runner::TestRunner;
