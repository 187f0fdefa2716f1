//! Error types for manifest loading and test execution.

use std::path::PathBuf;

/// Monolithic error type for a startest run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The manifest is malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The manifest declares no `[[test]]` entries.
    #[error("no tests found in {}", .0.display())]
    NoTests(PathBuf),

    /// A test process could not be spawned.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns whether this error should end the process as a harness failure
    /// rather than as a benign empty run.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoTests(_))
    }
}

/// Errors describing a malformed manifest.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The manifest file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid TOML, or a key has the wrong type.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// Path of the manifest.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The `[startest]` header table is missing.
    #[error(
        "could not find the `[startest]` header in {}, so this file does not look like a startest manifest",
        .0.display()
    )]
    MissingHeader(PathBuf),

    /// A `[[test]]` entry declares neither `file` nor `path`.
    #[error("`[[test]]` entry #{0} has neither `file` nor `path`")]
    MissingTarget(usize),

    /// A `[[test]]` entry resolves to an empty path.
    #[error("`[[test]]` entry #{0} has an empty `path`")]
    EmptyPath(usize),

    /// An output policy specifier could not be parsed.
    #[error("invalid print filter: '{0}'")]
    InvalidPolicy(String),
}

/// Error raised when a test process cannot be started.
#[derive(thiserror::Error, Debug)]
#[error("failed to spawn {}: {source}", .program.display())]
pub struct ExecutionError {
    /// The program that failed to start.
    pub program: PathBuf,
    /// Underlying I/O error.
    #[source]
    pub source: std::io::Error,
}
