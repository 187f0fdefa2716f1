//! Output visibility policy for captured test output.
//!
//! A policy is written as `"<stdout>/<stderr>"`, where each side is one of
//! `never`, `ok`, `fail`, or `both` and says for which outcomes that channel
//! gets echoed. Internally this is the 4-bit state:
//!
//! | bit | meaning                    |
//! |-----|----------------------------|
//! | 0   | stdout when the test passes |
//! | 1   | stdout when the test fails  |
//! | 2   | stderr when the test passes |
//! | 3   | stderr when the test fails  |

use std::{fmt::Display, str::FromStr};

use crate::error::ConfigError;

/// A captured output stream of a test process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// Classification of a finished test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The exit code matched the expectation.
    Pass,
    /// The exit code did not match the expectation.
    Fail,
}

/// For which outcomes a single channel is echoed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Never shown.
    Never,
    /// Shown only when the test passes (`ok`).
    OnPass,
    /// Shown only when the test fails (`fail`).
    #[default]
    OnFail,
    /// Always shown (`both`).
    Always,
}

impl Visibility {
    const fn bits(self) -> u8 {
        match self {
            Self::Never => 0b00,
            Self::OnPass => 0b01,
            Self::OnFail => 0b10,
            Self::Always => 0b11,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Never,
            0b01 => Self::OnPass,
            0b10 => Self::OnFail,
            _ => Self::Always,
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::OnPass => "ok",
            Self::OnFail => "fail",
            Self::Always => "both",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "never" => Some(Self::Never),
            "ok" => Some(Self::OnPass),
            "fail" => Some(Self::OnFail),
            "both" => Some(Self::Always),
            _ => None,
        }
    }

    /// Returns whether the channel is shown for the given outcome.
    pub const fn includes(self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Pass => matches!(self, Self::OnPass | Self::Always),
            Outcome::Fail => matches!(self, Self::OnFail | Self::Always),
        }
    }
}

/// Decides which captured channels of a test are echoed after it runs.
///
/// The default is `fail/fail`: nothing is shown for a passing test, and both
/// stdout and stderr are shown for a failing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputPolicy {
    /// Visibility of stdout.
    pub stdout: Visibility,
    /// Visibility of stderr.
    pub stderr: Visibility,
}

impl OutputPolicy {
    /// Creates a policy from per-channel visibilities.
    pub const fn new(stdout: Visibility, stderr: Visibility) -> Self {
        Self { stdout, stderr }
    }

    /// Returns the raw 4-bit state.
    pub const fn bits(self) -> u8 {
        self.stdout.bits() | (self.stderr.bits() << 2)
    }

    /// Builds a policy from a raw 4-bit state; higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            stdout: Visibility::from_bits(bits),
            stderr: Visibility::from_bits(bits >> 2),
        }
    }

    /// Returns whether `channel` should be echoed for a test with `outcome`.
    pub const fn should_show(self, channel: Channel, outcome: Outcome) -> bool {
        match channel {
            Channel::Stdout => self.stdout.includes(outcome),
            Channel::Stderr => self.stderr.includes(outcome),
        }
    }
}

impl FromStr for OutputPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidPolicy(s.to_owned());

        let (stdout, stderr) = s.split_once('/').ok_or_else(invalid)?;
        if stderr.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            stdout: Visibility::from_symbol(stdout).ok_or_else(invalid)?,
            stderr: Visibility::from_symbol(stderr).ok_or_else(invalid)?,
        })
    }
}

impl Display for OutputPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.stdout.symbol(), self.stderr.symbol())
    }
}
