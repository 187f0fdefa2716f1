//! Manifest model and TOML schema.
//!
//! A manifest looks like:
//!
//! ```toml
//! [startest]
//! dir = "./tests"
//! runner = "python3"
//!
//! [[test]]
//! file = "smoke.py"
//! flags = ["--quick"]
//! ok = 0
//! print = "fail/fail"
//! ```
//!
//! Unknown keys are ignored so that older versions of the runner can read
//! newer manifests.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};
use crate::policy::OutputPolicy;

/// Default directory that `file` entries are resolved against.
pub const DEFAULT_TEST_DIR: &str = "./tests";

/// Default manifest path used by the command-line runner.
pub const DEFAULT_MANIFEST_PATH: &str = "./tests.toml";

/// A single test case, resolved against the manifest defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    /// Path of the test to invoke.
    pub path: PathBuf,
    /// Program used to invoke `path`; `None` runs `path` directly.
    pub runner: Option<String>,
    /// Exit code that counts as a pass.
    pub expected_exit_code: i32,
    /// Arguments appended after `path`.
    pub extra_args: Vec<String>,
    /// Which captured output gets echoed.
    pub policy: OutputPolicy,
    /// Whether the test was declared via `path` rather than `file`.
    pub external: bool,
}

impl TestCase {
    /// Creates a test case that runs `path` directly with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            runner: None,
            expected_exit_code: 0,
            extra_args: vec![],
            policy: OutputPolicy::default(),
            external: false,
        }
    }

    /// Returns the name shown in progress output.
    ///
    /// External tests are shown by their full path; tests declared relative
    /// to the test directory are shown by file stem.
    pub fn display_name(&self) -> String {
        if self.external {
            return self.path.to_string_lossy().to_string();
        }

        self.path
            .file_stem()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .to_string()
    }

    fn to_entry(&self) -> TestEntry {
        TestEntry {
            file: None,
            path: Some(self.path.clone()),
            runner: Some(self.runner.clone().unwrap_or_default()),
            flags: Some(self.extra_args.clone()),
            ok: Some(self.expected_exit_code),
            print: Some(self.policy.to_string()),
        }
    }
}

/// Renders the test case back into `[[test]]` manifest form.
impl Display for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = toml::to_string(&self.to_entry()).map_err(|_| std::fmt::Error)?;
        write!(f, "[[test]]\n{body}")
    }
}

/// The ordered set of test cases to run.
#[derive(Clone, Debug)]
pub struct Manifest {
    /// Directory that `file` entries are resolved against.
    pub base_dir: PathBuf,
    /// Runner inherited by entries that don't declare one.
    pub default_runner: Option<String>,
    /// Test cases in execution order; never empty.
    pub cases: Vec<TestCase>,
    /// Where the manifest was loaded from.
    pub source: PathBuf,
}

impl Manifest {
    /// Loads a manifest from the file at `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Parses a manifest from TOML text; `source` is only used in messages.
    pub fn from_toml_str(content: &str, source: &Path) -> Result<Self, Error> {
        let raw: ManifestFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?;

        let header = raw
            .startest
            .ok_or_else(|| ConfigError::MissingHeader(source.to_path_buf()))?;

        let base_dir = header
            .dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEST_DIR));
        let default_runner = header.runner.filter(|r| !r.is_empty());

        let entries = match raw.test {
            Some(entries) if !entries.is_empty() => entries,
            _ => return Err(Error::NoTests(source.to_path_buf())),
        };

        let cases = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.resolve(i + 1, &base_dir, default_runner.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "loaded {} test(s) from {}",
            cases.len(),
            source.display()
        );

        Ok(Self {
            base_dir,
            default_runner,
            cases,
            source: source.to_path_buf(),
        })
    }
}

/// On-disk layout of a manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ManifestFile {
    startest: Option<Header>,
    test: Option<Vec<TestEntry>>,
}

/// The `[startest]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Header {
    dir: Option<PathBuf>,
    runner: Option<String>,
}

/// One `[[test]]` table.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct TestEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ok: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    runner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    print: Option<String>,
}

impl TestEntry {
    fn resolve(
        self,
        index: usize,
        base_dir: &Path,
        default_runner: Option<&str>,
    ) -> Result<TestCase, ConfigError> {
        let (path, external) = match (self.file, self.path) {
            (Some(file), _) => (base_dir.join(file), false),
            (None, Some(path)) => (path, true),
            (None, None) => return Err(ConfigError::MissingTarget(index)),
        };

        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath(index));
        }

        let runner = match self.runner {
            Some(runner) => Some(runner).filter(|r| !r.is_empty()),
            None => default_runner.map(str::to_owned),
        };

        let policy = match self.print {
            Some(spec) => spec.parse()?,
            None => OutputPolicy::default(),
        };

        Ok(TestCase {
            path,
            runner,
            expected_exit_code: self.ok.unwrap_or(0),
            extra_args: self.flags.unwrap_or_default(),
            policy,
            external,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Visibility;
    use pretty_assertions::assert_eq;

    fn parse(content: &str) -> Result<Manifest, Error> {
        Manifest::from_toml_str(content, Path::new("tests.toml"))
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest = parse(
            r#"
            [startest]

            [[test]]
            file = "hello.sh"
        "#,
        )
        .unwrap();

        assert_eq!(manifest.base_dir, PathBuf::from("./tests"));
        assert!(manifest.default_runner.is_none());
        assert_eq!(manifest.cases.len(), 1);

        let case = &manifest.cases[0];
        assert_eq!(case.path, Path::new("./tests").join("hello.sh"));
        assert!(case.runner.is_none());
        assert_eq!(case.expected_exit_code, 0);
        assert!(case.extra_args.is_empty());
        assert_eq!(case.policy, OutputPolicy::default());
        assert!(!case.external);
    }

    #[test]
    fn test_full_manifest() {
        let manifest = parse(
            r#"
            [startest]
            dir = "suite"
            runner = "python3"

            [[test]]
            file = "a.py"

            [[test]]
            path = "/opt/checks/b"
            runner = "bash"
            flags = ["-x", "--fast"]
            ok = 3
            print = "both/never"

            [[test]]
            file = "c.py"
            runner = ""
        "#,
        )
        .unwrap();

        assert_eq!(manifest.default_runner.as_deref(), Some("python3"));
        assert_eq!(manifest.cases.len(), 3);

        let a = &manifest.cases[0];
        assert_eq!(a.path, Path::new("suite").join("a.py"));
        assert_eq!(a.runner.as_deref(), Some("python3"));

        let b = &manifest.cases[1];
        assert_eq!(b.path, PathBuf::from("/opt/checks/b"));
        assert!(b.external);
        assert_eq!(b.runner.as_deref(), Some("bash"));
        assert_eq!(b.extra_args, vec!["-x".to_owned(), "--fast".to_owned()]);
        assert_eq!(b.expected_exit_code, 3);
        assert_eq!(
            b.policy,
            OutputPolicy::new(Visibility::Always, Visibility::Never)
        );

        let c = &manifest.cases[2];
        assert!(c.runner.is_none());
    }

    #[test]
    fn test_file_takes_priority_over_path() {
        let manifest = parse(
            r#"
            [startest]
            dir = "t"

            [[test]]
            file = "x"
            path = "/y"
        "#,
        )
        .unwrap();

        assert_eq!(manifest.cases[0].path, Path::new("t").join("x"));
        assert!(!manifest.cases[0].external);
    }

    #[test]
    fn test_missing_header() {
        let result = parse(
            r#"
            [[test]]
            file = "x"
        "#,
        );

        let err = result.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingHeader(_))));
        assert!(err.to_string().contains("does not look like a startest manifest"));
    }

    #[test]
    fn test_missing_tests_section() {
        let result = parse("[startest]\ndir = \"t\"\n");
        assert!(matches!(result, Err(Error::NoTests(_))));
    }

    #[test]
    fn test_empty_tests_array() {
        let result = parse("test = []\n[startest]\n");
        assert!(matches!(result, Err(Error::NoTests(_))));
    }

    #[test]
    fn test_entry_without_target() {
        let result = parse(
            r#"
            [startest]

            [[test]]
            file = "ok.sh"

            [[test]]
            ok = 1
        "#,
        );

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingTarget(2)))
        ));
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = parse(
            r#"
            [startest]

            [[test]]
            path = ""
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::EmptyPath(1))));
        assert_eq!(err.to_string(), "`[[test]]` entry #1 has an empty `path`");

        let err = parse(
            r#"
            [startest]
            dir = ""

            [[test]]
            file = "ok.sh"

            [[test]]
            file = ""
        "#,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::EmptyPath(2))));
    }

    #[test]
    fn test_invalid_print_filter() {
        let result = parse(
            r#"
            [startest]

            [[test]]
            file = "x"
            print = "fail"
        "#,
        );

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidPolicy(_)))
        ));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let result = parse(
            r#"
            [startest]

            [[test]]
            file = "x"
            ok = "zero"
        "#,
        );

        assert!(matches!(result, Err(Error::Config(ConfigError::Parse { .. }))));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let manifest = parse(
            r#"
            [startest]
            future-option = true

            [[test]]
            file = "x"
            timeout = 10

            [other]
            foo = "bar"
        "#,
        )
        .unwrap();

        assert_eq!(manifest.cases.len(), 1);
    }

    #[test]
    fn test_load_nonexistent() {
        let result = Manifest::load(Path::new("/nonexistent/path/to/tests.toml"));
        assert!(matches!(result, Err(Error::Config(ConfigError::Read { .. }))));
    }

    #[test]
    fn test_display_name() {
        let mut case = TestCase::new(Path::new("tests").join("arith.test.py"));
        assert_eq!(case.display_name(), "arith.test");

        case.external = true;
        assert_eq!(
            case.display_name(),
            Path::new("tests").join("arith.test.py").to_string_lossy()
        );
    }

    #[test]
    fn test_display_renders_manifest_entry() {
        let mut case = TestCase::new("/bin/check");
        case.runner = Some("sh".into());
        case.extra_args = vec!["-v".into()];
        case.expected_exit_code = 2;
        case.external = true;

        let rendered = case.to_string();
        assert!(rendered.starts_with("[[test]]\n"));

        let reparsed = parse(&format!("[startest]\n{rendered}")).unwrap();
        assert_eq!(reparsed.cases, vec![case]);
    }
}
