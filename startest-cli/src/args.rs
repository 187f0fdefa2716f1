use clap::{Parser, builder::styling};
use std::path::PathBuf;

use crate::productinfo;

const SHORT_DESCRIPTION: &str = "A tiny yet flexible test runner";

const LONG_DESCRIPTION: &str = r"
startest runs the test programs listed in a TOML manifest one at a time, compares
each exit code against the expected one, and prints a pass/fail summary.

The process exits with the number of failed tests.
";

/// Parsed command-line arguments for startest.
#[derive(Parser, Debug)]
#[clap(name = productinfo::PRODUCT_NAME,
       version = productinfo::PRODUCT_VERSION,
       about = SHORT_DESCRIPTION,
       long_about = LONG_DESCRIPTION,
       styles = startest_help_styles())]
pub(crate) struct CommandLineArgs {
    /// Override manifest path.
    #[clap(
        short = 'c',
        long = "config",
        value_name = "PATH",
        default_value = startest_core::DEFAULT_MANIFEST_PATH,
        env = "STARTEST_CONFIG"
    )]
    pub config: PathBuf,
}

/// Returns clap styling to be used for command-line help.
fn startest_help_styles() -> clap::builder::Styles {
    styling::Styles::styled()
        .header(
            styling::AnsiColor::Yellow.on_default()
                | styling::Effects::BOLD
                | styling::Effects::UNDERLINE,
        )
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Magenta.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let args = CommandLineArgs::try_parse_from(["startest"]).unwrap();
        assert_eq!(args.config, PathBuf::from("./tests.toml"));
    }

    #[test]
    fn test_config_flag() {
        let args = CommandLineArgs::try_parse_from(["startest", "-c", "a.toml"]).unwrap();
        assert_eq!(args.config, PathBuf::from("a.toml"));

        let args = CommandLineArgs::try_parse_from(["startest", "--config", "b.toml"]).unwrap();
        assert_eq!(args.config, PathBuf::from("b.toml"));
    }

    #[test]
    fn test_rejects_positional_args() {
        assert!(CommandLineArgs::try_parse_from(["startest", "extra"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        CommandLineArgs::command().debug_assert();
    }
}
