//! Implements the command-line interface for `startest`.

use std::io::Write;

use clap::Parser;
use startest_core::{Error, Manifest, TestRunner};

use crate::args::CommandLineArgs;
use crate::events;
use crate::productinfo;

/// Exit code used when the harness itself fails, as opposed to a test.
pub(crate) const HARNESS_FAILURE_EXIT_CODE: i32 = 255;

/// Main entry point for `startest`.
pub(crate) fn run() {
    install_panic_handler();

    //
    // Parse args.
    //
    let args = match CommandLineArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();

            // clap returns errors for `--help` and `--version` too.
            let exit_code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => HARNESS_FAILURE_EXIT_CODE,
            };

            std::process::exit(exit_code);
        }
    };

    events::init_tracing();

    //
    // Run.
    //
    let exit_code = match run_impl(&args) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("error: {err:#}");
            HARNESS_FAILURE_EXIT_CODE
        }
    };

    std::process::exit(exit_code);
}

/// Installs a panic handler that reports panics in a human-readable form.
fn install_panic_handler() {
    human_panic::setup_panic!(
        human_panic::Metadata::new(productinfo::PRODUCT_NAME, productinfo::PRODUCT_VERSION)
            .support("please report it to the startest maintainers along with the manifest used")
    );
}

/// Loads the manifest and runs it. Returns the exit code.
///
/// A manifest without tests is a clean, empty run rather than an error.
fn run_impl(args: &CommandLineArgs) -> Result<i32, Error> {
    let mut stdout = std::io::stdout().lock();

    tracing::debug!("loading manifest from {}", args.config.display());

    let manifest = match Manifest::load(&args.config) {
        Ok(manifest) => manifest,
        Err(err) if !err.is_fatal() => {
            tracing::debug!("{err}");
            startest_core::write_no_tests(&mut stdout)?;
            stdout.flush()?;
            return Ok(0);
        }
        Err(err) => return Err(err),
    };

    let summary = TestRunner::new(&manifest).run(&mut stdout)?;
    stdout.flush()?;

    Ok(summary.exit_code())
}
