//! Implements the `startest` command-line test runner.

mod args;
mod entry;
mod events;
mod productinfo;

/// Main entry point for the `startest` binary.
fn main() {
    entry::run();
}
