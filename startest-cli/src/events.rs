//! Tracing setup for the startest binary.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the tracing filter directives.
pub(crate) const LOG_FILTER_ENV_VAR: &str = "STARTEST_LOG";

/// Directives used when the environment doesn't provide any.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs a stderr subscriber filtered by `STARTEST_LOG`.
///
/// Invalid directives fall back to the default filter with a warning.
pub(crate) fn init_tracing() {
    let filter = match EnvFilter::try_from_env(LOG_FILTER_ENV_VAR) {
        Ok(filter) => filter,
        Err(err) => {
            if std::env::var_os(LOG_FILTER_ENV_VAR).is_some() {
                eprintln!("warning: ignoring invalid {LOG_FILTER_ENV_VAR}: {err}");
            }
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        // Something went wrong; proceed on anyway but complain audibly.
        eprintln!("warning: failed to initialize tracing.");
    }
}
