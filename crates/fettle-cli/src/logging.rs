//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber.
///
/// `verbose` forces `debug`. Otherwise `RUST_LOG` applies, defaulting to
/// `warn` so normal runs only surface skipped files and similar problems.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();

    if verbose && result.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}
