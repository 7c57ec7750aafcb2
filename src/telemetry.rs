//! Logging bootstrap.
//!
//! The crate logs through `tracing`; embedders that do not install
//! their own subscriber can call [`init`] once at startup.

use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install an env-filtered (`LOG=...`) compact stderr subscriber.
///
/// Quietly does nothing if a global subscriber is already set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_from_verbosity(verbosity).into())
        .with_env_var("LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}
