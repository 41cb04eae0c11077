//! Logger bootstrap for the demo binary and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// Dependencies log at info level. This crate logs at info too, or at debug
/// when `verbose` is `true`, which adds per-tick combat and dialogue detail.
/// `RUST_LOG` overrides both defaults.
pub fn init(verbose: bool) {
    let own = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let filter = format!("info,{}={own}", env!("CARGO_CRATE_NAME"));

    let mut builder = Builder::from_env(Env::default().default_filter_or(filter));
    builder.format_timestamp_millis();

    // Repeated initialisation (one per test binary thread) keeps the first
    // logger.
    let _ = builder.try_init();
}
