use tracing_subscriber::EnvFilter;

use super::config::{LogFormat, LoggerConfig};

/// Build the `EnvFilter` for a config: `RUST_LOG` wins when set, otherwise the
/// configured level drives every target.
fn build_filter(config: &LoggerConfig) -> EnvFilter {
    let spec = config.get_filter_string();
    if spec.is_empty() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone()))
    } else {
        EnvFilter::new(spec)
    }
}

/// Install the global tracing subscriber. Called exactly once at process
/// start, before any `tracing::*!` call -- a second call is a silent no-op
/// per `tracing_subscriber`'s own `set_global_default` contract.
pub fn init_logger(config: &LoggerConfig) {
    let filter = build_filter(config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if result.is_err() {
        // A subscriber is already installed (common in test binaries that call
        // this more than once); nothing to do.
    }
}

/// Initialize with the process default config (dev-mode auto-detected).
pub fn init_default() {
    init_logger(&LoggerConfig::default());
}
