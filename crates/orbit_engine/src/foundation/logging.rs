//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

use crate::core::config::EngineConfig;

/// Initialize the logging system at the given default level
///
/// `RUST_LOG` still wins when set. Calling this more than once is harmless, which
/// keeps tests and multiple engines in one process from fighting over the logger.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::trace!("Logger already initialized");
    }
}

/// Initialize logging from the engine configuration
pub fn init_from_config(config: &EngineConfig) {
    init(&config.log_level);
}
