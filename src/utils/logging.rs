//! Structured logging setup.
//!
//! Installs a global tracing subscriber according to the `[logging]` section
//! of the channel configuration. Installation happens at most once per
//! process; a second call reports a configuration error rather than
//! panicking.

use crate::config::LoggingConfig;
use crate::error::{Result, SaslError};

/// Install the global tracing subscriber described by `config`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(false);

    let installed = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| SaslError::Config(format!("Failed to install tracing subscriber: {e}")))
}
