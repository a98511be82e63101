//! # Configuration Management
//!
//! Centralized configuration for the SASL channel.
//!
//! This module provides structured configuration for the handshake
//! coordinator, secure-channel framing, the worker pool, and logging.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-variable overrides via `from_env()`

use crate::core::codec::WireEncoding;
use crate::error::{Result, SaslError};
use crate::protocol::framing::MAX_FRAME_SIZE;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// The mechanism identifier used when none is configured.
pub const DEFAULT_MECHANISM: &str = "krb5";

/// Default bound on concurrently scheduled handshake jobs.
pub const DEFAULT_WORKER_CAPACITY: usize = 32;

/// Main configuration structure for one channel deployment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ChannelConfig {
    /// Handshake configuration
    #[serde(default)]
    pub handshake: HandshakeConfig,

    /// Secure-channel framing configuration
    #[serde(default)]
    pub framing: FramingConfig,

    /// Worker pool configuration
    #[serde(default)]
    pub workers: WorkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChannelConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| SaslError::Config(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| SaslError::Config(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| SaslError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(mechanism) = std::env::var("SASL_CHANNEL_MECHANISM") {
            config.handshake.mechanism = mechanism;
        }

        if let Ok(size) = std::env::var("SASL_CHANNEL_MAX_FRAME_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.framing.max_frame_size = val;
            }
        }

        if let Ok(capacity) = std::env::var("SASL_CHANNEL_WORKER_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.workers.capacity = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SaslError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| SaslError::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common misconfigurations.
    ///
    /// Returns a list of validation errors. Empty list means the
    /// configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.handshake.validate());
        errors.extend(self.framing.validate());
        errors.extend(self.workers.validate());
        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SaslError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Handshake configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandshakeConfig {
    /// The single supported mechanism identifier
    pub mechanism: String,

    /// Wire encoding new sessions start with; the compatibility fallback
    /// may re-pin individual sessions to the alternate encoding
    pub initial_encoding: WireEncoding,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            mechanism: String::from(DEFAULT_MECHANISM),
            initial_encoding: WireEncoding::default(),
        }
    }
}

impl HandshakeConfig {
    /// Validate handshake configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.mechanism.is_empty() {
            errors.push("Mechanism identifier cannot be empty".to_string());
        } else if self.mechanism.len() > 64 {
            errors.push(format!(
                "Mechanism identifier too long: {} characters (maximum: 64)",
                self.mechanism.len()
            ));
        }

        errors
    }
}

/// Secure-channel framing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FramingConfig {
    /// Maximum allowed wrapped-payload size in bytes
    pub max_frame_size: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}

impl FramingConfig {
    /// Validate framing configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_frame_size == 0 {
            errors.push("Max frame size cannot be 0".to_string());
        } else if self.max_frame_size < 1024 {
            errors.push("Max frame size too small (minimum: 1 KB)".to_string());
        } else if self.max_frame_size > 100 * 1024 * 1024 {
            errors.push(format!(
                "Max frame size too large: {} bytes (maximum recommended: 100 MB)",
                self.max_frame_size
            ));
        }

        errors
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Maximum number of concurrently scheduled handshake jobs
    pub capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_WORKER_CAPACITY,
        }
    }
}

impl WorkerConfig {
    /// Validate worker configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.capacity == 0 {
            errors.push("Worker capacity must be greater than 0".to_string());
        } else if self.capacity > 10_000 {
            errors.push(format!(
                "Worker capacity very high: {} (ensure system resources can support this)",
                self.capacity
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("sasl-channel"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
