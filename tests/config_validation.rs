#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Configuration parsing and validation.

use sasl_channel::config::ChannelConfig;
use sasl_channel::WireEncoding;

#[test]
fn default_config_is_valid() {
    let config = ChannelConfig::default();
    let errors = config.validate();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    config.validate_strict().expect("strict validation");
}

#[test]
fn default_values_match_documented_defaults() {
    let config = ChannelConfig::default();
    assert_eq!(config.handshake.mechanism, "krb5");
    assert_eq!(config.handshake.initial_encoding, WireEncoding::Binary);
    assert_eq!(config.framing.max_frame_size, 16 * 1024 * 1024);
    assert_eq!(config.workers.capacity, 32);
    assert_eq!(config.logging.app_name, "sasl-channel");
}

#[test]
fn empty_mechanism_is_rejected() {
    let config = ChannelConfig::default_with_overrides(|c| {
        c.handshake.mechanism = String::new();
    });
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Mechanism identifier")));
    assert!(config.validate_strict().is_err());
}

#[test]
fn tiny_and_zero_frame_sizes_are_rejected() {
    let config = ChannelConfig::default_with_overrides(|c| {
        c.framing.max_frame_size = 0;
    });
    assert!(!config.validate().is_empty());

    let config = ChannelConfig::default_with_overrides(|c| {
        c.framing.max_frame_size = 512;
    });
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("too small")));
}

#[test]
fn zero_worker_capacity_is_rejected() {
    let config = ChannelConfig::default_with_overrides(|c| {
        c.workers.capacity = 0;
    });
    assert!(config
        .validate()
        .iter()
        .any(|e| e.contains("Worker capacity")));
}

#[test]
fn toml_round_trip_preserves_settings() {
    let config = ChannelConfig::default_with_overrides(|c| {
        c.handshake.mechanism = "gssapi".into();
        c.handshake.initial_encoding = WireEncoding::Compact;
        c.framing.max_frame_size = 1024 * 1024;
        c.workers.capacity = 4;
        c.logging.json_format = true;
    });

    let toml = toml::to_string_pretty(&config).expect("serialize");
    let parsed = ChannelConfig::from_toml(&toml).expect("parse");

    assert_eq!(parsed.handshake.mechanism, "gssapi");
    assert_eq!(parsed.handshake.initial_encoding, WireEncoding::Compact);
    assert_eq!(parsed.framing.max_frame_size, 1024 * 1024);
    assert_eq!(parsed.workers.capacity, 4);
    assert!(parsed.logging.json_format);
}

#[test]
fn partial_toml_falls_back_to_defaults() {
    let parsed = ChannelConfig::from_toml(
        r#"
        [handshake]
        mechanism = "gssapi"
        initial_encoding = "compact"
        "#,
    )
    .expect("parse");

    assert_eq!(parsed.handshake.mechanism, "gssapi");
    assert_eq!(parsed.handshake.initial_encoding, WireEncoding::Compact);
    // Untouched sections keep their defaults.
    assert_eq!(parsed.workers.capacity, 32);
    assert_eq!(parsed.framing.max_frame_size, 16 * 1024 * 1024);
}

#[test]
fn malformed_toml_is_a_config_error() {
    let result = ChannelConfig::from_toml("handshake = \"not a table\"");
    assert!(result.is_err());
}

#[test]
fn invalid_log_level_is_rejected() {
    let result = ChannelConfig::from_toml(
        r#"
        [logging]
        app_name = "test"
        log_level = "verbose"
        json_format = false
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn env_overrides_apply() {
    std::env::set_var("SASL_CHANNEL_MECHANISM", "gssapi");
    std::env::set_var("SASL_CHANNEL_MAX_FRAME_SIZE", "2097152");
    std::env::set_var("SASL_CHANNEL_WORKER_CAPACITY", "7");

    let config = ChannelConfig::from_env().expect("from_env");
    assert_eq!(config.handshake.mechanism, "gssapi");
    assert_eq!(config.framing.max_frame_size, 2 * 1024 * 1024);
    assert_eq!(config.workers.capacity, 7);

    std::env::remove_var("SASL_CHANNEL_MECHANISM");
    std::env::remove_var("SASL_CHANNEL_MAX_FRAME_SIZE");
    std::env::remove_var("SASL_CHANNEL_WORKER_CAPACITY");
}
