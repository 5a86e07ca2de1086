//! Configuration tests
//!
//! Precedence is exercised through `Config::resolve` with a fake environment
//! so tests never depend on (or mutate) the real process environment.

use super::*;
use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that the serialized default config parses back into FileConfig.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let resolved = Config::resolve(parsed.unwrap(), |_| None).unwrap();
    assert_eq!(resolved.bind_addr, config.bind_addr);
    assert_eq!(resolved.api_url, config.api_url);
    assert_eq!(resolved.model, config.model);
    assert_eq!(resolved.allowed_origin, config.allowed_origin);
    assert_eq!(resolved.system_prompt, config.system_prompt);
    assert_eq!(resolved.upstream, config.upstream);
    assert_eq!(resolved.logging, config.logging);
}

/// Quotes and non-ASCII text in the persona must survive serialization.
#[test]
fn test_config_roundtrip_escapes_prompt() {
    let mut config = Config::default();
    config.system_prompt = "Say \"hi\" – then\nstop \\ here".to_string();

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(parsed.system_prompt.as_deref(), Some(config.system_prompt.as_str()));
}

#[test]
fn test_toml_never_contains_api_key() {
    let mut config = Config::default();
    config.api_key = Some("sk-secret-value".to_string());

    assert!(!config.to_toml().contains("sk-secret-value"));
    assert!(!format!("{:?}", config).contains("sk-secret-value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults_when_nothing_configured() {
    let config = Config::resolve(FileConfig::default(), |_| None).unwrap();

    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(config.api_url, "https://api.openai.com/v1/responses");
    assert_eq!(config.model, "gpt-4.1-mini");
    assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    assert!(!config.has_api_key());
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
bind_addr = "0.0.0.0:9000"
model = "from-file"
allowed_origin = "https://file.example"
"#,
    )
    .unwrap();

    let env = env_of(&[
        ("EDITOR_RELAY_MODEL", "from-env"),
        ("OPENAI_API_KEY", "sk-test"),
    ]);
    let config = Config::resolve(file, env).unwrap();

    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
    assert_eq!(config.model, "from-env");
    assert_eq!(config.allowed_origin, "https://file.example");
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
}

#[test]
fn test_blank_api_key_counts_as_missing() {
    let config = Config::resolve(FileConfig::default(), env_of(&[("OPENAI_API_KEY", "  ")]))
        .unwrap();
    assert!(!config.has_api_key());
}

#[test]
fn test_invalid_bind_addr_is_error() {
    let result = Config::resolve(
        FileConfig::default(),
        env_of(&[("EDITOR_RELAY_BIND", "not-an-address")]),
    );
    assert!(result.is_err());
}

#[test]
fn test_read_timeout_env_override() {
    let file: FileConfig = toml::from_str("[upstream]\nread_timeout_secs = 5\n").unwrap();

    let from_file = Config::resolve(file, |_| None).unwrap();
    assert_eq!(from_file.upstream.read_timeout_secs, 5);
    assert_eq!(from_file.upstream.connect_timeout_secs, 10);

    let from_env = Config::resolve(
        FileConfig::default(),
        env_of(&[("EDITOR_RELAY_READ_TIMEOUT", "7")]),
    )
    .unwrap();
    assert_eq!(from_env.upstream.read_timeout_secs, 7);

    let bad = Config::resolve(
        FileConfig::default(),
        env_of(&[("EDITOR_RELAY_READ_TIMEOUT", "soon")]),
    );
    assert!(bad.is_err());
}

#[test]
fn test_zero_timeouts_rejected() {
    let file: FileConfig = toml::from_str("[upstream]\nconnect_timeout_secs = 0\n").unwrap();
    let err = Config::resolve(file, |_| None).unwrap_err();
    assert!(format!("{:#}", err).contains("connect_timeout_secs"));

    let err = Config::resolve(
        FileConfig::default(),
        env_of(&[("EDITOR_RELAY_READ_TIMEOUT", "0")]),
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("read_timeout_secs"));
}

#[test]
fn test_log_rotation_parse() {
    assert_eq!(LogRotation::parse("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::parse("never"), LogRotation::Never);
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
}
