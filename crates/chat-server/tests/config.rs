// crates/chat-server/tests/config.rs
use std::collections::HashMap;
use std::time::Duration;

use chat_server::config::{Config, ConfigError};

fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_match_the_classic_relay() {
    let config = from_pairs(&[]).unwrap();
    assert_eq!(config.socket_addr_string(), "127.0.0.1:5555");
    assert_eq!(config.max_clients, 1024);
    assert_eq!(config.filter.words(), &["badword".to_string()]);
    assert_eq!(config.handshake_timeout, Duration::from_secs(30));
}

#[test]
fn overrides_are_parsed() {
    let config = from_pairs(&[
        ("CHAT_BIND_ADDR", "0.0.0.0"),
        ("CHAT_PORT", "6000"),
        ("CHAT_MAX_CLIENTS", " 8 "),
        ("CHAT_FILTERED_WORDS", "Foo,bar"),
        ("CHAT_HANDSHAKE_TIMEOUT_SECS", "5"),
    ])
    .unwrap();
    assert_eq!(config.socket_addr_string(), "0.0.0.0:6000");
    assert_eq!(config.max_clients, 8);
    assert!(config.filter.is_blocked("FOO fighters"));
    assert!(!config.filter.is_blocked("badword"));
    assert_eq!(config.handshake_timeout, Duration::from_secs(5));
}

#[test]
fn malformed_values_are_errors() {
    let err = from_pairs(&[("CHAT_PORT", "not-a-port")]).unwrap_err();
    assert!(err.to_string().contains("CHAT_PORT"));

    assert!(from_pairs(&[("CHAT_PORT", "70000")]).is_err());
    assert!(from_pairs(&[("CHAT_MAX_CLIENTS", "0")]).is_err());
    assert!(from_pairs(&[("CHAT_HANDSHAKE_TIMEOUT_SECS", "0")]).is_err());
}
