use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use minihttpd::cli::Cli;
use minihttpd::config::{Config, ConfigError};
use minihttpd::http::framing::FramingPolicy;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "127.0.0.1:4221");
    assert_eq!(cfg.directory, PathBuf::from("."));
    assert_eq!(cfg.read_buffer_size, 1024);
    assert_eq!(cfg.framing, FramingPolicy::SingleRead);
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn test_config_env_overrides() {
    let env = HashMap::from([
        ("LISTEN", "0.0.0.0:3000"),
        ("SERVE_DIR", "/tmp/served"),
    ]);

    let cfg = Config::default().with_env_from(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.directory, PathBuf::from("/tmp/served"));
}

#[test]
fn test_config_env_absent_keeps_values() {
    let cfg = Config::default().with_env_from(|_| None);

    assert_eq!(cfg.listen_addr, "127.0.0.1:4221");
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
listen_addr: "0.0.0.0:8080"
directory: /var/www
framing: content_length
max_request_size: 4096
"#;

    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.directory, PathBuf::from("/var/www"));
    assert_eq!(cfg.framing, FramingPolicy::ContentLength);
    assert_eq!(cfg.limits().max_request_size, 4096);
    // unset keys keep their defaults
    assert_eq!(cfg.read_buffer_size, 1024);
}

#[test]
fn test_config_invalid_yaml() {
    let result = Config::from_yaml_str("framing: sometimes");

    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_missing_file() {
    let result = Config::from_file(std::path::Path::new("/definitely/not/here.yaml"));

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_cli_flags_win_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.yaml");
    std::fs::write(&path, "listen_addr: \"127.0.0.1:9000\"\ndirectory: /from/file\n").unwrap();

    let cli = Cli::parse_from([
        "minihttpd",
        "--config",
        path.to_str().unwrap(),
        "--directory",
        "/from/flag",
    ]);
    let cfg = cli.into_config().unwrap();

    assert_eq!(cfg.directory, PathBuf::from("/from/flag"));
}

#[test]
fn test_cli_without_config_file_uses_defaults_and_flags() {
    let cli = Cli::parse_from([
        "minihttpd",
        "--listen",
        "127.0.0.1:1",
        "--directory",
        "/from/flag",
    ]);
    let cfg = cli.into_config().unwrap();

    assert_eq!(cfg.listen_addr, "127.0.0.1:1");
    assert_eq!(cfg.directory, PathBuf::from("/from/flag"));
    assert_eq!(cfg.read_buffer_size, Config::default().read_buffer_size);
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.listen_addr, cfg2.listen_addr);
}
