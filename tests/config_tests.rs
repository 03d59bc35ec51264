//! Configuration loading through the public entry point.

use slugly::config::{Config, LogFormat};
use slugly::error::AppError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_explicit_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("slugly.yaml"),
        r#"
mysql_user: shortener
mysql_password: secret
mysql_host: 127.0.0.1
mysql_database: links
short_url: http://short.ly
default_url: https://home.example
log_format: json
"#,
    )
    .unwrap();

    let config = Config::load(Some(dir.path())).unwrap();

    assert_eq!(config.database.describe(), "shortener@127.0.0.1:3306/links");
    assert_eq!(config.links.short_url.as_deref(), Some("http://short.ly"));
    assert_eq!(config.links.default_url.as_deref(), Some("https://home.example"));
    assert_eq!(config.server.log_format, LogFormat::Json);
    assert_eq!(config.server.addr(), "0.0.0.0:8080");
}

#[test]
fn test_load_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("slugly.toml"),
        r#"
mysql_user = "shortener"
mysql_password = "secret"
mysql_host = "127.0.0.1"
mysql_database = "links"
slug_length = 40
"#,
    )
    .unwrap();

    let result = Config::load(Some(dir.path()));

    assert!(matches!(result, Err(AppError::Configuration(msg)) if msg.contains("slug_length")));
}
