//! Tests for configuration parsing failure modes

use formwright::config::Config;
use serial_test::serial;

#[test]
fn test_config_missing_addr() {
    let result: Result<Config, _> = toml::from_str("db_path = \"sqlite::memory:\"");
    assert!(result.is_err());
}

#[test]
fn test_config_invalid_types() {
    let result: Result<Config, _> = toml::from_str("addr = \":5000\"\nstrict_identifiers = \"yes\"");
    assert!(result.is_err());

    let result: Result<Config, _> = toml::from_str("addr = \":5000\"\n[argon2]\nmemory_kib = -1");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_env_substitution_missing_var() {
    unsafe {
        std::env::remove_var("FORMWRIGHT_NONEXISTENT_VAR");
    }
    let result = Config::from_toml("addr = \":5000\"\ndb_path = \"$ENV{FORMWRIGHT_NONEXISTENT_VAR}\"");
    assert!(result.is_err());
}

#[test]
fn test_file_substitution_missing_file() {
    let result = Config::from_toml("addr = \":5000\"\ndb_path = \"$FILE{/nonexistent/path/db.uri}\"");
    assert!(result.is_err());
}

#[test]
fn test_missing_config_file() {
    assert!(Config::from_file("/nonexistent/formwright.toml").is_err());
}

#[test]
fn test_invalid_argon2_params() {
    let cfg: Config = toml::from_str("addr = \":5000\"\n[argon2]\nparallelism = 0").unwrap();
    assert!(cfg.argon2.hasher().is_err());
}
