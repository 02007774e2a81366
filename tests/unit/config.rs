use formwright::config::Config;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn default_paths() {
    let cfg: Config = toml::from_str("addr=\":5000\"").unwrap();
    assert_eq!(cfg.db_path, "sqlite:///var/formwright/forms.db");
    assert_eq!(cfg.auth_db_path, "sqlite:///var/formwright/auth.db");
    assert!(!cfg.strict_identifiers);
    assert_eq!(cfg.argon2, Default::default());
}

#[test]
fn full_config() {
    let toml = r#"addr = "127.0.0.1:5000"
db_path = "sqlite::memory:"
auth_db_path = "postgres://localhost/survey"
strict_identifiers = true
[argon2]
memory_kib = 8192
iterations = 3
"#;
    let cfg: Config = toml::from_str(toml).unwrap();
    assert_eq!(cfg.addr, "127.0.0.1:5000");
    assert_eq!(cfg.auth_db_path, "postgres://localhost/survey");
    assert!(cfg.strict_identifiers);
    assert_eq!(cfg.argon2.memory_kib, Some(8192));
    assert_eq!(cfg.argon2.iterations, Some(3));
    assert_eq!(cfg.argon2.parallelism, None);
    assert!(cfg.argon2.hasher().is_ok());
}

#[test]
fn from_file_reads_toml() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "addr = \":8080\"\ndb_path = \"sqlite::memory:\"").unwrap();
    let cfg = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(cfg.addr, ":8080");
    assert_eq!(cfg.db_path, "sqlite::memory:");
}

#[test]
#[serial]
fn env_placeholder_is_expanded() {
    unsafe {
        std::env::set_var("FORMWRIGHT_TEST_DB", "sqlite:///tmp/forms-test.db");
    }
    let cfg = Config::from_toml("addr = \":5000\"\ndb_path = \"$ENV{FORMWRIGHT_TEST_DB}\"").unwrap();
    assert_eq!(cfg.db_path, "sqlite:///tmp/forms-test.db");
    unsafe {
        std::env::remove_var("FORMWRIGHT_TEST_DB");
    }
}

#[test]
fn file_placeholder_is_expanded() {
    let mut secret = NamedTempFile::new().unwrap();
    writeln!(secret, "postgres://app:secret@db/survey").unwrap();
    let text = format!(
        "addr = \":5000\"\nauth_db_path = \"$FILE{{{}}}\"",
        secret.path().display()
    );
    let cfg = Config::from_toml(&text).unwrap();
    assert_eq!(cfg.auth_db_path, "postgres://app:secret@db/survey");
}
