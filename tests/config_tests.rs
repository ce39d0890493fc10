//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Test fixture for configuration testing
struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self { _temp_dir: temp_dir, config_path }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

fn aiclone_cmd() -> Command {
    let mut cmd = Command::cargo_bin("aiclone").unwrap();
    cmd.env_remove("AICLONE_CONFIG")
        .env_remove("AICLONE_BACKEND_URL")
        .env_remove("AICLONE_REQUEST_TIMEOUT_SECS")
        .env_remove("AICLONE_LOG_LEVEL")
        .env_remove("AICLONE_LOG_FILE")
        .env_remove("AICLONE_LOG_JSON");
    cmd
}

fn validate(fixture: &ConfigFixture) -> assert_cmd::assert::Assert {
    aiclone_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_minimal_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
url = "https://clone.example.com"
"#);

    validate(&fixture).success();
}

#[test]
fn test_empty_config_uses_defaults() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");

    aiclone_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8001"))
        .stdout(predicate::str::contains("level = \"warn\""))
        .stdout(predicate::str::contains("recent_conversations = 4"));
}

#[test]
fn test_full_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
url = "https://clone.example.com/base"
request_timeout_secs = 20

[logging]
level = "debug"
file = "/tmp/aiclone.log"
max_files = 3
json_format = true

[display]
recent_conversations = 6
interest_preview = 5
preview_chars = 120
"#);

    validate(&fixture).success();
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_service_scheme() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
url = "ws://clone.example.com"
"#);

    validate(&fixture)
        .code(10)
        .stderr(predicate::str::contains("E102"));
}

#[test]
fn test_unparseable_service_url() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
url = "not a url"
"#);

    validate(&fixture).failure();
}

#[test]
fn test_zero_timeout() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
request_timeout_secs = 0
"#);

    validate(&fixture)
        .failure()
        .stderr(predicate::str::contains("request_timeout_secs"));
}

#[test]
fn test_invalid_log_level() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[logging]
level = "invalid_level"
"#);

    validate(&fixture).failure();
}

#[test]
fn test_zero_preview_chars() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[display]
preview_chars = 0
"#);

    validate(&fixture).failure();
}

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service
url = "https://clone.example.com"
"#);

    validate(&fixture)
        .code(10)
        .stderr(predicate::str::contains("E101"));
}

// ─────────────────────────────────────────────────────────────────
// Config Show Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_custom() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
url = "https://custom.example.com"
request_timeout_secs = 45

[display]
interest_preview = 7
"#);

    aiclone_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("https://custom.example.com"))
        .stdout(predicate::str::contains("request_timeout_secs = 45"))
        .stdout(predicate::str::contains("interest_preview = 7"));
}

#[test]
fn test_config_from_env_path() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
url = "https://from-env-path.example.com"
"#);

    aiclone_cmd()
        .arg("config")
        .arg("show")
        .env("AICLONE_CONFIG", fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("https://from-env-path.example.com"));
}

// ─────────────────────────────────────────────────────────────────
// Config Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_creates_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("aiclone.toml");

    aiclone_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    assert!(config_path.exists());
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("AICLONE_BACKEND_URL"));

    aiclone_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .assert()
        .success();
}

#[test]
fn test_config_init_refuses_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[service]\n");

    aiclone_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_init_ignores_broken_config() {
    let broken = ConfigFixture::new();
    broken.write_config("[service\n");
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("fresh.toml");

    aiclone_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(target.to_str().unwrap())
        .env("AICLONE_CONFIG", broken.path())
        .assert()
        .success();

    assert!(target.exists());
}

#[test]
fn test_config_init_force_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[service]\nurl = \"https://old.example.com\"\n");

    aiclone_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(fixture.path())
        .arg("--force")
        .assert()
        .success();

    let content = fs::read_to_string(fixture.path()).unwrap();
    assert!(!content.contains("old.example.com"));
    assert!(content.contains("http://localhost:8001"));
}

// ─────────────────────────────────────────────────────────────────
// Override Precedence Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[service]
url = "https://file.example.com"
"#);

    aiclone_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .env("AICLONE_BACKEND_URL", "https://env.example.com")
        .env("AICLONE_REQUEST_TIMEOUT_SECS", "12")
        .env("AICLONE_LOG_LEVEL", "debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://env.example.com"))
        .stdout(predicate::str::contains("https://file.example.com").not())
        .stdout(predicate::str::contains("request_timeout_secs = 12"))
        .stdout(predicate::str::contains("level = \"debug\""));
}

#[test]
fn test_url_flag_overrides_env() {
    aiclone_cmd()
        .arg("config")
        .arg("show")
        .arg("--url")
        .arg("https://flag.example.com")
        .env("AICLONE_BACKEND_URL", "https://env.example.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://flag.example.com"))
        .stdout(predicate::str::contains("https://env.example.com").not());
}

#[test]
fn test_invalid_env_url_fails_validation() {
    aiclone_cmd()
        .arg("config")
        .arg("validate")
        .env("AICLONE_BACKEND_URL", "localhost:8001")
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────
// Path Expansion Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_tilde_expansion() {
    let fixture = ConfigFixture::new();
    fixture.write_config(r#"
[logging]
file = "~/aiclone/logs/aiclone.log"
"#);

    let output = aiclone_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("aiclone/logs/aiclone.log"));
    assert!(!stdout.contains("file = \"~"));
}
