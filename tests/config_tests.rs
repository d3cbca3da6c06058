// Config loading, validation and command-line override tests

use std::time::Duration;

use tr300::config::{DEFAULT_SUBTITLE, DEFAULT_TITLE, FileConfig, OutputMode, ReportConfig};
use tr300::platform::Platform;
use tr300::policy::FieldKey;

const VALID_CONFIG: &str = r#"
[report]
title = "HOMELAB"
subtitle = "RACK 2"
color = false
ascii = true
fast = true

[collection]
command_timeout_ms = 500
cpu_sample_ms = 100
"#;

#[test]
fn test_config_loads_from_str() {
    let config = FileConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.report.title, "HOMELAB");
    assert_eq!(config.report.subtitle, "RACK 2");
    assert!(!config.report.color);
    assert!(config.report.ascii);
    assert!(config.report.fast);
    assert_eq!(config.collection.command_timeout_ms, 500);
    assert_eq!(config.collection.cpu_sample_ms, 100);
}

#[test]
fn test_config_empty_uses_defaults() {
    let config = FileConfig::load_from_str("").expect("empty config");
    assert_eq!(config.report.title, DEFAULT_TITLE);
    assert_eq!(config.report.subtitle, DEFAULT_SUBTITLE);
    assert!(config.report.color);
    assert_eq!(config.collection.command_timeout_ms, 2000);
    assert_eq!(config.collection.cpu_sample_ms, 200);
}

#[test]
fn test_config_validation_rejects_zero_timeout() {
    let bad = VALID_CONFIG.replace("command_timeout_ms = 500", "command_timeout_ms = 0");
    let err = FileConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("command_timeout_ms"));
}

#[test]
fn test_config_validation_rejects_long_sample() {
    let bad = VALID_CONFIG.replace("cpu_sample_ms = 100", "cpu_sample_ms = 60000");
    let err = FileConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("cpu_sample_ms"));
}

#[test]
fn test_config_validation_rejects_blank_title() {
    let bad = VALID_CONFIG.replace("title = \"HOMELAB\"", "title = \"  \"");
    let err = FileConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("report.title"));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let bad = format!("{VALID_CONFIG}\n[server]\nport = 8080\n");
    assert!(FileConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = FileConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tr300.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("TR300_CONFIG", path.to_str().unwrap()) };
    let result = FileConfig::load();
    unsafe { std::env::set_var("TR300_CONFIG", dir.path().join("missing.toml")) };
    let missing = FileConfig::load();
    unsafe { std::env::remove_var("TR300_CONFIG") };

    let config = result.expect("load from TR300_CONFIG");
    assert_eq!(config.report.title, "HOMELAB");
    let err = missing.unwrap_err();
    assert!(format!("{err:#}").contains("missing.toml"));
}

#[test]
fn test_report_config_from_file_and_overrides() {
    let file = FileConfig::load_from_str(VALID_CONFIG).expect("valid");
    let config = ReportConfig::from_file(&file);
    assert_eq!(config.mode, OutputMode::Ascii);
    assert_eq!(config.command_timeout, Duration::from_millis(500));
    assert_eq!(config.cpu_sample_interval, Duration::from_millis(100));

    let config = config
        .with_mode(OutputMode::Json)
        .with_title(Some("   ".to_string()))
        .with_color(true);
    assert_eq!(config.mode, OutputMode::Json);
    assert_eq!(config.title, "HOMELAB");
    assert!(config.use_color);

    let config = config.with_title(Some("LAB".to_string()));
    assert_eq!(config.title, "LAB");
}

#[test]
fn test_report_config_builds_fast_plan() {
    let config = ReportConfig::default().with_fast(true);
    let plan = config.collect_plan(Platform::Windows);
    assert!(plan.policy.is_enabled());
    assert!(plan.policy.skips_field(FieldKey::Gpus));
    assert_eq!(plan.cpu_sample_interval, Duration::from_millis(200));

    let plan = ReportConfig::default().collect_plan(Platform::Windows);
    assert!(!plan.policy.skips_field(FieldKey::Gpus));
}
