//! Unit tests for handler configuration loading.

use std::collections::HashMap;
use std::path::PathBuf;

use rstest::{fixture, rstest};

use crate::{
    ConfigError, DEFAULT_ID_KEY, HandlerConfig, LogFormat, default_log_filter, default_state_dir,
};

#[fixture]
fn env() -> HashMap<String, String> {
    HashMap::new()
}

fn with(mut env: HashMap<String, String>, pairs: &[(&str, &str)]) -> HashMap<String, String> {
    for (key, value) in pairs {
        env.insert((*key).to_owned(), (*value).to_owned());
    }
    env
}

#[rstest]
fn empty_environment_yields_defaults(env: HashMap<String, String>) {
    let config = HandlerConfig::from_env(&env).expect("defaults should load");

    assert_eq!(config.id_key(), DEFAULT_ID_KEY);
    assert_eq!(config.identifier(), None);
    assert_eq!(config.script(), "");
    assert_eq!(config.state_dir(), default_state_dir().as_path());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), LogFormat::Compact);
    assert_eq!(config, HandlerConfig::default());
}

#[rstest]
fn identifier_is_read_from_default_key(env: HashMap<String, String>) {
    let env = with(env, &[("filename", "/tmp/state-1.json")]);
    let config = HandlerConfig::from_env(&env).expect("config should load");

    assert_eq!(config.identifier(), Some("/tmp/state-1.json"));
}

#[rstest]
fn id_key_redirects_identifier_lookup(env: HashMap<String, String>) {
    let env = with(
        env,
        &[
            ("id_key", "id"),
            ("id", "/tmp/state-2.json"),
            ("filename", "/tmp/ignored.json"),
        ],
    );
    let config = HandlerConfig::from_env(&env).expect("config should load");

    assert_eq!(config.id_key(), "id");
    assert_eq!(config.identifier(), Some("/tmp/state-2.json"));
}

#[rstest]
fn empty_identifier_is_treated_as_absent(env: HashMap<String, String>) {
    let env = with(env, &[("filename", "")]);
    let config = HandlerConfig::from_env(&env).expect("config should load");

    assert_eq!(config.identifier(), None);
}

#[rstest]
fn blank_id_key_is_rejected(env: HashMap<String, String>) {
    let env = with(env, &[("id_key", "  ")]);
    let error = HandlerConfig::from_env(&env).expect_err("blank id_key should fail");

    assert!(matches!(error, ConfigError::BlankIdKey));
}

#[rstest]
fn script_and_state_dir_are_captured(env: HashMap<String, String>) {
    let env = with(
        env,
        &[("script", "hello.py"), ("FILESTATE_STATE_DIR", "/var/lib/state")],
    );
    let config = HandlerConfig::from_env(&env).expect("config should load");

    assert_eq!(config.script(), "hello.py");
    assert_eq!(config.state_dir(), PathBuf::from("/var/lib/state").as_path());
}

#[rstest]
#[case::json("json", LogFormat::Json)]
#[case::upper_case("JSON", LogFormat::Json)]
#[case::compact(" compact ", LogFormat::Compact)]
fn log_format_parses_case_insensitively(
    env: HashMap<String, String>,
    #[case] raw: &str,
    #[case] expected: LogFormat,
) {
    let env = with(env, &[("FILESTATE_LOG_FORMAT", raw)]);
    let config = HandlerConfig::from_env(&env).expect("config should load");

    assert_eq!(config.log_format(), expected);
}

#[rstest]
fn unknown_log_format_is_rejected(env: HashMap<String, String>) {
    let env = with(env, &[("FILESTATE_LOG_FORMAT", "yaml")]);
    let error = HandlerConfig::from_env(&env).expect_err("unknown format should fail");

    match error {
        ConfigError::LogFormat { raw, .. } => assert_eq!(raw, "yaml"),
        other => panic!("expected log format error, got {other:?}"),
    }
}

#[rstest]
fn log_filter_override_is_applied(env: HashMap<String, String>) {
    let env = with(env, &[("FILESTATE_LOG_FILTER", "filestate=debug")]);
    let config = HandlerConfig::from_env(&env).expect("config should load");

    assert_eq!(config.log_filter(), "filestate=debug");
}

#[test]
fn builders_replace_fields() {
    let config = HandlerConfig::default()
        .with_identifier("abc")
        .with_script("seed")
        .with_state_dir("/srv/state");

    assert_eq!(config.identifier(), Some("abc"));
    assert_eq!(config.script(), "seed");
    assert_eq!(config.state_dir(), PathBuf::from("/srv/state").as_path());
    assert_eq!(HandlerConfig::default().with_identifier("").identifier(), None);
}
