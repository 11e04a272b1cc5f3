//! Configuration loading tests.

use std::collections::HashMap;
use std::net::SocketAddr;

use crate::config::{BOARD_PATH_ENV, ConfigError, LISTEN_ENV, ReallifeConfig};
use crate::kanban::services::OrderKey;
use camino::{Utf8Path, Utf8PathBuf};
use eyre::ensure;
use rstest::rstest;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[rstest]
fn defaults_serve_on_8021_with_weekday_schedule() {
    let config = ReallifeConfig::default();

    assert_eq!(config.listen.port(), 8021);
    assert_eq!(config.policy.add_capacity, 6);
    assert_eq!(config.schedule.days.len(), 5);
    assert_eq!(config.shortcuts.start, "Session计时");
    assert!(config.scheduler_enabled);
}

#[rstest]
fn empty_object_is_the_default_config() -> eyre::Result<()> {
    assert_eq!(ReallifeConfig::from_json("inline", "{}")?, ReallifeConfig::default());
    Ok(())
}

#[rstest]
fn partial_file_overrides_selected_fields() -> eyre::Result<()> {
    let config = ReallifeConfig::from_json(
        "inline",
        r#"{
            "board_path": "/vault/工作看板.md",
            "order_key": "priority",
            "policy": {"add_capacity": 3},
            "prompts": {"session_start": {"title": "Go", "message": "{{ task }}", "accept": "OK"}},
            "canvases": {"clientz": "/vault/clientz.canvas"}
        }"#,
    )?;

    assert_eq!(config.board_path, Utf8PathBuf::from("/vault/工作看板.md"));
    assert_eq!(config.order_key, OrderKey::Priority);
    assert_eq!(config.policy.add_capacity, 3);
    assert_eq!(config.policy.rebuild_capacity, None);
    assert_eq!(config.prompts.session_start.title, "Go");
    assert_eq!(
        config.canvases.get("clientz"),
        Some(&Utf8PathBuf::from("/vault/clientz.canvas"))
    );
    Ok(())
}

#[rstest]
#[case("{\"listen\": 8021}")]
#[case("{\"unknown_field\": true}")]
#[case("not json")]
fn malformed_config_is_rejected(#[case] text: &str) {
    assert!(matches!(
        ReallifeConfig::from_json("inline", text),
        Err(ConfigError::Parse { .. })
    ));
}

#[rstest]
fn environment_overrides_file_values() -> eyre::Result<()> {
    let config = ReallifeConfig::default().apply_env(env(&[
        (BOARD_PATH_ENV, "/tmp/board.md"),
        (LISTEN_ENV, "127.0.0.1:9000"),
    ]))?;

    assert_eq!(config.board_path, Utf8PathBuf::from("/tmp/board.md"));
    assert_eq!(config.listen, SocketAddr::from(([127, 0, 0, 1], 9000)));
    Ok(())
}

#[rstest]
fn invalid_listen_override_is_reported() {
    let result = ReallifeConfig::default().apply_env(env(&[(LISTEN_ENV, "localhost")]));

    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnv { name: LISTEN_ENV, .. })
    ));
}

#[rstest]
fn port_flag_keeps_host() {
    let config = ReallifeConfig::default().with_port(9100);

    assert_eq!(config.listen, SocketAddr::from(([0, 0, 0, 0], 9100)));
}

#[rstest]
fn load_reads_file_from_disk() -> eyre::Result<()> {
    let dir = TempDir::new()?;
    let path = Utf8PathBuf::from_path_buf(dir.path().join("reallife.json"))
        .map_err(|path| eyre::eyre!("non UTF-8 path {}", path.display()))?;
    std::fs::write(&path, r#"{"scheduler_enabled": false}"#)?;

    let config = ReallifeConfig::load(Some(&path))?;

    ensure!(!config.scheduler_enabled, "file value not applied");
    Ok(())
}

#[rstest]
fn load_without_path_uses_defaults() -> eyre::Result<()> {
    assert_eq!(ReallifeConfig::load(None)?, ReallifeConfig::default());
    Ok(())
}

#[rstest]
fn missing_file_is_a_read_error() {
    let result = ReallifeConfig::load(Some(Utf8Path::new("/definitely/not/here.json")));

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
