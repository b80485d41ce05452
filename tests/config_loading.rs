// Scene configuration from presets and JSON files

use std::fs;

use vmscene::errors::SceneError;
use vmscene::registry::RegistrySchema;
use vmscene::scene::config::{SceneConfig, SceneName, TerminationMode};
use vmscene::scene::constants::SNAPSHOT_LIMIT;
use vmscene::scene::Scene;

#[test]
fn test_presets_round_trip_through_json() {
    for name in SceneName::ALL {
        let preset = SceneConfig::preset(name);
        let json = serde_json::to_string(&preset).unwrap();
        assert_eq!(SceneConfig::from_json(&json).unwrap(), preset, "{}", name);
    }
}

#[test]
fn test_custom_scene_from_file() {
    let path = std::env::temp_dir().join(format!("vmscene-config-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{
            "title": "late-block",
            "registry_schema": "vad",
            "termination": "terminate-process",
            "heap": { "used_bytes": ["4096", "4096", "4096", "16", "0", "8"] },
            "search": { "expected_outcome_by_index": { "4": "accepted" } },
            "written_value": "7"
        }"#,
    )
    .unwrap();

    let config = SceneConfig::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(config.registry_schema, RegistrySchema::Vad);
    assert_eq!(config.termination, TerminationMode::TerminateProcess);
    assert_eq!(config.heap.len(), 6);
    assert_eq!(config.heap.base, 0x55a1_1000);

    let scene = Scene::build(config).unwrap();
    assert_eq!(scene.search.accepted, 4);
    assert_eq!(scene.search.rejected(), vec![0, 1, 2, 3]);

    let mut player = scene.player(SNAPSHOT_LIMIT).unwrap();
    player.jump_to_end().unwrap();
    assert_eq!(player.state().clock_ticks, 5);
    assert!(player.state().registry().is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("vmscene-does-not-exist.json");
    assert!(matches!(SceneConfig::load(&path), Err(SceneError::Io(_))));
}

#[test]
fn test_unknown_enum_value_is_config_error() {
    assert!(matches!(
        SceneConfig::from_json(r#"{ "termination": "reboot" }"#),
        Err(SceneError::Config(_))
    ));
}

#[test]
fn test_heap_past_the_address_space_is_rejected() {
    let config =
        SceneConfig::from_json(r#"{ "heap": { "base": 18446744073709547520 } }"#).unwrap();
    assert!(matches!(
        Scene::build(config),
        Err(SceneError::InvalidHeap {
            base: 0xffff_ffff_ffff_f000,
            page_size: 0x1000,
            len: 5
        })
    ));

    let zero_pages = SceneConfig::from_json(r#"{ "heap": { "page_size": 0 } }"#).unwrap();
    assert!(matches!(
        Scene::build(zero_pages),
        Err(SceneError::InvalidHeap { page_size: 0, .. })
    ));
}

#[test]
fn test_too_few_code_lines_is_rejected() {
    let config = SceneConfig {
        code_lines: vec!["int main() {".to_string(), "}".to_string()],
        ..SceneConfig::default()
    };
    assert!(matches!(
        Scene::build(config),
        Err(SceneError::UnknownElement(_))
    ));
}
