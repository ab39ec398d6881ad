//! Integration tests for snapshot and config loaders

use std::fs;

use record_content::{
    Account, AccountId, CharacterId, CharacterStats, ConfigLoader, SnapshotFile, SnapshotLoader,
    StatKind,
};
use record_core::{RecordDelta, StateNode, SyncConfig, SyncRecord, UnknownFieldPolicy};
use tempfile::TempDir;

fn characters() -> Vec<CharacterStats> {
    (1..=3)
        .map(|n| {
            let mut character = CharacterStats {
                id: CharacterId(n),
                account: AccountId(1),
                level: n as u16 * 10,
                run_speed: 1.0,
                ..CharacterStats::default()
            };
            character.set_stat(StatKind::MaxHp, 40 + n);
            character
        })
        .collect()
}

#[test]
fn ron_snapshot_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("characters.ron");

    SnapshotLoader::save(&path, &characters()).unwrap();
    let loaded: Vec<CharacterStats> = SnapshotLoader::load(&path).unwrap();

    assert_eq!(loaded, characters());
}

#[test]
fn snapshot_of_another_record_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("accounts.ron");
    SnapshotLoader::save(&path, &[Account::new(AccountId(1), "ada")]).unwrap();

    let err = SnapshotLoader::load::<CharacterStats>(&path).unwrap_err();
    assert!(err.to_string().contains("expected `character_stats`"), "{err}");
}

#[test]
fn hand_written_snapshot_tolerates_schema_drift() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.ron");
    fs::write(
        &path,
        r#"(
            record: "character_stats",
            entries: [
                (
                    values: [
                        ("CharacterId", Int32(5)),
                        ("Level", Int32(12)),
                        ("Nickname", String("old column")),
                    ],
                    blocks: [
                        ("Stats", [
                            (values: [("key", String("Str")), ("value", Int32(8))], blocks: []),
                        ]),
                    ],
                ),
            ],
        )"#,
    )
    .unwrap();

    let config = SyncConfig::with_unknown_fields(UnknownFieldPolicy::Warn);
    let loaded: Vec<CharacterStats> = SnapshotLoader::load_with(&path, &config).unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, CharacterId(5));
    assert_eq!(loaded[0].level, 12);
    assert_eq!(loaded[0].stat(StatKind::Str), 8);
    assert_eq!(loaded[0].free_points, None);
}

#[test]
fn corrupt_entry_reports_its_position() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.ron");
    fs::write(
        &path,
        r#"(record: "character_stats", entries: [
            (values: [], blocks: []),
            (values: [("Level", String("ten"))], blocks: []),
        ])"#,
    )
    .unwrap();

    let err = SnapshotLoader::load::<CharacterStats>(&path).unwrap_err();
    assert!(err.to_string().contains("entry 1"), "{err}");
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = SnapshotLoader::load_file(&dir.path().join("absent.ron")).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}

#[test]
fn toml_config_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sync.toml");
    fs::write(&path, "unknown_fields = \"warn\"\n").unwrap();

    let config = ConfigLoader::load(&path).unwrap();
    assert_eq!(config.unknown_fields, UnknownFieldPolicy::Warn);

    assert_eq!(ConfigLoader::parse("").unwrap(), SyncConfig::default());
    assert!(ConfigLoader::parse("unknown_fields = \"loud\"").is_err());
}

#[test]
fn state_nodes_persist_through_bincode_and_json() {
    let node = characters()[1].snapshot();

    let bytes = bincode::serialize(&node).unwrap();
    let decoded: StateNode = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, node);

    let json = serde_json::to_string(&node).unwrap();
    let decoded: StateNode = serde_json::from_str(&json).unwrap();
    let mut restored = CharacterStats::default();
    restored.read_state(&decoded).unwrap();
    assert_eq!(restored, characters()[1]);
}

#[test]
fn deltas_serialize_for_transport() {
    let before = characters()[0].clone();
    let mut after = before.clone();
    after.experience = 900;

    let delta = RecordDelta::between(&before, &after);
    let json = serde_json::to_string(&delta).unwrap();
    let received: RecordDelta = serde_json::from_str(&json).unwrap();

    let mut remote = before.clone();
    received.apply(&mut remote).unwrap();
    assert_eq!(remote, after);

    let file = SnapshotFile::capture(&[after.clone()]);
    assert_eq!(file.restore::<CharacterStats>(&SyncConfig::default()).unwrap(), vec![after]);
}
