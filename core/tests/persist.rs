use serde::{Deserialize, Serialize};
use st_core::{load_json, save_json, try_load_json, FileStore, KeyValueStore, MemoryStore, PersistError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sample {
    name: String,
    count: u32,
}

#[test]
fn memory_store_round_trip() {
    let mut store = MemoryStore::new();
    let value = Sample { name: "a".into(), count: 3 };
    save_json(&mut store, "k", &value);
    assert_eq!(load_json::<Sample>(&store, "k"), Some(value));
    assert_eq!(load_json::<Sample>(&store, "missing"), None);
}

#[test]
fn malformed_json_reads_as_absent() {
    let mut store = MemoryStore::new();
    store.set("k", "[1, 2").unwrap();
    assert_eq!(load_json::<Sample>(&store, "k"), None);
    assert!(matches!(try_load_json::<Sample>(&store, "k"), Err(PersistError::Json(_))));
}

#[test]
fn file_store_writes_one_file_per_key() {
    let mut dir = std::env::temp_dir();
    dir.push(format!("st_core_store_{}", uuid::Uuid::new_v4()));
    let mut store = FileStore::new(&dir);
    assert_eq!(store.get("header state").unwrap(), None);

    let value = Sample { name: "file".into(), count: 9 };
    save_json(&mut store, "header state", &value);
    assert!(dir.join("header_state.json").exists());
    assert_eq!(load_json::<Sample>(&store, "header state"), Some(value));
    let _ = std::fs::remove_dir_all(&dir);
}
