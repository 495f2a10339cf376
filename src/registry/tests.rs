use super::*;
use crate::config::StoreConfig;
use crate::db::open_in_memory_connection;
use crate::storage::{SqliteStore, StoreError};
use std::sync::Mutex;

fn setup_store(max_value_len: usize) -> Arc<SqliteStore> {
    let conn = Arc::new(Mutex::new(open_in_memory_connection().unwrap()));
    let config = StoreConfig {
        max_value_len,
        ..StoreConfig::with_path(":memory:")
    };
    Arc::new(SqliteStore::from_connection(conn, &config))
}

fn stored_int(store: &SqliteStore, key: &str) -> i32 {
    let bytes = store.get(key, 4).unwrap();
    i32::from_le_bytes(bytes.try_into().unwrap())
}

#[test]
fn test_register_keeps_order_and_rejects_duplicates() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store);

    registry.declare("wifi_ssid", String::new()).unwrap();
    registry.declare("retry_count", 3i32).unwrap();
    registry.declare_transient("verbose", false).unwrap();

    let err = registry.declare("retry_count", 9i32).unwrap_err();
    assert_eq!(
        err,
        ParamError::Duplicate {
            name: "retry_count".to_string()
        }
    );

    let names: Vec<String> = registry.list_all().into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["wifi_ssid", "retry_count", "verbose"]);
}

#[test]
fn test_list_all_tags_persisted() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store);
    registry.declare("retry_count", 3i32).unwrap();
    registry.declare_transient("verbose", true).unwrap();

    let listing = registry.list_all();
    assert_eq!(
        listing[0],
        ParamListing {
            name: "retry_count".to_string(),
            kind: ParamKind::Int,
            persisted: true,
            value: "3".to_string(),
        }
    );
    assert!(!listing[1].persisted);
    assert_eq!(listing[1].value, "true");
}

#[test]
fn test_set_param_unknown_name() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store);
    let retry = registry.declare("retry_count", 3i32).unwrap();

    let err = registry.set_param("no_such_param", "x").unwrap_err();
    assert!(matches!(err, ParamError::NotFound { .. }));
    assert_eq!(retry.get(), 3);
}

#[test]
fn test_set_param_is_case_sensitive() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store);
    registry.declare("retry_count", 3i32).unwrap();

    assert!(registry.set_param("Retry_Count", "4").unwrap_err().is_not_found());
    registry.set_param("retry_count", "4").unwrap();
    assert_eq!(registry.typed::<i32>("retry_count").unwrap().get(), 4);
}

#[test]
fn test_save_all_is_fail_fast() {
    let store = setup_store(8);
    let mut registry = ParamRegistry::new(store.clone());
    let first = registry.declare("first", 0i32).unwrap();
    let second = registry.declare("second", String::new()).unwrap();
    let third = registry.declare("third", 0i32).unwrap();

    first.set(4).unwrap();
    third.set(7).unwrap();
    // 让存储与内存不一致
    store.put("first", &0i32.to_le_bytes()).unwrap();
    store.put("third", &1i32.to_le_bytes()).unwrap();

    // 超出值长度上限：内存已更新，写入失败
    let err = second.set("value over limit".to_string()).unwrap_err();
    assert!(matches!(err, ParamError::Store(StoreError::ValueTooLong { .. })));

    let err = registry.save_all().unwrap_err();
    assert!(matches!(err, ParamError::Store(StoreError::ValueTooLong { .. })));

    assert_eq!(stored_int(&store, "first"), 4);
    assert_eq!(stored_int(&store, "third"), 1);
    assert_eq!(third.get(), 7);
}

#[test]
fn test_save_all_skips_transient() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store.clone());
    let retry = registry.declare("retry_count", 3i32).unwrap();
    registry.declare_transient("verbose", true).unwrap();

    registry.save_all().unwrap();
    assert_eq!(stored_int(&store, "retry_count"), retry.get());
    assert!(!store.contains("verbose").unwrap());
}

#[test]
fn test_read_all_reloads_stored_values() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store.clone());
    let retry = registry.declare("retry_count", 3i32).unwrap();
    let flag = registry.declare("flag", false).unwrap();
    registry.declare_transient("verbose", false).unwrap();

    store.put("retry_count", &11i32.to_le_bytes()).unwrap();
    store.put("flag", &[1]).unwrap();
    registry.read_all().unwrap();

    assert_eq!(retry.get(), 11);
    assert!(flag.get());
}

#[test]
fn test_read_all_stops_at_missing_entry() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store.clone());
    let first = registry.declare("first", 0i32).unwrap();
    registry.declare("second", 0i32).unwrap();
    let third = registry.declare("third", 0i32).unwrap();

    store.put("first", &1i32.to_le_bytes()).unwrap();
    store.put("third", &3i32.to_le_bytes()).unwrap();

    let err = registry.read_all().unwrap_err();
    assert_eq!(
        err,
        ParamError::Store(StoreError::NotFound {
            namespace: "storage".to_string(),
            key: "second".to_string(),
        })
    );
    assert_eq!(first.get(), 1);
    assert_eq!(third.get(), 0);
}

#[test]
fn test_read_all_stops_at_corrupt_entry() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store.clone());
    let first = registry.declare("first", 0i32).unwrap();
    registry.declare("second", 0i32).unwrap();
    let third = registry.declare("third", 0i32).unwrap();

    store.put("first", &1i32.to_le_bytes()).unwrap();
    store.put("second", &[9, 9]).unwrap();
    store.put("third", &3i32.to_le_bytes()).unwrap();

    let err = registry.read_all().unwrap_err();
    assert!(matches!(err, ParamError::Decode { .. }));
    assert_eq!(first.get(), 1);
    assert_eq!(third.get(), 0);
}

#[test]
fn test_reset_default_all() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store.clone());
    let retry = registry.declare("retry_count", 3i32).unwrap();
    let verbose = registry.declare_transient("verbose", false).unwrap();
    let ssid = registry.declare("wifi_ssid", "default".to_string()).unwrap();

    retry.set(8).unwrap();
    let _ = verbose.set(true);
    ssid.set("changed".to_string()).unwrap();

    registry.reset_default_all().unwrap();

    assert_eq!(retry.get(), 3);
    assert!(!verbose.get());
    assert_eq!(ssid.get(), "default");
    assert_eq!(stored_int(&store, "retry_count"), 3);
    assert_eq!(store.get("wifi_ssid", 150).unwrap(), b"default".to_vec());
}

#[test]
fn test_reset_default_all_is_fail_fast() {
    let store = setup_store(8);
    let mut registry = ParamRegistry::new(store.clone());
    let first = registry.declare("first", 0i32).unwrap();
    let second = registry
        .declare("second", "default over limit".to_string())
        .unwrap();
    let third = registry.declare("third", 0i32).unwrap();

    first.set(4).unwrap();
    second.set("short".to_string()).unwrap();
    third.set(7).unwrap();

    let err = registry.reset_default_all().unwrap_err();
    assert!(matches!(err, ParamError::Store(StoreError::ValueTooLong { .. })));

    assert_eq!(first.get(), 0);
    assert_eq!(stored_int(&store, "first"), 0);
    assert_eq!(store.get("second", 150).unwrap(), b"short".to_vec());
    assert_eq!(third.get(), 7);
    assert_eq!(stored_int(&store, "third"), 7);
}

#[test]
fn test_reset_param_by_name() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store);
    let retry = registry.declare("retry_count", 3i32).unwrap();
    retry.set(8).unwrap();

    registry.reset_param("retry_count").unwrap();
    assert_eq!(retry.get(), 3);
    assert!(registry.reset_param("missing").unwrap_err().is_not_found());
}

#[test]
fn test_erase_all_clears_store_not_memory() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store.clone());
    let retry = registry.declare("retry_count", 3i32).unwrap();
    retry.set(5).unwrap();

    registry.erase_all().unwrap();

    assert!(store.keys().unwrap().is_empty());
    assert_eq!(retry.get(), 5);
}

#[test]
fn test_restore_snapshot_is_fail_fast() {
    let store = setup_store(8);
    let mut registry = ParamRegistry::new(store.clone());
    let first = registry.declare("first", 0i32).unwrap();
    registry.declare("second", String::new()).unwrap();
    let third = registry.declare("third", 0i32).unwrap();
    third.set(7).unwrap();

    let snapshot = ParamSnapshot {
        entries: vec![
            SnapshotEntry {
                name: "first".to_string(),
                value: "5".to_string(),
            },
            SnapshotEntry {
                name: "second".to_string(),
                value: "value over limit".to_string(),
            },
            SnapshotEntry {
                name: "third".to_string(),
                value: "9".to_string(),
            },
        ],
    };

    let err = registry.restore_snapshot(&snapshot).unwrap_err();
    assert!(matches!(err, ParamError::Store(StoreError::ValueTooLong { .. })));
    assert_eq!(first.get(), 5);
    assert_eq!(stored_int(&store, "first"), 5);
    assert_eq!(third.get(), 7);
    assert_eq!(stored_int(&store, "third"), 7);
}

#[test]
fn test_snapshot_round_trip() {
    let store = setup_store(64);
    let mut registry = ParamRegistry::new(store.clone());
    let retry = registry.declare("retry_count", 3i32).unwrap();
    let ssid = registry.declare("wifi_ssid", String::new()).unwrap();
    retry.set(6).unwrap();
    ssid.set("HomeNet".to_string()).unwrap();

    let json = registry.snapshot().to_json().unwrap();
    registry.reset_default_all().unwrap();

    let mut snapshot = ParamSnapshot::from_json(&json).unwrap();
    snapshot.entries.push(SnapshotEntry {
        name: "unknown".to_string(),
        value: "1".to_string(),
    });

    assert_eq!(registry.restore_snapshot(&snapshot).unwrap(), 2);
    assert_eq!(retry.get(), 6);
    assert_eq!(ssid.get(), "HomeNet");
}
