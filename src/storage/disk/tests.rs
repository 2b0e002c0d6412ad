use super::*;
use crate::storage::FoodRecord;
use serde_json::json;
use tempfile::TempDir;

fn create_test_storage() -> (DiskEntryStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = DiskEntryStore::open(dir.path().join("cache")).expect("open store");
    (storage, dir)
}

fn create_test_entry(key: &str) -> CacheEntry {
    CacheEntry::new(
        key,
        FoodRecord::new(
            "Creamy Peanut Butter",
            Some(json!({"fat_100g": 50.0})),
            "0051500255162",
            0.82,
        ),
        0.82,
    )
}

#[test]
fn test_open_creates_directory() {
    let (storage, _dir) = create_test_storage();
    assert!(storage.storage_path().is_dir());
}

#[test]
fn test_open_rejects_file_root() {
    let dir = TempDir::new().expect("temp dir");
    let file_path = dir.path().join("not-a-dir");
    std::fs::write(&file_path, b"x").expect("write");

    let result = DiskEntryStore::open(file_path);
    assert!(matches!(result, Err(StorageError::Unavailable { .. })));
}

#[test]
fn test_persist_and_read() {
    let (storage, _dir) = create_test_storage();
    let entry = create_test_entry("peanut butter");

    let handle = storage.persist(&entry).expect("persist");
    assert!(storage.entry_path("peanut butter").exists());

    let loaded = storage.read(&handle).expect("read");
    assert_eq!(loaded, entry);
}

#[test]
fn test_persist_overwrites_same_key() {
    let (storage, _dir) = create_test_storage();

    storage
        .persist(&create_test_entry("milk"))
        .expect("first persist");

    let replacement = CacheEntry::new("milk", FoodRecord::new("Whole Milk", None, "7", 0.9), 0.9);
    let handle = storage.persist(&replacement).expect("second persist");

    assert_eq!(storage.read(&handle).expect("read"), replacement);
    assert_eq!(storage.scan().expect("scan").len(), 1);
}

#[test]
fn test_old_handle_survives_overwrite() {
    let (storage, _dir) = create_test_storage();
    let original = create_test_entry("bread");
    let old_handle = storage.persist(&original).expect("persist");

    let replacement = CacheEntry::new("bread", FoodRecord::new("Rye Bread", None, "9", 0.7), 0.7);
    storage.persist(&replacement).expect("overwrite");

    assert_eq!(storage.read(&old_handle).expect("read old"), original);
}

#[test]
fn test_persist_empty_key_rejected() {
    let (storage, _dir) = create_test_storage();
    let entry = create_test_entry("");
    assert!(matches!(storage.persist(&entry), Err(StorageError::EmptyKey)));
}

#[test]
fn test_no_temp_files_left_behind() {
    let (storage, _dir) = create_test_storage();
    storage.persist(&create_test_entry("apple")).expect("persist");

    let leftovers: Vec<_> = std::fs::read_dir(storage.storage_path())
        .expect("read dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().to_string_lossy().ends_with(TEMP_EXTENSION))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_scan_returns_all_entries() {
    let (storage, _dir) = create_test_storage();
    for key in ["apple", "banana", "cherry"] {
        storage.persist(&create_test_entry(key)).expect("persist");
    }

    let mut keys: Vec<String> = storage
        .scan()
        .expect("scan")
        .into_iter()
        .map(|(entry, _)| entry.query_key)
        .collect();
    keys.sort();

    assert_eq!(keys, vec!["apple", "banana", "cherry"]);
}

#[test]
fn test_scan_skips_corrupt_files() {
    let (storage, _dir) = create_test_storage();
    storage.persist(&create_test_entry("apple")).expect("persist");

    std::fs::write(
        storage.storage_path().join("deadbeef.rkyv"),
        b"definitely not an archive",
    )
    .expect("write garbage");
    std::fs::write(storage.storage_path().join("notes.txt"), b"ignored").expect("write");

    let entries = storage.scan().expect("scan");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0.query_key, "apple");
}

#[test]
fn test_read_corrupt_handle_is_storage_error() {
    let (storage, _dir) = create_test_storage();
    let path = storage.storage_path().join("corrupt.rkyv");
    std::fs::write(&path, b"garbage bytes that do not decode").expect("write");

    let handle = MmapFileHandle::open(&path).expect("open");
    let result = storage.read(&handle);
    assert!(matches!(result, Err(StorageError::Corrupt { .. })));
}

#[test]
fn test_purge_removes_entries() {
    let (storage, _dir) = create_test_storage();
    storage.persist(&create_test_entry("apple")).expect("persist");
    storage.persist(&create_test_entry("pear")).expect("persist");

    storage.purge().expect("purge");

    assert!(storage.scan().expect("scan").is_empty());
    assert!(!storage.entry_path("apple").exists());
}

#[test]
fn test_entries_survive_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("cache");

    {
        let storage = DiskEntryStore::open(path.clone()).expect("open");
        storage.persist(&create_test_entry("oat milk")).expect("persist");
    }

    let reopened = DiskEntryStore::open(path).expect("reopen");
    let entries = reopened.scan().expect("scan");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, create_test_entry_with_time("oat milk", entries[0].0.created_at));
}

fn create_test_entry_with_time(key: &str, created_at: i64) -> CacheEntry {
    CacheEntry {
        created_at,
        ..create_test_entry(key)
    }
}

#[test]
fn test_scan_returns_persisted_seq() {
    let (storage, _dir) = create_test_storage();
    let mut entry = create_test_entry("rye bread");
    entry.seq = 41;
    storage.persist(&entry).expect("persist");

    let entries = storage.scan().expect("scan");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0.seq, 41);
}
