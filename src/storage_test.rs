use super::*;

// =============================================================================
// MemoryTokenStore
// =============================================================================

#[test]
fn memory_store_starts_empty() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get(), None);
}

#[test]
fn memory_store_set_then_get() {
    let store = MemoryTokenStore::new();
    store.set("tok-123");
    assert_eq!(store.get(), Some("tok-123".to_string()));
}

#[test]
fn memory_store_set_replaces() {
    let store = MemoryTokenStore::with_token("old");
    store.set("new");
    assert_eq!(store.get(), Some("new".to_string()));
}

#[test]
fn memory_store_remove_clears() {
    let store = MemoryTokenStore::with_token("tok");
    store.remove();
    assert_eq!(store.get(), None);
}

#[test]
fn memory_store_remove_when_empty_is_noop() {
    let store = MemoryTokenStore::new();
    store.remove();
    assert_eq!(store.get(), None);
}

// =============================================================================
// FileTokenStore
// =============================================================================

#[test]
fn file_store_missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token"));
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_round_trips_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token"));
    store.set("tok-abc");
    assert_eq!(store.get(), Some("tok-abc".to_string()));
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    FileTokenStore::new(&path).set("tok-persisted");

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.get(), Some("tok-persisted".to_string()));
}

#[test]
fn file_store_trims_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "  tok-xyz\n").unwrap();
    assert_eq!(FileTokenStore::new(&path).get(), Some("tok-xyz".to_string()));
}

#[test]
fn file_store_blank_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    std::fs::write(&path, "\n").unwrap();
    assert_eq!(FileTokenStore::new(&path).get(), None);
}

#[test]
fn file_store_remove_deletes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    let store = FileTokenStore::new(&path);
    store.set("tok");
    store.remove();
    assert!(!path.exists());
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_remove_missing_file_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileTokenStore::new(dir.path().join("token"));
    store.remove();
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("slot").join("token");
    let store = FileTokenStore::new(&path);
    store.set("tok-deep");
    assert_eq!(store.get(), Some("tok-deep".to_string()));
}
