//! Tests for the file-backed session store.

use parlor_client::FileStore;
use widget::SessionStore;

#[test]
fn missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.toml"));
    assert!(store.get("parlor-chat-id").unwrap().is_none());
}

#[test]
fn set_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.toml");

    let mut store = FileStore::new(&path);
    store.set("parlor-chat-id", "abc123").unwrap();
    store.set("other", "value").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(
        reopened.get("parlor-chat-id").unwrap().as_deref(),
        Some("abc123")
    );
    assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();
    assert!(FileStore::new(&path).get("parlor-chat-id").is_err());
}
