//! Tests for session storage.

use tempfile::tempdir;

use crate::paths::QuillPaths;
use crate::sessions::{SessionStorage, StoredMessage, StoredSession};

fn storage_in(dir: &tempfile::TempDir) -> SessionStorage {
    let paths = QuillPaths::from_root(dir.path().to_path_buf());
    let storage = SessionStorage::with_paths(paths);
    storage.init().unwrap();
    storage
}

#[test]
fn test_session_crud() {
    let dir = tempdir().unwrap();
    let storage = storage_in(&dir);

    let mut session = StoredSession::new("test-model");
    session.push_message(StoredMessage::user("hello"));
    session.push_message(StoredMessage::assistant("hi there"));
    let id = session.id.clone();
    storage.save_session(&session).unwrap();

    let retrieved = storage.get_session(&id).unwrap();
    assert_eq!(retrieved.id, id);
    assert_eq!(retrieved.model, "test-model");
    assert_eq!(retrieved.messages.len(), 2);
    assert_eq!(retrieved.messages[0].role, "user");
    assert_eq!(retrieved.messages[1].role, "assistant");

    let sessions = storage.list_sessions().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].message_count, 2);

    storage.delete_session(&id).unwrap();
    assert!(storage.list_sessions().unwrap().is_empty());
}

#[test]
fn test_get_missing_session() {
    let dir = tempdir().unwrap();
    let storage = storage_in(&dir);

    let err = storage.get_session("does-not-exist").unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn test_list_skips_corrupt_files() {
    let dir = tempdir().unwrap();
    let storage = storage_in(&dir);

    storage.save_session(&StoredSession::new("test-model")).unwrap();
    std::fs::write(storage.paths().session_path("broken"), "not json").unwrap();

    let sessions = storage.list_sessions().unwrap();
    assert_eq!(sessions.len(), 1);
}

#[test]
fn test_list_orders_newest_first() {
    let dir = tempdir().unwrap();
    let storage = storage_in(&dir);

    let mut older = StoredSession::new("test-model");
    older.updated_at -= 100;
    let mut newer = StoredSession::new("test-model");
    newer.updated_at += 100;

    storage.save_session(&older).unwrap();
    storage.save_session(&newer).unwrap();

    let sessions = storage.list_sessions().unwrap();
    assert_eq!(sessions[0].id, newer.id);
    assert_eq!(sessions[1].id, older.id);
}

#[test]
fn test_clear_sessions() {
    let dir = tempdir().unwrap();
    let storage = storage_in(&dir);

    storage.save_session(&StoredSession::new("a")).unwrap();
    storage.save_session(&StoredSession::new("b")).unwrap();

    assert_eq!(storage.clear_sessions().unwrap(), 2);
    assert!(storage.list_sessions().unwrap().is_empty());
}

#[test]
fn test_history_limit() {
    let dir = tempdir().unwrap();
    let storage = storage_in(&dir);

    for offset in 0..5 {
        let mut session = StoredSession::new("test-model");
        session.updated_at += offset;
        storage.save_session(&session).unwrap();
    }

    storage.enforce_history_limit(3).unwrap();
    assert_eq!(storage.list_sessions().unwrap().len(), 3);
}
