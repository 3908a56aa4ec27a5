#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use kinlist_core::{
    Decision, FriendshipLedger, HubBuilder, MemoryStore, SocialStore, SqliteStore, UserId,
    identity::Directory,
};
use tempfile::TempDir;

/// A SQLite store in a fresh temporary directory.
pub fn sqlite_store() -> (TempDir, Arc<SqliteStore>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteStore::open(db_path(&temp_dir)).expect("Failed to open store");
    (temp_dir, Arc::new(store))
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

/// Registers `name@example.com` with username `name`.
pub fn register<S: SocialStore + ?Sized>(store: &Arc<S>, name: &str) -> UserId {
    Directory::new(Arc::clone(store))
        .register_user(&format!("{name}@example.com"), Some(name))
        .expect("Failed to register user")
        .id
}

pub fn befriend<S: SocialStore + ?Sized>(store: &Arc<S>, a: UserId, b: UserId) {
    let ledger = FriendshipLedger::new(Arc::clone(store));
    let request = ledger.send_request(a, b).expect("Failed to send request");
    ledger
        .respond_to_request(request.id, b, Decision::Accept)
        .expect("Failed to accept request");
}

/// Helper function to create a test hub
pub async fn create_test_hub() -> (TempDir, kinlist_core::Hub) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let hub = HubBuilder::new()
        .with_database_path(Some(db_path(&temp_dir)))
        .build()
        .await
        .expect("Failed to create hub");
    (temp_dir, hub)
}
