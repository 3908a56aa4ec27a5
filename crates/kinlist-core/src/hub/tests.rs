//! Tests for the async facade.

use jiff::civil::date;
use tempfile::TempDir;

use super::*;
use crate::{
    error::ErrorKind,
    models::{Decision, NewTask, TaskFilter, TaskUpdate, User},
    store::MemoryStore,
};

async fn create_test_hub() -> (TempDir, Hub) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("nested").join("test.db");
    let hub = HubBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create hub");
    (temp_dir, hub)
}

async fn friends(hub: &Hub, a: &User, b: &User) {
    let request = hub
        .send_friend_request(a.id, b.id)
        .await
        .expect("Failed to send request");
    hub.respond_to_friend_request(request.id, b.id, Decision::Accept)
        .await
        .expect("Failed to accept request");
}

#[tokio::test]
async fn test_builder_creates_parent_directories() {
    let (temp_dir, hub) = create_test_hub().await;
    assert!(temp_dir.path().join("nested").join("test.db").exists());

    let user = hub
        .register_user("ada@example.com", Some("ada"))
        .await
        .expect("Failed to register");
    assert_eq!(hub.find_user("ada").await.unwrap(), user);
}

#[tokio::test]
async fn test_builder_reports_unusable_parent_as_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").expect("Failed to write file");

    let err = HubBuilder::new()
        .with_database_path(Some(blocker.join("test.db")))
        .build()
        .await
        .err()
        .expect("Building under a file should fail");
    assert!(matches!(err, SocialError::FileSystem { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_delegation_round_trip() {
    let (_temp_dir, hub) = create_test_hub().await;
    let owner = hub.register_user("o@example.com", Some("owner")).await.unwrap();
    let friend = hub.register_user("f@example.com", Some("friend")).await.unwrap();
    friends(&hub, &owner, &friend).await;

    let new_task = NewTask::new("Pick up parcel").unwrap().due(date(2026, 11, 3));
    let err = hub
        .create_task(owner.id, friend.id, &new_task)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    hub.set_create_permission(owner.id, friend.id, true)
        .await
        .unwrap();
    assert!(hub.can_create_tasks(owner.id, friend.id).await.unwrap());

    let task = hub
        .create_task(owner.id, friend.id, &new_task)
        .await
        .expect("Delegated create should succeed");
    assert_eq!(task.assigned_by, Some(friend.id));

    let done = TaskUpdate {
        is_done: Some(true),
        ..TaskUpdate::default()
    };
    let updated = hub.update_task(owner.id, task.id, &done).await.unwrap();
    assert!(updated.is_done);

    let open = TaskFilter {
        done: Some(false),
        ..TaskFilter::default()
    };
    assert!(hub.list_tasks(owner.id, open).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_and_unfriend_cascade() {
    let (_temp_dir, hub) = create_test_hub().await;
    let me = hub.register_user("me@example.com", Some("me")).await.unwrap();
    let pal = hub.register_user("pal@example.com", Some("pal")).await.unwrap();
    friends(&hub, &me, &pal).await;

    hub.create_task(pal.id, pal.id, &NewTask::new("Run 5k").unwrap())
        .await
        .unwrap();
    hub.pin_friend(me.id, pal.id).await.unwrap();

    let dashboard = hub.load_dashboard(me.id).await.unwrap();
    assert_eq!(dashboard.len(), 1);
    assert_eq!(dashboard[0].friend_username.as_deref(), Some("pal"));
    assert_eq!(dashboard[0].tasks.len(), 1);

    let outcome = hub.unfriend(me.id, pal.id).await.unwrap();
    assert_eq!(outcome.friendships_removed, 2);
    assert_eq!(outcome.pins_removed, 1);

    assert!(hub.load_dashboard(me.id).await.unwrap().is_empty());
    assert!(hub.list_friends(me.id).await.unwrap().is_empty());
    assert!(hub.audit().await.unwrap().is_clean());
}

#[tokio::test]
async fn test_memory_backed_hub() {
    let hub = Hub::with_store(Arc::new(MemoryStore::new()));
    let a = hub.register_user("a@example.com", Some("a")).await.unwrap();
    let b = hub.register_user("b@example.com", Some("b")).await.unwrap();

    let request = hub.send_friend_request(a.id, b.id).await.unwrap();
    assert_eq!(hub.list_pending_incoming(b.id).await.unwrap(), vec![request.clone()]);
    assert_eq!(hub.list_pending_outgoing(a.id).await.unwrap(), vec![request.clone()]);

    let err = hub.send_friend_request(b.id, a.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestAlreadyPending);

    hub.respond_to_friend_request(request.id, b.id, Decision::Decline)
        .await
        .unwrap();
    assert!(!hub.are_friends(a.id, b.id).await.unwrap());

    let friends = hub.list_friends(a.id).await.unwrap();
    assert!(friends.is_empty());
}
