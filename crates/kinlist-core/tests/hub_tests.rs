mod common;

use common::create_test_hub;
use kinlist_core::{Decision, ErrorKind, NewTask, TaskFilter, UserId};

#[tokio::test]
async fn test_full_social_flow() {
    let (_temp_dir, hub) = create_test_hub().await;

    let owner = hub
        .register_user("owner@example.com", Some("owner"))
        .await
        .expect("Failed to register owner");
    let friend = hub
        .register_user("friend@example.com", Some("friend"))
        .await
        .expect("Failed to register friend");

    let request = hub
        .send_friend_request(friend.id, owner.id)
        .await
        .expect("Failed to send request");
    let err = hub
        .respond_to_friend_request(request.id, friend.id, Decision::Accept)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden, "only the recipient responds");

    hub.respond_to_friend_request(request.id, owner.id, Decision::Accept)
        .await
        .expect("Failed to accept");
    let friends = hub.list_friends(owner.id).await.unwrap();
    assert_eq!(friends, vec![friend.clone()]);

    hub.set_create_permission(owner.id, friend.id, true)
        .await
        .unwrap();
    hub.create_task(owner.id, friend.id, &NewTask::new("Buy milk").unwrap())
        .await
        .expect("Delegated create should succeed");
    hub.create_task(owner.id, owner.id, &NewTask::new("Diary").unwrap().private(true))
        .await
        .unwrap();

    hub.pin_friend(friend.id, owner.id).await.unwrap();
    assert_eq!(hub.list_pinned(friend.id).await.unwrap(), vec![owner.id]);

    let dashboard = hub.load_dashboard(friend.id).await.unwrap();
    assert_eq!(dashboard.len(), 1);
    let names: Vec<_> = dashboard[0].tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, vec!["Buy milk"]);

    let own = hub.list_tasks(owner.id, TaskFilter::default()).await.unwrap();
    assert_eq!(own.len(), 2);

    hub.unpin_friend(friend.id, owner.id).await.unwrap();
    assert!(hub.load_dashboard(friend.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_ids_report_not_found() {
    let (_temp_dir, hub) = create_test_hub().await;
    let user = hub
        .register_user("solo@example.com", None)
        .await
        .unwrap();

    let err = hub.get_user(UserId(404)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = hub.send_friend_request(user.id, UserId(404)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = hub.find_user("nobody").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
