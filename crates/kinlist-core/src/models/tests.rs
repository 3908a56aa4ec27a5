//! Tests for the model constructors and helpers.

use jiff::{civil::date, Timestamp};

use super::*;
use crate::error::ErrorKind;

fn task(id: u64, due: Option<jiff::civil::Date>, is_private: bool) -> Task {
    Task {
        id: TaskId(id),
        user_id: UserId(1),
        task_name: format!("task {id}"),
        due_date: due,
        is_done: false,
        is_private,
        assigned_by: Some(UserId(1)),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

#[test]
fn test_request_status_parsing() {
    assert_eq!("pending".parse::<RequestStatus>(), Ok(RequestStatus::Pending));
    assert_eq!("Accepted".parse::<RequestStatus>(), Ok(RequestStatus::Accepted));
    assert_eq!("declined".parse::<RequestStatus>(), Ok(RequestStatus::Declined));
    assert!("confirmed".parse::<RequestStatus>().is_err());

    assert!(!RequestStatus::Pending.is_terminal());
    assert!(RequestStatus::Accepted.is_terminal());
    assert_eq!(Decision::Decline.target_status(), RequestStatus::Declined);
}

#[test]
fn test_ids_serialize_transparently() {
    let json = serde_json::to_string(&UserId(42)).expect("serialize");
    assert_eq!(json, "42");
    assert_eq!(" 7 ".parse::<TaskId>(), Ok(TaskId(7)));
}

#[test]
fn test_new_task_rejects_blank_names() {
    let err = NewTask::new("   ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let task = NewTask::new("  Buy milk ")
        .expect("valid name")
        .due(date(2026, 10, 20))
        .private(true);
    assert_eq!(task.task_name(), "Buy milk");
    assert_eq!(task.due_date(), Some(date(2026, 10, 20)));
    assert!(task.is_private());
}

#[test]
fn test_new_user_validation() {
    let user = NewUser::new(" Alice@Example.COM ", Some("alice")).expect("valid user");
    assert_eq!(user.email(), "alice@example.com");
    assert_eq!(user.username(), Some("alice"));

    for bad in ["", "alice", "@example.com", "alice@", "a@b@c"] {
        assert_eq!(
            NewUser::new(bad, None).unwrap_err().kind(),
            ErrorKind::InvalidArgument,
            "{bad:?} should be rejected"
        );
    }
    assert!(NewUser::new("a@b.c", Some("two words")).is_err());
    assert!(NewUser::new("a@b.c", Some(" ")).is_err());
}

#[test]
fn test_listing_order_puts_undated_last() {
    let mut tasks = vec![
        task(1, None, false),
        task(2, Some(date(2026, 12, 1)), false),
        task(3, Some(date(2026, 11, 1)), false),
        task(4, None, false),
        task(5, Some(date(2026, 11, 1)), false),
    ];
    tasks.sort_by(Task::listing_order);

    let ids: Vec<u64> = tasks.iter().map(|t| t.id.0).collect();
    assert_eq!(ids, vec![3, 5, 2, 1, 4]);
}

#[test]
fn test_public_filter_hides_private_tasks() {
    let filter = TaskFilter::public();
    assert!(filter.matches(&task(1, None, false)));
    assert!(!filter.matches(&task(2, None, true)));

    let open_only = TaskFilter {
        done: Some(false),
        ..TaskFilter::default()
    };
    let mut done = task(3, None, true);
    done.is_done = true;
    assert!(!open_only.matches(&done));
    assert!(TaskFilter::default().matches(&done));
}

#[test]
fn test_task_update_applies_fields() {
    let mut t = task(1, Some(date(2026, 1, 1)), false);
    let update = TaskUpdate {
        task_name: Some("Renamed".to_string()),
        due_date: Some(None),
        is_done: Some(true),
        is_private: None,
    };
    update.apply_to(&mut t).expect("valid update");

    assert_eq!(t.task_name, "Renamed");
    assert_eq!(t.due_date, None);
    assert!(t.is_done);
    assert!(!t.is_private);

    let blank = TaskUpdate {
        task_name: Some(" ".to_string()),
        ..TaskUpdate::default()
    };
    assert!(blank.apply_to(&mut t).is_err());
    assert!(TaskUpdate::default().is_empty());
}

#[test]
fn test_delegation_flag() {
    let mut t = task(1, None, false);
    assert!(!t.is_delegated());
    t.assigned_by = Some(UserId(9));
    assert!(t.is_delegated());
}
