//! Friend requests, friendships, permissions and pins.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{RequestId, RequestStatus, UserId};

/// A directed request from `requester_id` to `recipient_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendRequest {
    pub id: RequestId,
    pub requester_id: UserId,
    pub recipient_id: UserId,
    pub status: RequestStatus,
    pub created_at: Timestamp,

    /// Set when the recipient accepted or declined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<Timestamp>,
}

/// One direction of a symmetric friendship.
///
/// A healthy friendship is always stored as two rows, `(A, B)` and `(B, A)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Friendship {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub created_at: Timestamp,
}

/// Grant from `user_id` (the task owner) to `friend_id` (the delegate).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendPermission {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub can_create_tasks: bool,
    pub updated_at: Timestamp,
}

/// A friend `user_id` wants on their dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedFriend {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub pinned_at: Timestamp,
}

/// Rows removed by an unfriend cascade, counted across both directions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnfriendOutcome {
    pub friendships_removed: usize,
    pub permissions_removed: usize,
    pub pins_removed: usize,
}

impl UnfriendOutcome {
    /// True when the call found nothing to remove.
    pub fn is_noop(&self) -> bool {
        self.friendships_removed == 0 && self.permissions_removed == 0 && self.pins_removed == 0
    }
}
