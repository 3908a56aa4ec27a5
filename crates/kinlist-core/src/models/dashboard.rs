use serde::{Deserialize, Serialize};

use super::{Task, UserId};

/// One pinned friend's entry on a dashboard.
///
/// `tasks` may be empty; hiding empty entries is a presentation decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendTasks {
    pub friend_id: UserId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend_username: Option<String>,

    pub tasks: Vec<Task>,
}
