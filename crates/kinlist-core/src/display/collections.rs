//! Newtype wrappers for lists, each with its own empty-state message.

use std::fmt;

use crate::models::{FriendRequest, FriendTasks, Task, User};

/// A task list.
pub struct Tasks(pub Vec<Task>);

impl Tasks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }
}

impl IntoIterator for Tasks {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No tasks found.");
        }
        for task in &self.0 {
            write!(f, "{task}")?;
        }
        Ok(())
    }
}

/// Friend requests under a heading such as "Incoming".
pub struct FriendRequests {
    pub heading: &'static str,
    pub requests: Vec<FriendRequest>,
}

impl fmt::Display for FriendRequests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.heading)?;
        writeln!(f)?;
        if self.requests.is_empty() {
            return writeln!(f, "No pending requests.");
        }
        for request in &self.requests {
            write!(f, "{request}")?;
        }
        Ok(())
    }
}

/// A user's friends, one line each.
pub struct Friends(pub Vec<User>);

impl fmt::Display for Friends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No friends yet.");
        }
        for user in &self.0 {
            writeln!(f, "- {} (ID: {})", user.handle(), user.id)?;
        }
        Ok(())
    }
}

/// The pinned-friends dashboard.
pub struct Dashboard(pub Vec<FriendTasks>);

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No pinned friends. Pin a friend to see their tasks here.");
        }
        for entry in &self.0 {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::models::{RequestId, RequestStatus, UserId};

    #[test]
    fn test_empty_collections() {
        assert_eq!(Tasks(vec![]).to_string(), "No tasks found.\n");
        assert_eq!(Friends(vec![]).to_string(), "No friends yet.\n");
        assert!(Dashboard(vec![]).to_string().starts_with("No pinned friends."));
    }

    #[test]
    fn test_requests_under_heading() {
        let requests = FriendRequests {
            heading: "Incoming",
            requests: vec![FriendRequest {
                id: RequestId(5),
                requester_id: UserId(1),
                recipient_id: UserId(2),
                status: RequestStatus::Pending,
                created_at: Timestamp::UNIX_EPOCH,
                responded_at: None,
            }],
        };
        let output = requests.to_string();
        assert!(output.starts_with("## Incoming\n\n"));
        assert!(output.contains("Request 5: 1 → 2 (pending)"));
    }
}
