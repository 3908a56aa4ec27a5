//! Display implementations for domain records.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    integrity::IntegrityReport,
    models::{FriendPermission, FriendRequest, FriendTasks, PinnedFriend, Task, UnfriendOutcome, User},
};

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.handle(), self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Email**: {}", self.email)?;
        writeln!(f, "- **Joined**: {}", LocalDateTime(&self.created_at))
    }
}

impl fmt::Display for FriendRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- Request {}: {} → {} ({})",
            self.id, self.requester_id, self.recipient_id, self.status
        )
    }
}

impl fmt::Display for FriendPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.can_create_tasks { "may" } else { "may not" };
        writeln!(
            f,
            "User {} {verb} create tasks for {}",
            self.friend_id, self.user_id
        )
    }
}

impl fmt::Display for PinnedFriend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "User {} pinned {} at {}",
            self.user_id,
            self.friend_id,
            LocalDateTime(&self.pinned_at)
        )
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.is_done { "x" } else { " " };
        write!(f, "- [{check}] {}. {}", self.id, self.task_name)?;
        if let Some(due) = self.due_date {
            write!(f, " (due {due})")?;
        }
        if self.is_private {
            write!(f, " *private*")?;
        }
        if self.is_delegated()
            && let Some(creator) = self.assigned_by
        {
            write!(f, " *from user {creator}*")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for FriendTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.friend_username {
            Some(name) => writeln!(f, "## {name} (ID: {})", self.friend_id)?,
            None => writeln!(f, "## User {}", self.friend_id)?,
        }
        writeln!(f)?;
        if self.tasks.is_empty() {
            writeln!(f, "No shared tasks.")?;
        } else {
            for task in &self.tasks {
                write!(f, "{task}")?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Display for UnfriendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            return writeln!(f, "Nothing to remove; the users were not friends.");
        }
        writeln!(
            f,
            "Removed {} friendship row(s), {} permission(s) and {} pin(s).",
            self.friendships_removed, self.permissions_removed, self.pins_removed
        )
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "No integrity issues.");
        }

        if !self.missing_mirrors.is_empty() {
            writeln!(f, "## Friendships missing a mirror row")?;
            writeln!(f)?;
            for (user, friend) in &self.missing_mirrors {
                writeln!(f, "- {user} → {friend}")?;
            }
            writeln!(f)?;
        }
        if !self.orphaned_permissions.is_empty() {
            writeln!(f, "## Permissions without a friendship")?;
            writeln!(f)?;
            for permission in &self.orphaned_permissions {
                writeln!(f, "- {} → {}", permission.user_id, permission.friend_id)?;
            }
            writeln!(f)?;
        }
        if !self.orphaned_pins.is_empty() {
            writeln!(f, "## Pins without a friendship")?;
            writeln!(f)?;
            for pin in &self.orphaned_pins {
                writeln!(f, "- {} → {}", pin.user_id, pin.friend_id)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};

    use crate::models::{TaskId, UserId};

    use super::*;

    fn task() -> Task {
        Task {
            id: TaskId(7),
            user_id: UserId(1),
            task_name: "Buy milk".to_string(),
            due_date: Some(date(2026, 11, 2)),
            is_done: false,
            is_private: false,
            assigned_by: Some(UserId(2)),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_task_line() {
        assert_eq!(
            task().to_string(),
            "- [ ] 7. Buy milk (due 2026-11-02) *from user 2*\n"
        );

        let own = Task {
            is_done: true,
            is_private: true,
            due_date: None,
            assigned_by: Some(UserId(1)),
            ..task()
        };
        assert_eq!(own.to_string(), "- [x] 7. Buy milk *private*\n");
    }

    #[test]
    fn test_friend_tasks_without_tasks() {
        let entry = FriendTasks {
            friend_id: UserId(3),
            friend_username: Some("cara".to_string()),
            tasks: vec![],
        };
        let output = entry.to_string();
        assert!(output.starts_with("## cara (ID: 3)"));
        assert!(output.contains("No shared tasks."));
    }

    #[test]
    fn test_unfriend_outcome_noop() {
        assert!(
            UnfriendOutcome::default()
                .to_string()
                .contains("not friends")
        );
    }
}
