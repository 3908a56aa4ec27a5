//! Data models for users, friendships, permissions, pins and tasks.
//!
//! Each persisted entity has an explicit record type here. Records are plain
//! data; the rules that govern how they change live in the component modules
//! ([`crate::ledger`], [`crate::permissions`], [`crate::pins`],
//! [`crate::tasks`]). Constructors that take user input ([`NewTask`],
//! [`NewUser`]) validate it so an invalid row never reaches a store.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

mod dashboard;
mod social;
mod status;
mod task;
mod user;

pub use dashboard::FriendTasks;
pub use social::{FriendPermission, FriendRequest, Friendship, PinnedFriend, UnfriendOutcome};
pub use status::{Decision, RequestStatus};
pub use task::{NewTask, Task, TaskFilter, TaskUpdate, Visibility};
pub use user::{NewUser, User};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                $name(value)
            }
        }
    };
}

id_type!(
    /// Stable reference into the identity store.
    UserId
);
id_type!(
    /// Identifier of a friend request row.
    RequestId
);
id_type!(
    /// Identifier of a task row; ascending ids follow creation order.
    TaskId
);

#[cfg(test)]
mod tests;
