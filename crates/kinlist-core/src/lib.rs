//! Core library for kinlist, a to-do app where friends can see and add to
//! each other's lists.
//!
//! The crate owns the social rules around tasks:
//!
//! - [`ledger`]: friend requests and the symmetric friendship graph
//! - [`permissions`]: which friends may create tasks on an owner's list
//! - [`pins`]: which friends appear on a user's dashboard
//! - [`tasks`]: task ownership, delegated creation and visibility
//! - [`dashboard`]: the pinned friends' public tasks
//! - [`integrity`]: auditing and repairing the friendship graph
//!
//! Components take their [`SocialStore`] at construction. [`SqliteStore`]
//! persists to a file and [`MemoryStore`] keeps everything in process.
//! Async callers go through [`Hub`].
//!
//! # Display Architecture
//!
//! Records implement [`std::fmt::Display`] as markdown and [`display`] adds
//! wrappers for lists and outcomes, which the CLI renders in the terminal.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kinlist_core::{
//!     Decision, FriendshipLedger, MemoryStore, NewTask, PermissionRegistry, SocialStore,
//!     TaskService, identity::Directory,
//! };
//!
//! # fn main() -> kinlist_core::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let users = Directory::new(Arc::clone(&store));
//! let ada = users.register_user("ada@example.com", Some("ada"))?;
//! let bob = users.register_user("bob@example.com", Some("bob"))?;
//!
//! let ledger = FriendshipLedger::new(Arc::clone(&store));
//! let request = ledger.send_request(ada.id, bob.id)?;
//! ledger.respond_to_request(request.id, bob.id, Decision::Accept)?;
//!
//! PermissionRegistry::new(Arc::clone(&store)).set_create_permission(ada.id, bob.id, true)?;
//! let task = TaskService::new(Arc::clone(&store))
//!     .create_task(ada.id, bob.id, &NewTask::new("Book the ferry")?)?;
//! assert_eq!(task.assigned_by, Some(bob.id));
//! assert!(store.friendship_exists(bob.id, ada.id)?);
//! # Ok(())
//! # }
//! ```

pub mod dashboard;
pub mod db;
pub mod display;
pub mod error;
pub mod hub;
pub mod identity;
pub mod integrity;
pub mod ledger;
pub mod models;
pub mod permissions;
pub mod pins;
pub mod store;
pub mod tasks;

#[cfg(test)]
mod test_support;

pub use dashboard::DashboardAggregator;
pub use error::{ErrorKind, Result, SocialError};
pub use hub::{Hub, HubBuilder};
pub use integrity::{IntegrityChecker, IntegrityReport};
pub use ledger::FriendshipLedger;
pub use models::{
    Decision, FriendPermission, FriendRequest, FriendTasks, Friendship, NewTask, NewUser,
    PinnedFriend, RequestId, RequestStatus, Task, TaskFilter, TaskId, TaskUpdate, UnfriendOutcome,
    User, UserId, Visibility,
};
pub use permissions::PermissionRegistry;
pub use pins::PinRegistry;
pub use store::{MemoryStore, SocialStore, SqliteStore};
pub use tasks::{TaskService, authorize_task_creation};
