//! Storage port for the social core.
//!
//! Every component receives its store explicitly at construction; nothing in
//! the crate reaches for a global client. [`SocialStore`] is the contract a
//! backing store must honor:
//!
//! - methods that say *atomic* must either apply all of their writes or none,
//!   and no reader may observe a partial result;
//! - existence checks are indexed lookups, never scans;
//! - failures of the store itself surface as
//!   [`SocialError::StoreUnavailable`](crate::SocialError::StoreUnavailable).
//!
//! The rules deciding *whether* a write is allowed live in the components.
//! Where a rule and its write must not be separated by another caller's
//! write, the store method reports what it found (for example
//! [`RequestInsert`]) and the component turns that into the typed error.
//!
//! Two implementations ship with the crate: [`SqliteStore`] for persistent
//! use and [`MemoryStore`] for tests and embedding.

use crate::{
    error::Result,
    models::{
        FriendPermission, FriendRequest, Friendship, NewTask, NewUser, PinnedFriend, RequestId,
        RequestStatus, Task, TaskFilter, TaskId, UnfriendOutcome, User, UserId,
    },
};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Which side of a friend request a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDirection {
    /// Requests the user received
    Incoming,
    /// Requests the user sent
    Outgoing,
}

/// Outcome of an atomic check-and-insert of a friend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestInsert {
    /// A new pending request was stored
    Created(FriendRequest),
    /// The pair is already friends; nothing was written
    AlreadyFriends,
    /// A pending request for the pair exists (either direction); nothing was
    /// written
    Pending(FriendRequest),
}

/// Outcome of resolving a friend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The request was pending and now carries the target status
    Applied(FriendRequest),
    /// The request was already terminal; it is returned unchanged
    Unchanged(FriendRequest),
}

/// Persistence contract for users, the friendship ledger, the registries and
/// tasks.
pub trait SocialStore: Send + Sync {
    /// Stores a user. Fails with `AlreadyExists` when the email or username
    /// is taken.
    fn insert_user(&self, user: &NewUser) -> Result<User>;

    fn get_user(&self, id: UserId) -> Result<Option<User>>;

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Atomically checks for an existing friendship or pending request
    /// between the pair, in either direction, and inserts a pending request
    /// only if neither exists.
    fn insert_friend_request(&self, requester: UserId, recipient: UserId) -> Result<RequestInsert>;

    fn get_friend_request(&self, id: RequestId) -> Result<Option<FriendRequest>>;

    /// Requests where `user` is the recipient (`Incoming`) or requester
    /// (`Outgoing`) with the given status, oldest first.
    fn list_friend_requests(
        &self,
        user: UserId,
        direction: RequestDirection,
        status: RequestStatus,
    ) -> Result<Vec<FriendRequest>>;

    /// Atomically moves a pending request to `status`. When `status` is
    /// `Accepted` the same unit inserts both mirrored friendship rows, skipping
    /// rows that already exist. A request that is no longer pending is
    /// returned unchanged. Returns `None` when the request does not exist.
    fn resolve_friend_request(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<Resolution>>;

    /// Whether the directed row `(user, friend)` exists.
    fn friendship_exists(&self, user: UserId, friend: UserId) -> Result<bool>;

    /// Friends of `user`, in ascending id order.
    fn list_friend_ids(&self, user: UserId) -> Result<Vec<UserId>>;

    /// Atomically removes both friendship rows for the pair along with every
    /// permission and pin between them, in both directions.
    fn remove_friendship(&self, a: UserId, b: UserId) -> Result<UnfriendOutcome>;

    /// Inserts whichever of `(a, b)` and `(b, a)` is missing, atomically.
    /// Returns the number of rows written.
    fn insert_friendship_pair(&self, a: UserId, b: UserId) -> Result<usize>;

    fn all_friendships(&self) -> Result<Vec<Friendship>>;

    /// Upserts a permission row, but only while a friendship `(owner, friend)`
    /// exists at write time. Returns `None` when there is no friendship.
    fn upsert_permission(
        &self,
        owner: UserId,
        friend: UserId,
        allowed: bool,
    ) -> Result<Option<FriendPermission>>;

    fn get_permission(&self, owner: UserId, friend: UserId) -> Result<Option<FriendPermission>>;

    fn delete_permission(&self, owner: UserId, friend: UserId) -> Result<bool>;

    fn all_permissions(&self) -> Result<Vec<FriendPermission>>;

    /// Inserts a pin if absent, but only while a friendship `(user, friend)`
    /// exists at write time. Returns `None` when there is no friendship.
    fn insert_pin(&self, user: UserId, friend: UserId) -> Result<Option<PinnedFriend>>;

    /// Returns whether a row was removed.
    fn delete_pin(&self, user: UserId, friend: UserId) -> Result<bool>;

    /// Raw pin rows for `user` in the order they were pinned, without any
    /// friendship filtering.
    fn list_pins(&self, user: UserId) -> Result<Vec<PinnedFriend>>;

    fn all_pins(&self) -> Result<Vec<PinnedFriend>>;

    /// Persists a task owned by `owner` with `assigned_by = creator`.
    fn insert_task(&self, owner: UserId, creator: UserId, task: &NewTask) -> Result<Task>;

    fn get_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// Tasks of `owner` matching `filter`, in
    /// [`Task::listing_order`](crate::models::Task::listing_order).
    fn list_tasks(&self, owner: UserId, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Writes the mutable fields of `task` and bumps `updated_at`. Returns
    /// `None` when the task no longer exists.
    fn save_task(&self, task: &Task) -> Result<Option<Task>>;

    fn delete_task(&self, id: TaskId) -> Result<bool>;
}
