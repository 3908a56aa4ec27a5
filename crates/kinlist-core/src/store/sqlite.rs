//! [`SocialStore`] backed by a SQLite file.
//!
//! Each call opens its own connection, so the store can be shared freely
//! across threads; SQLite's locking and the `BEGIN IMMEDIATE` transactions
//! in [`crate::db`] provide the atomicity the port requires.

use std::path::{Path, PathBuf};

use super::{RequestDirection, RequestInsert, Resolution, SocialStore};
use crate::{
    db::Database,
    error::Result,
    models::{
        FriendPermission, FriendRequest, Friendship, NewTask, NewUser, PinnedFriend, RequestId,
        RequestStatus, Task, TaskFilter, TaskId, UnfriendOutcome, User, UserId,
    },
};

/// SQLite-backed store addressed by file path.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and brings its
    /// schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        Database::new(&db_path)?;
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn db(&self) -> Result<Database> {
        Database::connect(&self.db_path)
    }
}

impl SocialStore for SqliteStore {
    fn insert_user(&self, user: &NewUser) -> Result<User> {
        self.db()?.insert_user(user)
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.db()?.get_user(id)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.db()?.find_user_by_username(username)
    }

    fn insert_friend_request(&self, requester: UserId, recipient: UserId) -> Result<RequestInsert> {
        self.db()?.insert_friend_request(requester, recipient)
    }

    fn get_friend_request(&self, id: RequestId) -> Result<Option<FriendRequest>> {
        self.db()?.get_friend_request(id)
    }

    fn list_friend_requests(
        &self,
        user: UserId,
        direction: RequestDirection,
        status: RequestStatus,
    ) -> Result<Vec<FriendRequest>> {
        self.db()?.list_friend_requests(user, direction, status)
    }

    fn resolve_friend_request(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<Resolution>> {
        self.db()?.resolve_friend_request(id, status)
    }

    fn friendship_exists(&self, user: UserId, friend: UserId) -> Result<bool> {
        self.db()?.friendship_exists(user, friend)
    }

    fn list_friend_ids(&self, user: UserId) -> Result<Vec<UserId>> {
        self.db()?.list_friend_ids(user)
    }

    fn remove_friendship(&self, a: UserId, b: UserId) -> Result<UnfriendOutcome> {
        self.db()?.remove_friendship(a, b)
    }

    fn insert_friendship_pair(&self, a: UserId, b: UserId) -> Result<usize> {
        self.db()?.insert_friendship_pair(a, b)
    }

    fn all_friendships(&self) -> Result<Vec<Friendship>> {
        self.db()?.all_friendships()
    }

    fn upsert_permission(
        &self,
        owner: UserId,
        friend: UserId,
        allowed: bool,
    ) -> Result<Option<FriendPermission>> {
        self.db()?.upsert_permission(owner, friend, allowed)
    }

    fn get_permission(&self, owner: UserId, friend: UserId) -> Result<Option<FriendPermission>> {
        self.db()?.get_permission(owner, friend)
    }

    fn delete_permission(&self, owner: UserId, friend: UserId) -> Result<bool> {
        self.db()?.delete_permission(owner, friend)
    }

    fn all_permissions(&self) -> Result<Vec<FriendPermission>> {
        self.db()?.all_permissions()
    }

    fn insert_pin(&self, user: UserId, friend: UserId) -> Result<Option<PinnedFriend>> {
        self.db()?.insert_pin(user, friend)
    }

    fn delete_pin(&self, user: UserId, friend: UserId) -> Result<bool> {
        self.db()?.delete_pin(user, friend)
    }

    fn list_pins(&self, user: UserId) -> Result<Vec<PinnedFriend>> {
        self.db()?.list_pins(user)
    }

    fn all_pins(&self) -> Result<Vec<PinnedFriend>> {
        self.db()?.all_pins()
    }

    fn insert_task(&self, owner: UserId, creator: UserId, task: &NewTask) -> Result<Task> {
        self.db()?.insert_task(owner, creator, task)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.db()?.get_task(id)
    }

    fn list_tasks(&self, owner: UserId, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.db()?.list_tasks(owner, filter)
    }

    fn save_task(&self, task: &Task) -> Result<Option<Task>> {
        self.db()?.save_task(task)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool> {
        self.db()?.delete_task(id)
    }
}
