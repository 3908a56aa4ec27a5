//! Friend permission and pin rows.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{id_column, id_param, timestamp_column};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{FriendPermission, PinnedFriend, UserId},
};

const CHECK_FRIENDSHIP_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_id = ?1 AND friend_id = ?2)";

const UPSERT_PERMISSION_SQL: &str = "INSERT INTO friend_permissions (user_id, friend_id, can_create_tasks, updated_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT (user_id, friend_id) DO UPDATE SET can_create_tasks = excluded.can_create_tasks, updated_at = excluded.updated_at";
const SELECT_PERMISSION_SQL: &str = "SELECT user_id, friend_id, can_create_tasks, updated_at FROM friend_permissions WHERE user_id = ?1 AND friend_id = ?2";
const SELECT_ALL_PERMISSIONS_SQL: &str = "SELECT user_id, friend_id, can_create_tasks, updated_at FROM friend_permissions ORDER BY user_id, friend_id";
const DELETE_PERMISSION_SQL: &str =
    "DELETE FROM friend_permissions WHERE user_id = ?1 AND friend_id = ?2";

const INSERT_PIN_SQL: &str =
    "INSERT OR IGNORE INTO pinned_friends (user_id, friend_id, pinned_at) VALUES (?1, ?2, ?3)";
const SELECT_PIN_SQL: &str =
    "SELECT user_id, friend_id, pinned_at FROM pinned_friends WHERE user_id = ?1 AND friend_id = ?2";
const SELECT_PINS_BY_USER_SQL: &str =
    "SELECT user_id, friend_id, pinned_at FROM pinned_friends WHERE user_id = ?1 ORDER BY id";
const SELECT_ALL_PINS_SQL: &str =
    "SELECT user_id, friend_id, pinned_at FROM pinned_friends ORDER BY id";
const DELETE_PIN_SQL: &str = "DELETE FROM pinned_friends WHERE user_id = ?1 AND friend_id = ?2";

impl super::Database {
    fn build_permission_from_row(row: &rusqlite::Row) -> rusqlite::Result<FriendPermission> {
        Ok(FriendPermission {
            user_id: UserId(id_column(row, 0)?),
            friend_id: UserId(id_column(row, 1)?),
            can_create_tasks: row.get(2)?,
            updated_at: timestamp_column(row, 3)?,
        })
    }

    fn build_pin_from_row(row: &rusqlite::Row) -> rusqlite::Result<PinnedFriend> {
        Ok(PinnedFriend {
            user_id: UserId(id_column(row, 0)?),
            friend_id: UserId(id_column(row, 1)?),
            pinned_at: timestamp_column(row, 2)?,
        })
    }

    /// Upserts a permission while the friendship `(owner, friend)` exists.
    pub fn upsert_permission(
        &mut self,
        owner: UserId,
        friend: UserId,
        allowed: bool,
    ) -> Result<Option<FriendPermission>> {
        let tx = self.write_transaction()?;
        let (owner_id, friend_id) = (id_param(owner.0), id_param(friend.0));

        let befriended: bool = tx
            .query_row(CHECK_FRIENDSHIP_SQL, params![owner_id, friend_id], |row| {
                row.get(0)
            })
            .db_context("Failed to check friendship")?;
        if !befriended {
            return Ok(None);
        }

        let now = Timestamp::now();
        tx.execute(
            UPSERT_PERMISSION_SQL,
            params![owner_id, friend_id, allowed, now.to_string()],
        )
        .db_context("Failed to upsert friend permission")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(FriendPermission {
            user_id: owner,
            friend_id: friend,
            can_create_tasks: allowed,
            updated_at: now,
        }))
    }

    pub fn get_permission(&self, owner: UserId, friend: UserId) -> Result<Option<FriendPermission>> {
        self.connection
            .query_row(
                SELECT_PERMISSION_SQL,
                params![id_param(owner.0), id_param(friend.0)],
                Self::build_permission_from_row,
            )
            .optional()
            .db_context("Failed to query friend permission")
    }

    pub fn delete_permission(&mut self, owner: UserId, friend: UserId) -> Result<bool> {
        let removed = self
            .connection
            .execute(
                DELETE_PERMISSION_SQL,
                params![id_param(owner.0), id_param(friend.0)],
            )
            .db_context("Failed to delete friend permission")?;
        Ok(removed > 0)
    }

    pub fn all_permissions(&self) -> Result<Vec<FriendPermission>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_PERMISSIONS_SQL)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map([], Self::build_permission_from_row)
            .db_context("Failed to query friend permissions")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch friend permissions")?;
        Ok(rows)
    }

    /// Pins `friend` for `user` while their friendship exists. Pinning twice
    /// returns the original row.
    pub fn insert_pin(&mut self, user: UserId, friend: UserId) -> Result<Option<PinnedFriend>> {
        let tx = self.write_transaction()?;
        let (user_id, friend_id) = (id_param(user.0), id_param(friend.0));

        let befriended: bool = tx
            .query_row(CHECK_FRIENDSHIP_SQL, params![user_id, friend_id], |row| {
                row.get(0)
            })
            .db_context("Failed to check friendship")?;
        if !befriended {
            return Ok(None);
        }

        tx.execute(
            INSERT_PIN_SQL,
            params![user_id, friend_id, Timestamp::now().to_string()],
        )
        .db_context("Failed to insert pin")?;
        let pin = tx
            .query_row(
                SELECT_PIN_SQL,
                params![user_id, friend_id],
                Self::build_pin_from_row,
            )
            .db_context("Failed to read back pin")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(pin))
    }

    pub fn delete_pin(&mut self, user: UserId, friend: UserId) -> Result<bool> {
        let removed = self
            .connection
            .execute(DELETE_PIN_SQL, params![id_param(user.0), id_param(friend.0)])
            .db_context("Failed to delete pin")?;
        Ok(removed > 0)
    }

    pub fn list_pins(&self, user: UserId) -> Result<Vec<PinnedFriend>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PINS_BY_USER_SQL)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(params![id_param(user.0)], Self::build_pin_from_row)
            .db_context("Failed to query pins")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch pins")?;
        Ok(rows)
    }

    pub fn all_pins(&self) -> Result<Vec<PinnedFriend>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_PINS_SQL)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map([], Self::build_pin_from_row)
            .db_context("Failed to query pins")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch pins")?;
        Ok(rows)
    }
}
