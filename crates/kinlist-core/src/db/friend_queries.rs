//! Friend requests and the symmetric friendship rows they produce.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Transaction};

use super::{id_column, id_param, optional_timestamp_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{FriendRequest, Friendship, RequestId, RequestStatus, UnfriendOutcome, UserId},
    store::{RequestDirection, RequestInsert, Resolution},
};

const REQUEST_COLUMNS: &str = "id, requester_id, recipient_id, status, created_at, responded_at";
const INSERT_REQUEST_SQL: &str = "INSERT INTO friend_requests (requester_id, recipient_id, status, created_at) VALUES (?1, ?2, 'pending', ?3)";
const SELECT_PENDING_FOR_PAIR_SQL: &str = "SELECT id, requester_id, recipient_id, status, created_at, responded_at FROM friend_requests WHERE status = 'pending' AND ((requester_id = ?1 AND recipient_id = ?2) OR (requester_id = ?2 AND recipient_id = ?1))";
const SELECT_REQUEST_SQL: &str = "SELECT id, requester_id, recipient_id, status, created_at, responded_at FROM friend_requests WHERE id = ?1";
const UPDATE_REQUEST_STATUS_SQL: &str = "UPDATE friend_requests SET status = ?1, responded_at = ?2 WHERE id = ?3 AND status = 'pending'";

const CHECK_FRIENDSHIP_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM friendships WHERE user_id = ?1 AND friend_id = ?2)";
const CHECK_EITHER_FRIENDSHIP_SQL: &str = "SELECT EXISTS(SELECT 1 FROM friendships WHERE (user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1))";
const INSERT_FRIENDSHIP_SQL: &str = "INSERT OR IGNORE INTO friendships (user_id, friend_id, status, created_at) VALUES (?1, ?2, 'accepted', ?3)";
const SELECT_FRIEND_IDS_SQL: &str =
    "SELECT friend_id FROM friendships WHERE user_id = ?1 ORDER BY friend_id";
const SELECT_ALL_FRIENDSHIPS_SQL: &str =
    "SELECT user_id, friend_id, created_at FROM friendships ORDER BY user_id, friend_id";
const DELETE_FRIENDSHIP_PAIR_SQL: &str = "DELETE FROM friendships WHERE (user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1)";
const DELETE_PERMISSION_PAIR_SQL: &str = "DELETE FROM friend_permissions WHERE (user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1)";
const DELETE_PIN_PAIR_SQL: &str = "DELETE FROM pinned_friends WHERE (user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1)";

impl super::Database {
    fn build_request_from_row(row: &rusqlite::Row) -> rusqlite::Result<FriendRequest> {
        let status_str: String = row.get(3)?;
        let status = status_str.parse::<RequestStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                format!("Invalid request status: {status_str}").into(),
            )
        })?;

        Ok(FriendRequest {
            id: RequestId(id_column(row, 0)?),
            requester_id: UserId(id_column(row, 1)?),
            recipient_id: UserId(id_column(row, 2)?),
            status,
            created_at: timestamp_column(row, 4)?,
            responded_at: optional_timestamp_column(row, 5)?,
        })
    }

    fn select_request(tx: &Transaction<'_>, id: RequestId) -> Result<Option<FriendRequest>> {
        tx.query_row(
            SELECT_REQUEST_SQL,
            params![id_param(id.0)],
            Self::build_request_from_row,
        )
        .optional()
        .db_context("Failed to query friend request")
    }

    fn insert_friendship_rows(
        tx: &Transaction<'_>,
        a: UserId,
        b: UserId,
        now: &str,
    ) -> Result<usize> {
        let forward = tx
            .execute(INSERT_FRIENDSHIP_SQL, params![id_param(a.0), id_param(b.0), now])
            .db_context("Failed to insert friendship")?;
        let mirror = tx
            .execute(INSERT_FRIENDSHIP_SQL, params![id_param(b.0), id_param(a.0), now])
            .db_context("Failed to insert mirrored friendship")?;
        Ok(forward + mirror)
    }

    /// Inserts a pending request unless the pair is already connected.
    pub fn insert_friend_request(
        &mut self,
        requester: UserId,
        recipient: UserId,
    ) -> Result<RequestInsert> {
        let tx = self.write_transaction()?;
        let (a, b) = (id_param(requester.0), id_param(recipient.0));

        let already_friends: bool = tx
            .query_row(CHECK_EITHER_FRIENDSHIP_SQL, params![a, b], |row| row.get(0))
            .db_context("Failed to check friendship")?;
        if already_friends {
            return Ok(RequestInsert::AlreadyFriends);
        }

        let pending = tx
            .query_row(
                SELECT_PENDING_FOR_PAIR_SQL,
                params![a, b],
                Self::build_request_from_row,
            )
            .optional()
            .db_context("Failed to check pending requests")?;
        if let Some(existing) = pending {
            return Ok(RequestInsert::Pending(existing));
        }

        let now = Timestamp::now();
        tx.execute(INSERT_REQUEST_SQL, params![a, b, now.to_string()])
            .db_context("Failed to insert friend request")?;
        let id = RequestId(tx.last_insert_rowid() as u64);

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(RequestInsert::Created(FriendRequest {
            id,
            requester_id: requester,
            recipient_id: recipient,
            status: RequestStatus::Pending,
            created_at: now,
            responded_at: None,
        }))
    }

    pub fn get_friend_request(&self, id: RequestId) -> Result<Option<FriendRequest>> {
        self.connection
            .query_row(
                SELECT_REQUEST_SQL,
                params![id_param(id.0)],
                Self::build_request_from_row,
            )
            .optional()
            .db_context("Failed to query friend request")
    }

    pub fn list_friend_requests(
        &self,
        user: UserId,
        direction: RequestDirection,
        status: RequestStatus,
    ) -> Result<Vec<FriendRequest>> {
        let column = match direction {
            RequestDirection::Incoming => "recipient_id",
            RequestDirection::Outgoing => "requester_id",
        };
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM friend_requests WHERE {column} = ?1 AND status = ?2 ORDER BY id"
        );

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(
                params![id_param(user.0), status.as_str()],
                Self::build_request_from_row,
            )
            .db_context("Failed to query friend requests")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch friend requests")?;
        Ok(rows)
    }

    /// Moves a pending request to `status`; on acceptance the same
    /// transaction writes both friendship rows.
    pub fn resolve_friend_request(
        &mut self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<Resolution>> {
        let tx = self.write_transaction()?;

        let Some(current) = Self::select_request(&tx, id)? else {
            return Ok(None);
        };
        if current.status.is_terminal() {
            return Ok(Some(Resolution::Unchanged(current)));
        }

        let now = Timestamp::now();
        let now_str = now.to_string();
        let updated = tx
            .execute(
                UPDATE_REQUEST_STATUS_SQL,
                params![status.as_str(), &now_str, id_param(id.0)],
            )
            .db_context("Failed to update friend request")?;

        if updated == 0 {
            let latest = Self::select_request(&tx, id)?.unwrap_or(current);
            return Ok(Some(Resolution::Unchanged(latest)));
        }
        if status == RequestStatus::Accepted {
            Self::insert_friendship_rows(&tx, current.requester_id, current.recipient_id, &now_str)?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(Resolution::Applied(FriendRequest {
            status,
            responded_at: Some(now),
            ..current
        })))
    }

    pub fn friendship_exists(&self, user: UserId, friend: UserId) -> Result<bool> {
        self.connection
            .query_row(
                CHECK_FRIENDSHIP_SQL,
                params![id_param(user.0), id_param(friend.0)],
                |row| row.get(0),
            )
            .db_context("Failed to check friendship")
    }

    pub fn list_friend_ids(&self, user: UserId) -> Result<Vec<UserId>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_FRIEND_IDS_SQL)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map(params![id_param(user.0)], |row| {
                Ok(UserId(id_column(row, 0)?))
            })
            .db_context("Failed to query friends")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch friends")?;
        Ok(rows)
    }

    /// Removes the friendship and everything that depended on it, in one
    /// transaction.
    pub fn remove_friendship(&mut self, a: UserId, b: UserId) -> Result<UnfriendOutcome> {
        let tx = self.write_transaction()?;
        let (a, b) = (id_param(a.0), id_param(b.0));

        let friendships_removed = tx
            .execute(DELETE_FRIENDSHIP_PAIR_SQL, params![a, b])
            .db_context("Failed to delete friendship")?;
        let permissions_removed = tx
            .execute(DELETE_PERMISSION_PAIR_SQL, params![a, b])
            .db_context("Failed to delete friend permissions")?;
        let pins_removed = tx
            .execute(DELETE_PIN_PAIR_SQL, params![a, b])
            .db_context("Failed to delete pins")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(UnfriendOutcome {
            friendships_removed,
            permissions_removed,
            pins_removed,
        })
    }

    pub fn insert_friendship_pair(&mut self, a: UserId, b: UserId) -> Result<usize> {
        let tx = self.write_transaction()?;
        let written = Self::insert_friendship_rows(&tx, a, b, &Timestamp::now().to_string())?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(written)
    }

    pub fn all_friendships(&self) -> Result<Vec<Friendship>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ALL_FRIENDSHIPS_SQL)
            .db_context("Failed to prepare query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Friendship {
                    user_id: UserId(id_column(row, 0)?),
                    friend_id: UserId(id_column(row, 1)?),
                    created_at: timestamp_column(row, 2)?,
                })
            })
            .db_context("Failed to query friendships")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch friendships")?;
        Ok(rows)
    }
}
