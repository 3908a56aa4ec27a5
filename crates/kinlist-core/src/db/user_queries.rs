//! User lookups and registration.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{id_column, id_param, timestamp_column};
use crate::{
    error::{DatabaseResultExt, Result, SocialError},
    models::{NewUser, User, UserId},
};

const INSERT_USER_SQL: &str = "INSERT INTO users (email, username, created_at) VALUES (?1, ?2, ?3)";
const CHECK_EMAIL_TAKEN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)";
const CHECK_USERNAME_TAKEN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)";
const SELECT_USER_BY_ID_SQL: &str =
    "SELECT id, email, username, created_at FROM users WHERE id = ?1";
const SELECT_USER_BY_USERNAME_SQL: &str =
    "SELECT id, email, username, created_at FROM users WHERE username = ?1";

impl super::Database {
    fn build_user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: UserId(id_column(row, 0)?),
            email: row.get(1)?,
            username: row.get(2)?,
            created_at: timestamp_column(row, 3)?,
        })
    }

    /// Registers a user, rejecting a taken email or username.
    pub fn insert_user(&mut self, user: &NewUser) -> Result<User> {
        let tx = self.write_transaction()?;

        let email_taken: bool = tx
            .query_row(CHECK_EMAIL_TAKEN_SQL, params![user.email()], |row| row.get(0))
            .db_context("Failed to check email")?;
        if email_taken {
            return Err(SocialError::AlreadyExists {
                field: "email",
                value: user.email().to_string(),
            });
        }

        if let Some(username) = user.username() {
            let username_taken: bool = tx
                .query_row(CHECK_USERNAME_TAKEN_SQL, params![username], |row| row.get(0))
                .db_context("Failed to check username")?;
            if username_taken {
                return Err(SocialError::AlreadyExists {
                    field: "username",
                    value: username.to_string(),
                });
            }
        }

        let now = Timestamp::now();
        tx.execute(
            INSERT_USER_SQL,
            params![user.email(), user.username(), now.to_string()],
        )
        .db_context("Failed to insert user")?;
        let id = UserId(tx.last_insert_rowid() as u64);

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(User {
            id,
            email: user.email().to_string(),
            username: user.username().map(String::from),
            created_at: now,
        })
    }

    pub fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.connection
            .query_row(SELECT_USER_BY_ID_SQL, params![id_param(id.0)], Self::build_user_from_row)
            .optional()
            .db_context("Failed to query user")
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.connection
            .query_row(
                SELECT_USER_BY_USERNAME_SQL,
                params![username],
                Self::build_user_from_row,
            )
            .optional()
            .db_context("Failed to query user by username")
    }
}
