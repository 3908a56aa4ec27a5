//! User records from the identity store.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::UserId;
use crate::error::{Result, SocialError};

/// An authoritative user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,

    /// Unique across all users
    pub email: String,

    /// Unique when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    pub created_at: Timestamp,
}

impl User {
    /// Name to show to other users: the username, falling back to the email.
    pub fn handle(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

/// Validated input for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: String,
    username: Option<String>,
}

impl NewUser {
    /// Validates and normalizes registration input.
    ///
    /// Emails are trimmed and lowercased and must have a non-empty local part
    /// and domain. Usernames are trimmed and may not be empty or contain
    /// whitespace.
    pub fn new(email: &str, username: Option<&str>) -> Result<Self> {
        let email = email.trim().to_lowercase();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => {
                return Err(SocialError::invalid_argument("email")
                    .with_reason(format!("'{email}' is not a valid email address")));
            }
        }

        let username = match username.map(str::trim) {
            None => None,
            Some("") => {
                return Err(SocialError::invalid_argument("username").with_reason("must not be empty"));
            }
            Some(name) if name.chars().any(char::is_whitespace) => {
                return Err(SocialError::invalid_argument("username")
                    .with_reason("must not contain whitespace"));
            }
            Some(name) => Some(name.to_string()),
        };

        Ok(Self { email, username })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
