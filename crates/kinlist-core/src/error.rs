//! Error types for the social task-sharing core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{RequestId, UserId};

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every failure a core operation can report.
///
/// Callers branch on [`SocialError::kind`] rather than on the variant
/// payloads; the payloads exist for messages and logs.
#[derive(Error, Debug)]
pub enum SocialError {
    /// Malformed or self-referential input
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },
    /// Referenced entity does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    /// Caller is not allowed to perform the mutation
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },
    /// Operation is not valid for the entity's lifecycle state
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },
    /// A friendship already exists for the pair
    #[error("Users {user_id} and {friend_id} are already friends")]
    AlreadyFriends { user_id: UserId, friend_id: UserId },
    /// A pending request already exists for the pair, in either direction
    #[error("Friend request {request_id} is already pending between these users")]
    RequestAlreadyPending { request_id: RequestId },
    /// A unique identity attribute is already taken
    #[error("A user with {field} '{value}' already exists")]
    AlreadyExists { field: &'static str, value: String },
    /// Backing store failure; the only retryable kind
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
}

/// Coarse classification of [`SocialError`] for callers that translate
/// failures into user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Forbidden,
    InvalidState,
    AlreadyFriends,
    RequestAlreadyPending,
    AlreadyExists,
    StoreUnavailable,
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::AlreadyFriends => "already_friends",
            ErrorKind::RequestAlreadyPending => "request_already_pending",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Builder for store errors with an optional source.
pub struct StoreErrorBuilder {
    message: String,
}

impl StoreErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source<E>(self, source: E) -> SocialError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SocialError::StoreUnavailable {
            message: self.message,
            source: Some(Box::new(source)),
        }
    }

    /// Build the error without an underlying cause.
    pub fn bare(self) -> SocialError {
        SocialError::StoreUnavailable {
            message: self.message,
            source: None,
        }
    }
}

/// Builder for input validation errors.
pub struct InvalidArgumentBuilder {
    field: String,
}

impl InvalidArgumentBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SocialError {
        SocialError::InvalidArgument {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl SocialError {
    /// Creates a builder for store errors.
    pub fn store(message: impl Into<String>) -> StoreErrorBuilder {
        StoreErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_argument(field: impl Into<String>) -> InvalidArgumentBuilder {
        InvalidArgumentBuilder::new(field)
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        SocialError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        SocialError::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        SocialError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            SocialError::NotFound { .. } => ErrorKind::NotFound,
            SocialError::Forbidden { .. } => ErrorKind::Forbidden,
            SocialError::InvalidState { .. } => ErrorKind::InvalidState,
            SocialError::AlreadyFriends { .. } => ErrorKind::AlreadyFriends,
            SocialError::RequestAlreadyPending { .. } => ErrorKind::RequestAlreadyPending,
            SocialError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            SocialError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            SocialError::FileSystem { .. } | SocialError::XdgDirectory(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// Whether a caller may retry the same call with backoff.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StoreUnavailable
    }
}

/// Extension trait mapping rusqlite failures onto [`SocialError`].
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SocialError::store(message).with_source(e))
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, SocialError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_store_failures_are_retryable() {
        let store = SocialError::store("disk gone").bare();
        assert_eq!(store.kind(), ErrorKind::StoreUnavailable);
        assert!(store.is_retryable());

        let forbidden = SocialError::forbidden("no grant");
        assert!(!forbidden.is_retryable());

        let pending = SocialError::RequestAlreadyPending {
            request_id: RequestId(3),
        };
        assert_eq!(pending.kind(), ErrorKind::RequestAlreadyPending);
        assert!(!pending.is_retryable());
    }

    #[test]
    fn test_db_context_keeps_source() {
        let raw: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = raw.db_context("Failed to read").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "Store unavailable: Failed to read");
    }

    #[test]
    fn test_invalid_argument_builder() {
        let err = SocialError::invalid_argument("recipient_id").with_reason("cannot befriend yourself");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'recipient_id': cannot befriend yourself"
        );
    }
}
