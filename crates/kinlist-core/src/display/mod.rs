//! Markdown formatting for records and operation outcomes.
//!
//! Domain records implement [`std::fmt::Display`] directly (see
//! [`models`]); collections and outcomes get newtype wrappers so each output
//! context can pick its own layout and empty-state message. The CLI renders
//! the resulting markdown in the terminal.
//!
//! ```rust
//! use kinlist_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Unpinned friend 4".to_string());
//! assert_eq!(status.to_string(), "Success: Unpinned friend 4\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{Dashboard, FriendRequests, Friends, Tasks};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
