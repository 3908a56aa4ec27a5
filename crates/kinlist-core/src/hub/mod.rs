//! Async facade over the core components.
//!
//! [`Hub`] owns a shared [`SocialStore`] and exposes every core operation as
//! an `async fn`. Store work is blocking (SQLite file I/O or a mutex), so each
//! call runs on tokio's blocking pool and the caller's executor stays free.
//!
//! ```text
//! ┌──────────────┐   spawn_blocking   ┌──────────────────────┐    ┌──────────────┐
//! │  Hub (async) │──────────────────▶│ Ledger / Registries / │───▶│ SocialStore  │
//! │              │                    │ TaskService / ...     │    │ (SQLite/mem) │
//! └──────────────┘                    └──────────────────────┘    └──────────────┘
//! ```
//!
//! The components are cheap to construct, so the hub builds the one it needs
//! for each call instead of holding them.
//!
//! ```rust,no_run
//! use kinlist_core::HubBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hub = HubBuilder::new()
//!     .with_database_path(Some("kinlist.db"))
//!     .build()
//!     .await?;
//!
//! let ada = hub.register_user("ada@example.com", Some("ada")).await?;
//! let dashboard = hub.load_dashboard(ada.id).await?;
//! assert!(dashboard.is_empty());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task;

use crate::{
    error::{Result, SocialError},
    store::SocialStore,
};

pub mod builder;
mod social_ops;
mod task_ops;

#[cfg(test)]
mod tests;

pub use builder::HubBuilder;

/// Entry point for async callers.
#[derive(Clone)]
pub struct Hub {
    store: Arc<dyn SocialStore>,
}

impl Hub {
    /// Wraps an already opened store, e.g. a
    /// [`MemoryStore`](crate::store::MemoryStore).
    pub fn with_store(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    /// Runs `op` against the store on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn SocialStore>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || op(store))
            .await
            .map_err(|e| SocialError::store("Blocking store task failed").with_source(e))?
    }
}
