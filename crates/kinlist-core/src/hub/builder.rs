//! Builder for [`Hub`] instances backed by SQLite.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;
use tokio::task;

use super::Hub;
use crate::{
    error::{Result, SocialError},
    store::SqliteStore,
};

/// Configures where the hub keeps its database.
#[derive(Debug, Clone, Default)]
pub struct HubBuilder {
    database_path: Option<PathBuf>,
}

impl HubBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database file. `None` keeps the default,
    /// `$XDG_DATA_HOME/kinlist/kinlist.db`.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Creates missing parent directories, opens the database and brings
    /// its schema up to date.
    ///
    /// # Errors
    ///
    /// - `FileSystem` if the parent directory cannot be created
    /// - `XdgDirectory` if no default location can be determined
    /// - `StoreUnavailable` if the database cannot be opened or initialized
    pub async fn build(self) -> Result<Hub> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SocialError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!("Opening database at {}", db_path.display());
        let store = task::spawn_blocking(move || SqliteStore::open(db_path))
            .await
            .map_err(|e| SocialError::store("Blocking store task failed").with_source(e))??;

        Ok(Hub::with_store(Arc::new(store)))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("kinlist")
            .place_data_file("kinlist.db")
            .map_err(|e| SocialError::XdgDirectory(e.to_string()))
    }
}
