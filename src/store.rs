//! Collaborators the catalog service depends on: where queries come from, where deletes go,
//! and who the current user is.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::db::sqlite;
use crate::error::{CatalogError, Result};
use crate::models::{AppSettings, ConnectionRecord, QueryRecord};

/// Backing store for saved queries and connections. Calls may block.
pub trait CatalogStore: Send + Sync + 'static {
    fn load_queries(&self) -> Result<Vec<QueryRecord>>;

    fn load_connections(&self) -> Result<Vec<ConnectionRecord>>;

    /// Delete a saved query. `Ok(false)` means there was nothing to delete.
    fn delete_query(&self, id: &str) -> Result<bool>;
}

pub trait IdentityProvider: Send + Sync + 'static {
    fn current_identity(&self) -> Option<String>;
}

/// Identity fixed for the lifetime of the process, e.g. from a login handshake
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<String>);

impl StaticIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        StaticIdentity(Some(identity.into()))
    }

    pub fn anonymous() -> Self {
        StaticIdentity(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<String> {
        self.0.clone()
    }
}

/// [`CatalogStore`] over the local SQLite metadata database
pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// Open (or create) the database under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self::new(sqlite::init_database(data_dir)?))
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        sqlite::create_schema(&conn)?;
        Ok(Self::new(conn))
    }

    pub fn load_settings(&self) -> Result<AppSettings> {
        self.with_db(|db| sqlite::load_settings(db))
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.with_db(|db| sqlite::save_settings(db, settings))
    }

    /// Run `f` against the locked connection
    pub fn with_db<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let db = self
            .db
            .lock()
            .map_err(|_| CatalogError::StatePoisoned("database"))?;
        Ok(f(&*db)?)
    }
}

impl CatalogStore for SqliteStore {
    fn load_queries(&self) -> Result<Vec<QueryRecord>> {
        self.with_db(sqlite::load_saved_queries)
    }

    fn load_connections(&self) -> Result<Vec<ConnectionRecord>> {
        self.with_db(sqlite::load_connections)
    }

    fn delete_query(&self, id: &str) -> Result<bool> {
        self.with_db(|db| sqlite::delete_saved_query(db, id))
    }
}
