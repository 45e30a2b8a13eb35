//! Saved query catalog: filtering, sorting and selection for the query list, plus the SQLite
//! store and async service that feed it.

use std::path::Path;

pub mod catalog;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use catalog::{CatalogSession, DeleteIntent, DeleteOutcome, Facets, Notification, Selection};
pub use error::{CatalogError, Result};
pub use models::*;
pub use service::CatalogService;
pub use store::{CatalogStore, IdentityProvider, SqliteStore, StaticIdentity};

/// Install the `env_logger` backend for the `log` macros. Honours `RUST_LOG` and defaults to
/// `info`. Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Open the catalog database under `data_dir`, apply its stored settings and load the
/// catalog for `identity`.
pub async fn open_catalog(
    data_dir: &Path,
    identity: StaticIdentity,
) -> Result<CatalogService<SqliteStore, StaticIdentity>> {
    let store = SqliteStore::open(data_dir)?;
    let settings = store.load_settings()?;

    let service = CatalogService::new(store, identity, settings.catalog);
    service.refresh().await?;
    Ok(service)
}
