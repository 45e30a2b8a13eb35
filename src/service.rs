use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use crate::catalog::{CatalogSession, DeleteOutcome};
use crate::error::{CatalogError, Result};
use crate::models::CatalogSettings;
use crate::store::{CatalogStore, IdentityProvider};

/// Hosts a [`CatalogSession`] and performs the I/O the session asks for
pub struct CatalogService<S, I> {
    store: Arc<S>,
    identity: I,
    session: Arc<Mutex<CatalogSession>>,
}

impl<S: CatalogStore, I: IdentityProvider> CatalogService<S, I> {
    pub fn new(store: S, identity: I, settings: CatalogSettings) -> Self {
        Self {
            store: Arc::new(store),
            identity,
            session: Arc::new(Mutex::new(CatalogSession::new(settings))),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reload saved queries and connections from the store
    pub async fn refresh(&self) -> Result<()> {
        let queries = Arc::clone(&self.store);
        let connections = Arc::clone(&self.store);
        let (records, connections) = futures::try_join!(
            run_blocking(move || queries.load_queries()),
            run_blocking(move || connections.load_connections()),
        )?;

        let identity = self.identity.current_identity();
        self.lock()?
            .load_catalog(records, connections, identity.as_deref());
        Ok(())
    }

    /// Remove a saved query from the session right away and delete it from the store in the
    /// background. Must be called from within a Tokio runtime.
    ///
    /// Returns `None` when the session has no query with that id.
    pub fn delete(&self, id: &str) -> Result<Option<JoinHandle<()>>> {
        let Some(intent) = self.lock()?.delete_record(id) else {
            log::debug!("Ignoring delete of unknown saved query {}", id);
            return Ok(None);
        };

        let store = Arc::clone(&self.store);
        let session = Arc::clone(&self.session);
        Ok(Some(tokio::spawn(async move {
            let target = intent.id.clone();
            let outcome = match run_blocking(move || store.delete_query(&target)).await {
                Ok(true) => DeleteOutcome::Deleted,
                Ok(false) => {
                    log::debug!("Saved query {} was already gone from the store", intent.id);
                    DeleteOutcome::Deleted
                }
                Err(e) => DeleteOutcome::Failed(e.to_string()),
            };

            match session.lock() {
                Ok(mut session) => session.resolve_delete(&intent, outcome),
                Err(_) => log::error!(
                    "Session lock poisoned, dropping delete outcome for {}",
                    intent.id
                ),
            }
        })))
    }

    /// Run `f` against the session, e.g. to read the visible list or edit criteria
    pub fn with_session<T>(&self, f: impl FnOnce(&mut CatalogSession) -> T) -> Result<T> {
        let mut session = self.lock()?;
        Ok(f(&mut *session))
    }

    fn lock(&self) -> Result<MutexGuard<'_, CatalogSession>> {
        self.session
            .lock()
            .map_err(|_| CatalogError::StatePoisoned("session"))
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
