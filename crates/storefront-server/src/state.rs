//! Shared server state.

use std::sync::Arc;
use std::time::Instant;

use storefront_commerce::{
    catalog::CatalogService, contact::ContactService, reviews::ReviewService, StoragePolicy,
};
use storefront_db::Db;

/// Services shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub reviews: ReviewService,
    pub contact: ContactService,
    db: Db,
    policy: StoragePolicy,
    started: Arc<Instant>,
}

impl AppState {
    /// Build the services over one database handle.
    pub fn new(db: Db, policy: StoragePolicy) -> Self {
        Self {
            catalog: CatalogService::new(db.clone(), policy),
            reviews: ReviewService::new(db.clone(), policy),
            contact: ContactService::new(db.clone(), policy),
            db,
            policy,
            started: Arc::new(Instant::now()),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Whether the database answers within the storage timeout.
    pub async fn database_ready(&self) -> bool {
        let db = self.db.clone();
        let ping = tokio::task::spawn_blocking(move || db.ping());
        matches!(
            tokio::time::timeout(self.policy.timeout, ping).await,
            Ok(Ok(Ok(())))
        )
    }
}
