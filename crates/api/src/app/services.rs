use std::sync::Arc;

use lendbook_reconciler::Reconciler;
use lendbook_store::{InMemoryStore, TableStore};

/// Shared application services: the reconciler over the selected store.
pub struct AppServices {
    reconciler: Reconciler<Arc<dyn TableStore>>,
}

impl AppServices {
    pub fn reconciler(&self) -> &Reconciler<Arc<dyn TableStore>> {
        &self.reconciler
    }
}

/// Wire up the services for this process.
///
/// With the `postgres` feature and `DATABASE_URL` set, the Postgres store is
/// used; otherwise everything runs against the in-memory store (tests/dev).
pub async fn build_services() -> AppServices {
    AppServices {
        reconciler: Reconciler::new(select_store().await),
    }
}

async fn select_store() -> Arc<dyn TableStore> {
    #[cfg(feature = "postgres")]
    if let Ok(url) = std::env::var("DATABASE_URL") {
        let store = lendbook_store::PostgresStore::connect(&url)
            .await
            .expect("failed to connect to DATABASE_URL");
        tracing::info!("using postgres store");
        return Arc::new(store);
    }

    tracing::info!("using in-memory store");
    Arc::new(InMemoryStore::new())
}
