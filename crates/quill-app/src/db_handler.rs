//! Makes the connection pool available to handlers through the depot.

use std::sync::Arc;

use quill_core::error::CoreError;
use quill_db::db::DbProvider;
use salvo::async_trait;

use crate::error::AppResult;

type SharedProvider = Arc<dyn DbProvider + Send + Sync>;

pub struct DbProviderHandler {
    provider: SharedProvider,
}

impl DbProviderHandler {
    #[must_use]
    pub fn new(provider: impl DbProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

#[async_trait]
impl salvo::Handler for DbProviderHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.provider));
    }
}

/// ## Summary
/// Retrieves the database provider from the depot. Handlers then check out a
/// connection with `provider.get_connection().await?`.
///
/// ## Errors
/// Returns an error if no provider was injected, e.g. in handler tests that
/// run without a database.
pub fn get_db_from_depot(depot: &salvo::Depot) -> AppResult<SharedProvider> {
    depot.obtain::<SharedProvider>().cloned().map_err(|_err| {
        CoreError::InvariantViolation("Database provider not found in depot").into()
    })
}
