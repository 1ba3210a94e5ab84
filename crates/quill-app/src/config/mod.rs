use std::sync::Arc;

use quill_core::categories::CategoryTable;
pub use quill_core::config::*;
use quill_render::template::PageTemplates;
use salvo::async_trait;

use crate::error::{AppError, AppResult};

/// Injects the settings, the category table and the page templates into the depot.
#[derive(Clone)]
pub struct ConfigHandler {
    pub settings: Arc<Settings>,
    pub categories: Arc<CategoryTable>,
    pub templates: Arc<PageTemplates>,
}

impl ConfigHandler {
    #[must_use]
    pub fn new(settings: Settings, templates: PageTemplates) -> Self {
        let categories = CategoryTable::from_config(&settings.site.categories);
        Self {
            settings: Arc::new(settings),
            categories: Arc::new(categories),
            templates: Arc::new(templates),
        }
    }
}

#[async_trait]
impl salvo::Handler for ConfigHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.settings));
        depot.inject(Arc::clone(&self.categories));
        depot.inject(Arc::clone(&self.templates));
    }
}

/// ## Summary
/// Retrieves the application configuration from the depot.
///
/// ## Errors
/// Returns an error if the configuration is not found in the depot.
pub fn get_config_from_depot(depot: &salvo::Depot) -> AppResult<Arc<Settings>> {
    depot.obtain::<Arc<Settings>>().cloned().map_err(|_err| {
        AppError::CoreError(quill_core::error::CoreError::InvariantViolation(
            "Configuration not found in depot",
        ))
    })
}

/// ## Errors
/// Returns an error if the category table is not found in the depot.
pub fn get_categories_from_depot(depot: &salvo::Depot) -> AppResult<Arc<CategoryTable>> {
    depot.obtain::<Arc<CategoryTable>>().cloned().map_err(|_err| {
        AppError::CoreError(quill_core::error::CoreError::InvariantViolation(
            "Category table not found in depot",
        ))
    })
}

/// ## Errors
/// Returns an error if the page templates are not found in the depot.
pub fn get_templates_from_depot(depot: &salvo::Depot) -> AppResult<Arc<PageTemplates>> {
    depot.obtain::<Arc<PageTemplates>>().cloned().map_err(|_err| {
        AppError::CoreError(quill_core::error::CoreError::InvariantViolation(
            "Page templates not found in depot",
        ))
    })
}

#[cfg(test)]
pub(crate) mod tests;
