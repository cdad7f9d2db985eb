use std::sync::Arc;

use salvo::async_trait;
use vbook_core::error::CoreError;
use vbook_service::dav::PropertyRegistry;

use crate::error::AppResult;

/// Shares the property registry, built once at startup, with every request.
pub struct RegistryHandler {
    pub registry: Arc<PropertyRegistry>,
}

#[async_trait]
impl salvo::Handler for RegistryHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.registry));
    }
}

/// ## Summary
/// Retrieves the property registry from the depot.
///
/// ## Errors
/// Returns an error if the registry is not found in the depot.
pub fn get_registry_from_depot(depot: &salvo::Depot) -> AppResult<Arc<PropertyRegistry>> {
    depot
        .obtain::<Arc<PropertyRegistry>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Property registry not found in depot").into())
}
