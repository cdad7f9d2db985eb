mod carddav;
mod fallback;
mod well_known;

use salvo::Router;

use crate::middleware::session::SessionMiddleware;

// Re-export route constants from core
pub use vbook_core::constants::{
    CARDDAV_ROUTE_COMPONENT, CARDDAV_ROUTE_PREFIX, CONTACTS_ROUTE_COMPONENT,
    CONTACTS_ROUTE_PREFIX, WELL_KNOWN_CARDDAV,
};

/// ## Summary
/// Constructs the router with every protocol handler.
///
/// Unmatched requests fall through to a logging 404 handler.
///
/// ## Errors
/// Returns an error if any child route handler fails to initialize.
pub fn routes(sessions: SessionMiddleware) -> anyhow::Result<Router> {
    Ok(Router::new()
        .push(well_known::routes(sessions.clone())?)
        .push(carddav::routes(sessions)?)
        .push(fallback::routes()))
}
