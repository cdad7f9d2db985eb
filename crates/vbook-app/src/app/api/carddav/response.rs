//! Shared response writers and request context for `CardDAV` handlers.

use std::sync::Arc;

use salvo::http::{HeaderValue, StatusCode};
use salvo::{Depot, Response};
use vbook_core::constants::XML_CONTENT_TYPE;
use vbook_rfc::dav::{Multistatus, serialize_multistatus};
use vbook_service::backend::{ContactsBackend, Credentials};
use vbook_service::dav::{PropertyRegistry, PropertyRequest};

use crate::error::AppResult;
use crate::middleware::auth::get_credentials_from_depot;
use crate::middleware::session::get_backend_from_depot;
use crate::registry_handler::get_registry_from_depot;

/// Backend client and credentials of the authenticated principal.
pub struct Principal {
    pub backend: Arc<dyn ContactsBackend>,
    pub credentials: Credentials,
}

/// ## Summary
/// Collects the principal injected by the session and auth middleware.
///
/// ## Errors
/// Returns an error if either middleware did not run.
pub fn principal_from_depot(depot: &Depot) -> AppResult<Principal> {
    Ok(Principal {
        backend: get_backend_from_depot(depot)?,
        credentials: get_credentials_from_depot(depot)?,
    })
}

/// ## Summary
/// Parses a PROPFIND or REPORT body against the registry in the depot.
///
/// Writes the response itself and returns `None` when the handler must
/// stop: 204 for an empty body, 400 for malformed XML, 500 when the
/// registry is missing.
pub fn parse_body(body: &[u8], depot: &Depot, res: &mut Response) -> Option<PropertyRequest> {
    let registry: Arc<PropertyRegistry> = match get_registry_from_depot(depot) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get property registry");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return None;
        }
    };

    match PropertyRequest::parse(body, &registry) {
        Ok(Some(request)) => Some(request),
        Ok(None) => {
            tracing::warn!("Empty request");
            res.status_code(StatusCode::NO_CONTENT);
            None
        }
        Err(e) => {
            tracing::error!(kind = %e.kind, error = %e, "Failed to parse request body");
            res.status_code(StatusCode::BAD_REQUEST);
            None
        }
    }
}

/// ## Summary
/// Serializes a multistatus document into a 207 response.
///
/// ## Errors
/// Answers 500 if serialization fails.
pub fn send_multistatus(res: &mut Response, multistatus: &Multistatus) {
    let xml = match serialize_multistatus(multistatus) {
        Ok(xml) => xml,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize multistatus");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    res.status_code(StatusCode::MULTI_STATUS);
    send_body(res, XML_CONTENT_TYPE, xml);
}

/// Writes `body` with the given content type and logs its size.
pub fn send_body(res: &mut Response, content_type: &'static str, body: String) {
    #[expect(
        clippy::let_underscore_must_use,
        reason = "Header addition failure is non-fatal"
    )]
    let _ = res.add_header("Content-Type", HeaderValue::from_static(content_type), true);

    let sent = body.len();
    #[expect(
        clippy::let_underscore_must_use,
        reason = "Write body failure is non-fatal"
    )]
    let _ = res.write_body(body);

    tracing::info!("Sent {sent} bytes");
}
