//! GET handler for single vCards.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};
use vbook_core::constants::VCARD_CONTENT_TYPE;
use vbook_service::carddav::get_contact as fetch_contact;
use vbook_service::error::{BackendError, ServiceError};

use crate::app::api::carddav::response::{principal_from_depot, send_body};

/// ## Summary
/// Returns one contact as a bare vCard document.
///
/// ## Errors
/// Returns 404 for an invalid id, an unknown contact or a failed backend
/// request, and 403 when the backend rejects the principal.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "GET",
    path = %req.uri().path()
))]
pub async fn get_contact(req: &mut Request, res: &mut Response, depot: &Depot) {
    let segment = req.param::<String>("contact").unwrap_or_default();

    let principal = match principal_from_depot(depot) {
        Ok(principal) => principal,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get request principal");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    match fetch_contact(principal.backend.as_ref(), &principal.credentials, &segment).await {
        Ok(vcard) => {
            res.status_code(StatusCode::OK);
            send_body(res, VCARD_CONTENT_TYPE, vcard);
        }
        Err(e) => {
            tracing::error!(error = %e, uri = %req.uri(), "Failed to get contact");
            res.status_code(error_status(&e));
        }
    }
}

fn error_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Backend(BackendError::Rejected(_)) => StatusCode::FORBIDDEN,
        _ => StatusCode::NOT_FOUND,
    }
}
