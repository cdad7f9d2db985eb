//! `CardDAV` REPORT method dispatcher.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};
use vbook_service::carddav::execute_report;
use vbook_service::error::{BackendError, ServiceError};

use crate::app::api::carddav::response::{parse_body, principal_from_depot, send_multistatus};

/// ## Summary
/// Main REPORT method dispatcher.
///
/// Thin dispatcher: parses request, delegates to the service layer.
///
/// ## Errors
/// Returns 204 for an empty body, 400 for malformed XML, 501 for unsupported
/// reports, 403 when the backend rejects the principal and 500 for other
/// backend failures.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "REPORT",
    path = %req.uri().path()
))]
pub async fn report(req: &mut Request, res: &mut Response, depot: &Depot) {
    let body = match req.payload().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::error!("Failed to read request body: {}", e);
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    };

    let Some(request) = parse_body(&body, depot, res) else {
        return;
    };

    let principal = match principal_from_depot(depot) {
        Ok(principal) => principal,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get request principal");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    match execute_report(principal.backend.as_ref(), &principal.credentials, &request).await {
        Ok(multistatus) => send_multistatus(res, &multistatus),
        Err(e) => {
            let status = error_status(&e);
            if status == StatusCode::NOT_IMPLEMENTED {
                tracing::warn!(error = %e, "Unsupported REPORT type for CardDAV endpoint");
            } else {
                tracing::error!(error = %e, "Failed to build REPORT response");
            }
            res.status_code(status);
        }
    }
}

fn error_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::UnsupportedReport(_) => StatusCode::NOT_IMPLEMENTED,
        ServiceError::Backend(BackendError::Rejected(_)) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
