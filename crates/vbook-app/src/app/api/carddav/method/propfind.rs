//! PROPFIND method handler for the address book collections.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, handler};
use vbook_core::constants::CONTACTS_ROUTE_PREFIX;
use vbook_rfc::dav::Multistatus;
use vbook_service::dav::RenderContext;

use crate::app::api::carddav::response::{parse_body, principal_from_depot, send_multistatus};

/// ## Summary
/// Handles PROPFIND requests.
///
/// Every requested property is rendered and grouped into one response block
/// per status. Success blocks carry the request URI as href, except when
/// `getetag` is requested: then the href is the contacts collection.
///
/// ## Side Effects
/// - Parses request body XML
/// - One backend request per requested change tag
/// - Returns 207 Multi-Status XML response
///
/// ## Errors
/// Returns 204 for an empty body, 400 for malformed XML, 500 for server errors.
#[handler]
#[tracing::instrument(skip_all, fields(
    method = "PROPFIND",
    path = %req.uri().path()
))]
pub async fn propfind(req: &mut Request, res: &mut Response, depot: &Depot) {
    let mut href = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_owned(), ToString::to_string);

    let body = match req.payload().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request body");
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

    if request.get("getetag").is_some() {
        href = CONTACTS_ROUTE_PREFIX.to_owned();
        tracing::debug!(%href, "Target href overridden for getetag");
    }

    let ctx = RenderContext::new(principal.backend.as_ref(), &principal.credentials, href);
    let mut multistatus = Multistatus::new();
    request.each(&mut multistatus, &ctx).await;

    send_multistatus(res, &multistatus);
}
