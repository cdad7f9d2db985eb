use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use salvo::Depot;
use salvo::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use salvo::http::{HeaderValue, StatusCode};
use vbook_core::error::CoreError;
use vbook_service::backend::Credentials;

use crate::error::AppResult;

const CHALLENGE: &str = "Basic realm=Restricted";

/// ## Summary
/// Extracts the username and password of an `Authorization: Basic` header value.
///
/// Returns `None` for another scheme, invalid base64, or a decoded value
/// without a colon.
#[must_use]
pub fn parse_basic_auth(header: &str) -> Option<Credentials> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials::new(username, password))
}

/// ## Summary
/// Requires HTTP Basic credentials and stores them in the depot.
///
/// ## Errors
/// Answers 401 with a Basic challenge and stops the chain when the request
/// carries no usable credentials.
pub struct AuthMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let credentials = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_basic_auth);

        let Some(credentials) = credentials else {
            tracing::warn!("Unauthorized request");
            res.status_code(StatusCode::UNAUTHORIZED);
            #[expect(
                clippy::let_underscore_must_use,
                reason = "Header addition failure is non-fatal"
            )]
            let _ = res.add_header(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE), true);
            res.body("Unauthorized");
            ctrl.skip_rest();
            return;
        };

        tracing::info!(user = %credentials.username, "Authenticate user");
        depot.inject(credentials);
    }
}

/// ## Summary
/// Retrieves the credentials stored by [`AuthMiddleware`].
///
/// ## Errors
/// Returns an error if the middleware did not run for this request.
pub fn get_credentials_from_depot(depot: &Depot) -> AppResult<Credentials> {
    depot
        .obtain::<Credentials>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Credentials not found in depot").into())
}
