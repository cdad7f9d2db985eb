use salvo::http::{HeaderValue, Method, StatusCode, header::LOCATION};
use salvo::routing::MethodFilter;
use salvo::{Response, Router, handler};

use crate::app::api::{CARDDAV_ROUTE_PREFIX, WELL_KNOWN_CARDDAV};
use crate::middleware::session::SessionMiddleware;

/// Points service discovery at the address book root.
#[handler]
async fn redirect(res: &mut Response) {
    res.status_code(StatusCode::MOVED_PERMANENTLY);
    #[expect(
        clippy::let_underscore_must_use,
        reason = "Header addition failure is non-fatal"
    )]
    let _ = res.add_header(LOCATION, HeaderValue::from_static(CARDDAV_ROUTE_PREFIX), true);
}

pub fn routes(sessions: SessionMiddleware) -> anyhow::Result<Router> {
    Ok(Router::with_path(WELL_KNOWN_CARDDAV.trim_start_matches('/'))
        .hoop(sessions)
        .push(
            Router::new()
                .filter(MethodFilter(Method::from_bytes(b"PROPFIND")?))
                .goal(redirect),
        ))
}
