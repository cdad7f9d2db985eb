// CardDAV API handlers.

use salvo::{Router, http::Method, routing::MethodFilter};

use crate::app::api::{CARDDAV_ROUTE_COMPONENT, CONTACTS_ROUTE_COMPONENT};
use crate::middleware::{auth::AuthMiddleware, session::SessionMiddleware};

pub mod method;
pub mod response;

pub fn routes(sessions: SessionMiddleware) -> anyhow::Result<Router> {
    let propfind = Method::from_bytes(b"PROPFIND")?;
    let report = Method::from_bytes(b"REPORT")?;

    Ok(Router::with_path(CARDDAV_ROUTE_COMPONENT)
        .hoop(sessions)
        .hoop(AuthMiddleware)
        // Address book root
        .push(collection(Router::new(), &propfind, &report))
        // Contacts collection
        .push(collection(
            Router::with_path(CONTACTS_ROUTE_COMPONENT),
            &propfind,
            &report,
        ))
        // Single vCard
        .push(Router::with_path("{contact}").get(method::get::get_contact)))
}

fn collection(router: Router, propfind: &Method, report: &Method) -> Router {
    router
        .push(
            Router::new()
                .filter(MethodFilter(propfind.clone()))
                .goal(method::propfind::propfind),
        )
        .push(
            Router::new()
                .filter(MethodFilter(report.clone()))
                .goal(method::report::report),
        )
}
