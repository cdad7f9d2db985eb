use salvo::http::StatusCode;
use salvo::http::header::USER_AGENT;
use salvo::{Request, Response, Router, handler};

#[handler]
async fn not_found(req: &mut Request, res: &mut Response) {
    tracing::warn!(
        remote_addr = ?req.remote_addr(),
        user_agent = ?req.headers().get(USER_AGENT),
        method = %req.method(),
        uri = %req.uri(),
        "404"
    );
    res.status_code(StatusCode::NOT_FOUND);
}

/// Catches every request no other route matched.
#[must_use]
pub fn routes() -> Router {
    Router::with_path("{**rest}").goal(not_found)
}
