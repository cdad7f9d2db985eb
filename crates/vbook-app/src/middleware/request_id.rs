use salvo::http::header::USER_AGENT;
use tracing::Instrument;
use vbook_service::token::{REQUEST_ID_LEN, random_token};

/// ## Summary
/// Tags every request with a random id and runs the rest of the chain inside
/// a span carrying it.
///
/// ## Side Effects
/// Logs the request line at info level.
pub struct RequestIdMiddleware;

#[salvo::async_trait]
impl salvo::Handler for RequestIdMiddleware {
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let request_id = random_token(REQUEST_ID_LEN);
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let span = tracing::info_span!(
            "request",
            id = %request_id,
            method = %req.method(),
            path = %req.uri().path(),
            remote_addr = ?req.remote_addr(),
            user_agent = %user_agent,
        );

        async {
            tracing::info!(uri = %req.uri(), "Incoming request");
            ctrl.call_next(req, depot, res).await;
        }
        .instrument(span)
        .await;
    }
}
