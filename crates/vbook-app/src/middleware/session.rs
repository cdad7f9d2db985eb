//! Cookie-keyed cache of backend clients.
//!
//! Each session owns one backend client. A request holds the session lock
//! for its whole lifetime, so requests of one session run one at a time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use salvo::Depot;
use salvo::http::StatusCode;
use salvo::http::cookie::Cookie;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use vbook_core::error::CoreError;
use vbook_service::backend::{BackendFactory, ContactsBackend};
use vbook_service::error::BackendResult;
use vbook_service::token::{SESSION_ID_LEN, random_token};

use crate::config::get_config_from_depot;
use crate::error::AppResult;

pub struct Session {
    created: Instant,
    client: Arc<Mutex<Arc<dyn ContactsBackend>>>,
}

impl Session {
    fn new(client: Arc<dyn ContactsBackend>) -> Self {
        Self {
            created: Instant::now(),
            client: Arc::new(Mutex::new(client)),
        }
    }
}

#[derive(Default)]
pub struct SessionCache {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl SessionCache {
    /// ## Summary
    /// Returns the session with the given id, creating it with a fresh
    /// backend client when it is not cached.
    ///
    /// ## Errors
    /// Returns an error if the factory cannot build a client.
    pub async fn get_or_create(
        &self,
        session_id: &str,
        factory: &dyn BackendFactory,
    ) -> BackendResult<Arc<Session>> {
        let mut sessions = self.sessions.lock().await;

        if let Some(session) = sessions.get(session_id) {
            return Ok(Arc::clone(session));
        }

        let session = Arc::new(Session::new(factory.create()?));
        sessions.insert(session_id.to_owned(), Arc::clone(&session));
        tracing::debug!(session = %session_id, "Session created");

        Ok(session)
    }

    /// Evicts sessions older than `ttl`. Returns how many were removed.
    pub async fn sweep(&self, ttl: Duration) -> usize {
        self.evict_expired(Instant::now(), ttl).await
    }

    async fn evict_expired(&self, now: Instant, ttl: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        tracing::debug!(count = sessions.len(), "Records in the session cache");

        let before = sessions.len();
        sessions.retain(|id, session| {
            let expired = now.saturating_duration_since(session.created) > ttl;
            if expired {
                tracing::debug!(session = %id, "Session is expired");
            }
            !expired
        });

        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

/// ## Summary
/// Starts the background task that sweeps expired sessions every `period`.
///
/// The first sweep runs immediately.
pub fn spawn_sweeper(cache: Arc<SessionCache>, period: Duration, ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(?period, ?ttl, "Start session sweeper");

        let mut interval = tokio::time::interval(period.max(Duration::from_secs(1)));
        loop {
            interval.tick().await;
            let evicted = cache.sweep(ttl).await;
            if evicted > 0 {
                tracing::info!(evicted, "Expired sessions removed");
            }
        }
    })
}

/// ## Summary
/// Resolves the session of a request and exposes its backend client.
///
/// The session id comes from the cookie named by `session.cookie_name` in the
/// settings injected by [`ConfigHandler`](crate::config::ConfigHandler); a
/// new id is issued when the cookie is absent. The cookie is set on every
/// response.
///
/// ## Side Effects
/// Holds the session lock until the rest of the chain has run.
///
/// ## Errors
/// Answers 500 when the settings are missing or a backend client cannot be
/// built.
#[derive(Clone)]
pub struct SessionMiddleware {
    cache: Arc<SessionCache>,
    factory: Arc<dyn BackendFactory>,
}

impl SessionMiddleware {
    #[must_use]
    pub fn new(cache: Arc<SessionCache>, factory: Arc<dyn BackendFactory>) -> Self {
        Self { cache, factory }
    }
}

#[salvo::async_trait]
impl salvo::Handler for SessionMiddleware {
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let settings = match get_config_from_depot(depot) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!(error = %e, "Session settings unavailable");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };
        let cookie_name = settings.session.cookie_name.as_str();

        let session_id = match req.cookie(cookie_name) {
            Some(cookie) => cookie.value().to_owned(),
            None => {
                tracing::debug!("Unknown session cookie, will be created");
                random_token(SESSION_ID_LEN)
            }
        };

        let session = match self
            .cache
            .get_or_create(&session_id, self.factory.as_ref())
            .await
        {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create backend client");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        let client = Arc::clone(&session.client).lock_owned().await;
        tracing::debug!(session = %session_id, "Session cookie");

        let mut cookie = Cookie::new(cookie_name.to_owned(), session_id);
        cookie.set_path("/");
        res.add_cookie(cookie);

        depot.inject(Arc::clone(&*client));
        ctrl.call_next(req, depot, res).await;
        drop(client);
    }
}

/// ## Summary
/// Retrieves the backend client of the current session from the depot.
///
/// ## Errors
/// Returns an error if [`SessionMiddleware`] did not run for this request.
pub fn get_backend_from_depot(depot: &Depot) -> AppResult<Arc<dyn ContactsBackend>> {
    depot
        .obtain::<Arc<dyn ContactsBackend>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Backend client not found in depot").into())
}
