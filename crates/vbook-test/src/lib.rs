//! Integration test support for the address book bridge.
//!
//! Provides an in-memory backend and a service wired the same way as the
//! binary, so tests drive the full router without a billing server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use salvo::{Router, Service};
use vbook_app::app::api::routes;
use vbook_app::config::{ConfigHandler, Settings};
use vbook_app::middleware::request_id::RequestIdMiddleware;
use vbook_app::middleware::session::{SessionCache, SessionMiddleware};
use vbook_app::registry_handler::RegistryHandler;
use vbook_service::backend::{BackendFactory, ContactsBackend};
use vbook_service::dav::PropertyRegistry;
use vbook_service::error::BackendResult;

pub use vbook_core as core;
pub use vbook_rfc as rfc;
pub use vbook_service as service;
pub use vbook_service::backend::mock::MockBackend;

/// Hands the same backend to every session.
pub struct SharedBackendFactory {
    backend: Arc<MockBackend>,
    created: AtomicUsize,
}

impl SharedBackendFactory {
    #[must_use]
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            backend,
            created: AtomicUsize::new(0),
        }
    }

    /// Number of sessions created so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl BackendFactory for SharedBackendFactory {
    fn create(&self) -> BackendResult<Arc<dyn ContactsBackend>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.backend) as Arc<dyn ContactsBackend>)
    }
}

/// ## Summary
/// Returns the default settings used by test services.
///
/// ## Panics
/// Panics if the defaults do not deserialize.
#[expect(clippy::expect_used, reason = "Invalid defaults are fatal in tests")]
#[must_use]
pub fn test_config() -> Settings {
    Settings::defaults()
        .and_then(|builder| Ok(builder.build()?))
        .and_then(|config| Ok(config.try_deserialize::<Settings>()?))
        .expect("Default settings should deserialize")
}

/// A service together with the collaborators tests inspect.
pub struct TestApp {
    pub service: Service,
    pub backend: Arc<MockBackend>,
    pub factory: Arc<SharedBackendFactory>,
    pub sessions: Arc<SessionCache>,
    pub settings: Settings,
}

impl TestApp {
    /// Builds a service wired like the binary, backed by `backend`.
    #[must_use]
    pub fn new(backend: MockBackend) -> Self {
        Self::with_settings(backend, test_config())
    }

    /// ## Summary
    /// Builds a service wired like the binary with the given settings.
    ///
    /// ## Panics
    /// Panics if the routes cannot be constructed.
    #[expect(clippy::expect_used, reason = "Service creation failure is fatal")]
    #[must_use]
    pub fn with_settings(backend: MockBackend, settings: Settings) -> Self {
        let backend = Arc::new(backend);
        let factory = Arc::new(SharedBackendFactory::new(Arc::clone(&backend)));
        let sessions = Arc::new(SessionCache::default());
        let registry = Arc::new(PropertyRegistry::new(&settings.addressbook.display_name));

        let router = Router::new()
            .hoop(RequestIdMiddleware)
            .hoop(ConfigHandler {
                settings: Arc::new(settings.clone()),
            })
            .hoop(RegistryHandler { registry })
            .push(
                routes(SessionMiddleware::new(
                    Arc::clone(&sessions),
                    Arc::clone(&factory) as Arc<dyn BackendFactory>,
                ))
                .expect("API routes should be valid"),
            );

        Self {
            service: Service::new(router),
            backend,
            factory,
            sessions,
            settings,
        }
    }
}
