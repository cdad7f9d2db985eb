use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};
use vbook_app::app::api::routes;
use vbook_app::config::ConfigHandler;
use vbook_app::middleware::request_id::RequestIdMiddleware;
use vbook_app::middleware::session::{SessionCache, SessionMiddleware, spawn_sweeper};
use vbook_app::registry_handler::RegistryHandler;
use vbook_core::config::load_config;
use vbook_core::constants::PROGRAM_NAME;
use vbook_service::backend::BackendFactory;
use vbook_service::backend::sbss::SbssClientFactory;
use vbook_service::dav::PropertyRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting {PROGRAM_NAME}");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let registry = Arc::new(PropertyRegistry::new(&config.addressbook.display_name));
    let factory: Arc<dyn BackendFactory> = Arc::new(SbssClientFactory::new(config.backend.clone()));

    let cache = Arc::new(SessionCache::default());
    let _sweeper = spawn_sweeper(
        Arc::clone(&cache),
        config.session.sweep_interval(),
        config.session.ttl(),
    );
    let sessions = SessionMiddleware::new(cache, factory);

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(RequestIdMiddleware)
        .hoop(ConfigHandler {
            settings: Arc::new(config),
        })
        .hoop(RegistryHandler { registry })
        .push(routes(sessions)?);

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
