//! Server startup and shutdown.

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;

use crate::{
    config::ServerConfig,
    error::ServerError,
    infrastructure::{
        connection::{InMemoryConnector, PgConnector},
        link::ShareLinks,
        store::SessionStore,
    },
    ui::{build_router, middleware::RateLimiter, signal::shutdown_signal, state::AppState},
};

/// Run the location sharing server until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let base_url = config.public_base_url()?;
    let settings = config.connection_settings();

    let store = match &config.database_url {
        Some(url) => {
            let connector = PgConnector::new(url, settings.connect_timeout, config.idle_timeout())?
                .with_max_connections(config.max_connections);
            SessionStore::start(connector, settings, config.operation_timeout())
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, sessions are kept in memory and lost on restart");
            SessionStore::start(
                InMemoryConnector::default(),
                settings,
                config.operation_timeout(),
            )
        }
    };

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max,
        config.rate_limit_window(),
    ));
    let purge_task = limiter.spawn_purge_task();

    let state = Arc::new(AppState::new(
        Arc::clone(&store.repository),
        Arc::clone(&store.connection),
        ShareLinks::new(base_url.clone()),
    ));
    let app = build_router(state, limiter);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!("Server listening on {} (share links: {})", addr, base_url);

    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    tracing::info!("Shutting down");
    purge_task.abort();
    store.shutdown().await;

    result.map_err(ServerError::Serve)
}
