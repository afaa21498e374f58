//! Listener: binds the socket, builds the routes and runs the accept loop.

use std::{
    future::{Future, IntoFuture},
    net::SocketAddr,
    sync::Arc,
};

use axum::routing::get;
use tokio::{
    net::{TcpListener, TcpSocket},
    sync::watch,
};
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, ui::state::AppState};

use super::{
    error::ServerError,
    handler::{health_check, stats, websocket_handler},
    signal::shutdown_signal,
};

/// Run the server until a shutdown signal or a fatal failure.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::from_config(&config)?);

    state.credentials.ping().await?;
    state.session_cache.ping().await?;

    let listener = bind(&config).await?;
    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve `host:port` and listen with the configured backlog.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let target = format!("{}:{}", config.host, config.port);
    let addr = tokio::net::lookup_host(&target)
        .await
        .map_err(|source| ServerError::Resolve {
            addr: target.clone(),
            source,
        })?
        .next()
        .ok_or_else(|| ServerError::Resolve {
            addr: target.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses"),
        })?;

    let bind_error = |source| ServerError::Bind { addr, source };
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .map_err(bind_error)?;
    socket.set_reuseaddr(true).map_err(bind_error)?;
    socket.bind(addr).map_err(bind_error)?;
    let listener = socket.listen(config.backlog).map_err(bind_error)?;

    tracing::info!("Listening on {} (backlog {})", addr, config.backlog);
    Ok(listener)
}

/// Routes served on the listening socket.
pub fn build_app(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Accept connections on `listener` until `shutdown` completes or a
/// connection handler reports a fatal failure.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let fatal = state.fatal_receiver();
    let app = build_app(state);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .into_future();

    tokio::select! {
        result = server => result.map_err(ServerError::Serve),
        reason = wait_for_fatal(fatal) => {
            tracing::error!("Shutting down: {}", reason);
            Err(ServerError::Fatal(reason))
        }
    }
}

async fn wait_for_fatal(mut fatal: watch::Receiver<Option<String>>) -> String {
    // The borrowed value must be released before the next await.
    let reason = fatal
        .wait_for(Option::is_some)
        .await
        .map(|reason| reason.clone().unwrap_or_default());
    match reason {
        Ok(reason) => reason,
        // The sender lives in AppState; if it is gone nothing can report.
        Err(_) => std::future::pending().await,
    }
}
