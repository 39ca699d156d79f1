//! HTTP trigger: `GET <path>` fires the hello route

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use troubleshoot_core::{AppError, HelloRoute, HttpConfig};

/// Router serving `route` on `path`
pub fn router(route: Arc<HelloRoute>, path: &str) -> Router {
    Router::new().route(path, get(hello)).with_state(route)
}

/// Fire the route; a failed invocation becomes a 500 with the error text
pub async fn hello(State(route): State<Arc<HelloRoute>>) -> (StatusCode, String) {
    match route.fire() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Bind the configured address
pub async fn bind(config: &HttpConfig) -> Result<TcpListener, AppError> {
    let listener = TcpListener::bind(config.bind).await?;
    info!("Successfully bound to address {:?}", listener.local_addr()?);
    Ok(listener)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    match axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
    {
        Ok(()) => {
            info!("HTTP server stopped gracefully");
            Ok(())
        }
        Err(e) => {
            error!("HTTP server error: {:?}", e);
            Err(e.into())
        }
    }
}
