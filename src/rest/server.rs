//! REST API HTTP server.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as CorsAny, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{router::create_router, state::ApiState};

/// Default port for the REST API server.
pub const DEFAULT_PORT: u16 = 7979;

/// REST API server handle.
pub struct RestApiServer {
    /// Server handle for graceful shutdown.
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    /// API state (shared with handlers).
    state: Arc<ApiState>,
    /// Server address.
    addr: SocketAddr,
}

/// Fixed response for uncaught faults in handlers, distinct from every
/// probe classification.
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    tracing::error!("panic while handling request");

    let body = serde_json::json!({
        "success": false,
        "message": "Server error testing SSH connection",
    });

    match Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
    {
        Ok(resp) => resp,
        Err(_) => {
            let mut resp = Response::new(Body::from("Server error testing SSH connection"));
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        }
    }
}

impl RestApiServer {
    /// Creates and starts a new REST API server.
    ///
    /// Pass `Some(0)` as the port to bind an ephemeral port (tests).
    ///
    /// # Errors
    /// Returns error if the server fails to bind.
    pub async fn start(state: Arc<ApiState>, port: Option<u16>) -> std::io::Result<Self> {
        let port = port.unwrap_or(DEFAULT_PORT);
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let router = create_router(Arc::clone(&state))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(
                CorsLayer::new()
                    .allow_origin(CorsAny)
                    .allow_methods(CorsAny)
                    .allow_headers(CorsAny),
            )
            .layer(TraceLayer::new_for_http());

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Start server in background task
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = server.await {
                tracing::error!("REST API server error: {}", e);
            }
        });

        tracing::info!("REST API server started on http://{}", actual_addr);

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            state,
            addr: actual_addr,
        })
    }

    /// Returns the server address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the API URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns a reference to the API state.
    #[must_use]
    pub fn state(&self) -> &Arc<ApiState> {
        &self.state
    }

    /// Shuts down the server.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("REST API server shutdown requested");
        }
    }
}

impl Drop for RestApiServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
