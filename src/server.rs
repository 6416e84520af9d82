//! # Event Ingress Server
//!
//! This module defines the `NotificationServer`, the `axum`-based host layer
//! that receives job status-change events over HTTP and hands them to the
//! `NotificationHandler`.
//!
//! The server owns the error reporting policy: the handler itself catches
//! nothing, so a malformed event maps to `400 Bad Request` and a failed
//! publish to `500 Internal Server Error`. When metrics are enabled the
//! server also exposes `/metrics` in the Prometheus exposition format.
//!
//! The server is designed for graceful shutdown, listening to a signal from
//! the main application to stop serving requests and terminate cleanly.

use crate::handler::{HandlerError, NotificationHandler};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, trace, warn};

/// The HTTP host layer around the notification handler.
pub struct NotificationServer {
    listener: TcpListener,
    handler: Arc<NotificationHandler>,
    prom_handle: Option<PrometheusHandle>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NotificationServer {
    /// Creates a new `NotificationServer` but does not spawn it.
    ///
    /// # Arguments
    ///
    /// * `listener` - A `TcpListener` that has already been bound to an address.
    /// * `handler` - The handler every inbound event is dispatched to.
    /// * `prom_handle` - Renders `/metrics` when metrics are enabled.
    /// * `shutdown_rx` - A watch channel receiver for graceful shutdown.
    pub fn new(
        listener: TcpListener,
        handler: Arc<NotificationHandler>,
        prom_handle: Option<PrometheusHandle>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            listener,
            handler,
            prom_handle,
            shutdown_rx,
        }
    }

    /// Returns a future that runs the server until a shutdown signal is received.
    pub fn run(self) -> impl Future<Output = ()> {
        let NotificationServer {
            listener,
            handler,
            prom_handle,
            mut shutdown_rx,
        } = self;

        let mut app = Router::new()
            .route("/events", post(handle_event))
            .with_state(handler);
        if let Some(handle) = prom_handle {
            app = app.route("/metrics", get(move || async move { handle.render() }));
        }

        async move {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    trace!("Ingress server received shutdown signal via select.");
                }
                result = axum::serve(listener, app.into_make_service()) => {
                    if let Err(e) = result {
                        error!("Ingress server error: {}", e);
                    }
                }
            }
            trace!("Ingress server task finished.");
        }
    }
}

/// Feeds one inbound event payload through the handler and maps its error
/// taxonomy onto HTTP statuses.
async fn handle_event(
    State(handler): State<Arc<NotificationHandler>>,
    Json(payload): Json<Value>,
) -> Response {
    match handler.handle_value(payload).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err @ HandlerError::InvalidEvent(_)) => {
            warn!(error = %err, "Rejected malformed event");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to deliver notification");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
