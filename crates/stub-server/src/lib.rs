//! # RX Stub
//!
//! In-memory backend speaking the prescription HTTP API.
//!
//! Handles:
//! - `POST api/v1/auth/login` for a single configured account
//! - The prescription routes, refusing requests without a token it issued
//! - Server lifecycle for tests ([`spawn`]) and the `rx-stub` binary
//!
//! Nothing is persisted; restarting the server forgets every record and token.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod handlers;
pub mod state;

pub use state::{StubConfig, StubState, DEFAULT_STUB_EMAIL, DEFAULT_STUB_PASSWORD};

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;

/// Build the full router over `state`.
pub fn router(state: StubState) -> Router {
    let api = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/prescriptions", get(handlers::list_prescriptions))
        .route("/prescriptions/medicines", get(handlers::medicines))
        .route("/prescriptions/patient/mock", get(handlers::mock_patient))
        .route("/prescriptions/issue", post(handlers::issue_prescription))
        .route("/prescriptions/:id/status", get(handlers::prescription_status));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handle to a server running in a background task. Dropping it stops the server.
#[derive(Debug)]
pub struct StubServer {
    addr: SocketAddr,
    state: StubState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl StubServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Backend URI to hand to the client, e.g. `http://127.0.0.1:41234/`.
    pub fn base_uri(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// The records behind the running server.
    pub fn state(&self) -> &StubState {
        &self.state
    }

    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start a server on an ephemeral localhost port.
pub async fn spawn(config: StubConfig) -> std::io::Result<StubServer> {
    spawn_on(SocketAddr::from(([127, 0, 0, 1], 0)), StubState::new(config)).await
}

/// Start a server on `addr` in a background task.
pub async fn spawn_on(addr: SocketAddr, state: StubState) -> std::io::Result<StubServer> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = router(state.clone());
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };
        tracing::info!("stub backend listening on {}", addr);
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("stub backend error: {}", e);
        }
        tracing::info!("stub backend on {} stopped", addr);
    });

    Ok(StubServer {
        addr,
        state,
        shutdown_tx: Some(shutdown_tx),
    })
}
