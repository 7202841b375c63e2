use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use std::sync::Arc;

use crate::reconciliations;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Knobs of the HTTP layer that do not belong to the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    /// Answer cross-origin requests from any origin (browser clients).
    pub permissive_cors: bool,
}

/// Build the API router. Every route lives under `/api`.
pub fn router(engine: Arc<Engine>, options: ServerOptions) -> Router {
    let state = ServerState { engine };

    let app = Router::new()
        .route("/api", get(reconciliations::root))
        .route("/api/", get(reconciliations::root))
        .route(
            "/api/arqueo",
            post(reconciliations::create).get(reconciliations::list),
        )
        .route("/api/arqueo/{id}", get(reconciliations::get))
        .route(
            "/api/arqueo/{id}/pdf",
            post(reconciliations::pdf_base64).get(reconciliations::pdf_download),
        )
        .with_state(state);

    if options.permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
    options: ServerOptions,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(
        "Server listening on {} (exchange rate {})",
        addr,
        engine.exchange_rate()
    );

    axum::serve(listener, router(Arc::new(engine), options)).await
}
