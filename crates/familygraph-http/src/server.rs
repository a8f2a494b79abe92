//! Router construction and the server loop

use crate::error::ApiError;
use crate::handlers;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use familygraph_core::{KinshipEngine, KinshipStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (1MB)
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared handler state
pub struct AppState<S> {
    pub engine: KinshipEngine<S>,
    auth_token: Option<String>,
}

impl<S: KinshipStore> AppState<S> {
    pub fn new(engine: KinshipEngine<S>, auth_token: Option<String>) -> Self {
        Self { engine, auth_token }
    }
}

/// Bearer token guard. Without a configured token every request passes.
async fn auth_middleware<S: KinshipStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let Some(expected_token) = &state.auth_token else {
        return next.run(request).await;
    };

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected_token => next.run(request).await,
        _ => ApiError::Unauthorized.into_response(),
    }
}

/// Create the API router
pub fn create_router<S: KinshipStore + 'static>(
    engine: KinshipEngine<S>,
    auth_token: Option<String>,
) -> Router {
    let state = Arc::new(AppState::new(engine, auth_token));

    // Only local front-ends may call the API from a browser
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/v1/family",
            get(handlers::list_families::<S>).post(handlers::create_family::<S>),
        )
        .route(
            "/api/v1/family/:id",
            get(handlers::get_family::<S>).delete(handlers::delete_family::<S>),
        )
        .route(
            "/api/v1/person",
            get(handlers::list_persons::<S>).post(handlers::create_person::<S>),
        )
        .route(
            "/api/v1/person/:id",
            get(handlers::get_person::<S>).delete(handlers::delete_person::<S>),
        )
        .route("/api/v1/relationship", post(handlers::create_relationship::<S>))
        .route("/api/v1/relationship/title", get(handlers::compute_title::<S>))
        .route("/api/v1/relationship/graph", get(handlers::get_graph::<S>))
        .route(
            "/api/v1/relationship/:id",
            axum::routing::delete(handlers::delete_relationship::<S>),
        )
        .route(
            "/api/v1/titlemap",
            get(handlers::list_title_maps::<S>).post(handlers::create_title_map::<S>),
        )
        .route(
            "/api/v1/titlemap/:id",
            get(handlers::get_title_map::<S>)
                .put(handlers::update_title_map::<S>)
                .delete(handlers::delete_title_map::<S>),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ))
        .with_state(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until Ctrl-C
pub async fn serve<S: KinshipStore + 'static>(
    engine: KinshipEngine<S>,
    addr: &str,
    auth_token: Option<String>,
) -> anyhow::Result<()> {
    if auth_token.is_none() {
        tracing::warn!("No API token configured; every request is accepted");
    }
    let router = create_router(engine, auth_token);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("FamilyGraph API listening on http://{}", listener.local_addr()?);
    tracing::info!("  Health check: http://{}/health", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    tracing::info!("FamilyGraph API stopped");
    Ok(())
}
