//! Rutas HTTP
//!
//! Todo cuelga de `/api` detrás del middleware de sesión, salvo `/health`.

pub mod appointment_routes;
pub mod catalog_routes;
pub mod job_routes;
pub mod pricing_routes;
pub mod stats_routes;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::dto::ApiResponse;
use crate::middleware::{cors_layer, session_middleware};
use crate::models::session::SessionContext;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/session", get(current_session))
        .nest("/pricing", pricing_routes::create_pricing_router())
        .nest("/jobs", job_routes::create_job_router())
        .nest("/catalog", catalog_routes::create_catalog_router())
        .nest("/appointments", appointment_routes::create_appointment_router())
        .nest("/stats", stats_routes::create_stats_router())
        .nest("/admin", pricing_routes::create_admin_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn current_session(
    Extension(session): Extension<SessionContext>,
) -> Json<ApiResponse<SessionContext>> {
    Json(ApiResponse::success(session))
}
