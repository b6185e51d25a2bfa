use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::catalog_controller::CatalogController;
use crate::dto::catalog_dto::CatalogOverrideRequest;
use crate::dto::ApiResponse;
use crate::models::catalog::{CatalogKind, EffectiveCatalogItem};
use crate::models::session::SessionContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route("/services/:id/override", put(override_service))
        .route("/packages", get(list_packages))
        .route("/packages/:id/override", put(override_package))
}

type CatalogResponse = Result<Json<ApiResponse<Vec<EffectiveCatalogItem>>>, AppError>;
type OverrideResponse = Result<Json<ApiResponse<EffectiveCatalogItem>>, AppError>;

async fn list_services(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> CatalogResponse {
    list(state, session, CatalogKind::Service).await
}

async fn list_packages(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> CatalogResponse {
    list(state, session, CatalogKind::Package).await
}

async fn override_service(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<CatalogOverrideRequest>,
) -> OverrideResponse {
    set_override(state, session, CatalogKind::Service, id, request).await
}

async fn override_package(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<CatalogOverrideRequest>,
) -> OverrideResponse {
    set_override(state, session, CatalogKind::Package, id, request).await
}

async fn list(state: AppState, session: SessionContext, kind: CatalogKind) -> CatalogResponse {
    let controller = CatalogController::new(state.catalog.clone());
    let response = controller.list(&session, kind).await?;
    Ok(Json(response))
}

async fn set_override(
    state: AppState,
    session: SessionContext,
    kind: CatalogKind,
    id: Uuid,
    request: CatalogOverrideRequest,
) -> OverrideResponse {
    let controller = CatalogController::new(state.catalog.clone());
    let response = controller.set_override(&session, kind, id, request).await?;
    Ok(Json(response))
}
