use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::pricing_controller::PricingController;
use crate::dto::pricing_dto::{
    PriceListRequest, PriceRuleRequest, ResolvePriceQuery, VehicleClassRequest,
};
use crate::dto::ApiResponse;
use crate::models::pricing::{PriceList, PriceResolution, PriceRule, VehicleClass};
use crate::models::session::SessionContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `/api/pricing`
pub fn create_pricing_router() -> Router<AppState> {
    Router::new().route("/resolve", get(resolve_price))
}

/// `/api/admin`
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/price-lists", get(list_price_lists).post(save_price_list))
        .route("/price-lists/:id/rules", get(list_rules).post(save_rule))
        .route("/price-rules/:id", delete(delete_rule))
        .route(
            "/vehicle-classes",
            get(list_vehicle_classes).post(save_vehicle_class),
        )
}

fn controller(state: &AppState) -> PricingController {
    PricingController::new(state.resolver.clone(), state.pricing_admin.clone())
}

async fn resolve_price(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ResolvePriceQuery>,
) -> Result<Json<ApiResponse<PriceResolution>>, AppError> {
    let response = controller(&state).resolve(&session, query).await?;
    Ok(Json(response))
}

async fn list_price_lists(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ApiResponse<Vec<PriceList>>>, AppError> {
    let response = controller(&state).list_price_lists(&session).await?;
    Ok(Json(response))
}

async fn save_price_list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<PriceListRequest>,
) -> Result<Json<ApiResponse<PriceList>>, AppError> {
    let response = controller(&state).save_price_list(&session, request).await?;
    Ok(Json(response))
}

async fn list_rules(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<PriceRule>>>, AppError> {
    let response = controller(&state).list_rules(&session, id).await?;
    Ok(Json(response))
}

async fn save_rule(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<PriceRuleRequest>,
) -> Result<Json<ApiResponse<PriceRule>>, AppError> {
    let response = controller(&state).save_rule(&session, id, request).await?;
    Ok(Json(response))
}

async fn delete_rule(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Uuid>>, AppError> {
    let response = controller(&state).delete_rule(&session, id).await?;
    Ok(Json(response))
}

async fn list_vehicle_classes(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ApiResponse<Vec<VehicleClass>>>, AppError> {
    let response = controller(&state).list_vehicle_classes(&session).await?;
    Ok(Json(response))
}

async fn save_vehicle_class(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<VehicleClassRequest>,
) -> Result<Json<ApiResponse<VehicleClass>>, AppError> {
    let response = controller(&state).save_vehicle_class(&session, request).await?;
    Ok(Json(response))
}
