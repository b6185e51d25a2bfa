use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::stats_controller::StatsController;
use crate::dto::stats_dto::StatsQuery;
use crate::dto::ApiResponse;
use crate::models::session::SessionContext;
use crate::models::stats::{BranchStats, WorkerStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_stats_router() -> Router<AppState> {
    Router::new()
        .route("/branch", get(branch_stats))
        .route("/workers", get(worker_stats))
}

async fn branch_stats(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<BranchStats>>, AppError> {
    let controller = StatsController::new(state.stats.clone());
    let response = controller.branch(&session, query).await?;
    Ok(Json(response))
}

async fn worker_stats(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ApiResponse<WorkerStats>>, AppError> {
    let controller = StatsController::new(state.stats.clone());
    let response = controller.workers(&session, query).await?;
    Ok(Json(response))
}
