use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::job_controller::JobController;
use crate::dto::job_dto::{
    ChangeStatusRequest, CreateJobRequest, JobHistoryQuery, PaymentResponse, ReassignRequest,
    RecordPaymentRequest,
};
use crate::dto::ApiResponse;
use crate::models::job::Job;
use crate::models::session::SessionContext;
use crate::services::job_service::{IntakeOutcome, JobDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_job_router() -> Router<AppState> {
    Router::new()
        .route("/", get(active_board).post(create_job))
        .route("/history", get(archived_jobs))
        .route("/:id", get(job_detail))
        .route("/:id/status", post(change_status))
        .route("/:id/claim", post(claim_job))
        .route("/:id/reassign", post(reassign_job))
        .route("/:id/payments", post(record_payment))
        .route("/:id/archive", post(archive_job))
}

async fn create_job(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<ApiResponse<IntakeOutcome>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.create(&session, request).await?;
    Ok(Json(response))
}

async fn active_board(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ApiResponse<Vec<Job>>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.board(&session).await?;
    Ok(Json(response))
}

async fn archived_jobs(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<JobHistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Job>>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.history(&session, query).await?;
    Ok(Json(response))
}

async fn job_detail(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobDetail>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.detail(&session, id).await?;
    Ok(Json(response))
}

async fn change_status(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.change_status(&session, id, request).await?;
    Ok(Json(response))
}

async fn claim_job(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.claim(&session, id).await?;
    Ok(Json(response))
}

async fn reassign_job(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReassignRequest>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.reassign(&session, id, request).await?;
    Ok(Json(response))
}

async fn record_payment(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<Json<ApiResponse<PaymentResponse>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.record_payment(&session, id, request).await?;
    Ok(Json(response))
}

async fn archive_job(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Job>>, AppError> {
    let controller = JobController::new(state.jobs.clone());
    let response = controller.archive(&session, id).await?;
    Ok(Json(response))
}
