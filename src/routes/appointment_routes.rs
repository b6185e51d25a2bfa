use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::appointment_controller::AppointmentController;
use crate::dto::appointment_dto::{
    ConversionResponse, ConvertAppointmentRequest, CreateAppointmentRequest,
};
use crate::dto::ApiResponse;
use crate::models::appointment::Appointment;
use crate::models::session::SessionContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/:id/convert", post(convert_appointment))
}

async fn create_appointment(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let controller = AppointmentController::new(state.appointments.clone());
    let response = controller.create(&session, request).await?;
    Ok(Json(response))
}

async fn list_appointments(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ApiResponse<Vec<Appointment>>>, AppError> {
    let controller = AppointmentController::new(state.appointments.clone());
    let response = controller.list(&session).await?;
    Ok(Json(response))
}

/// El cuerpo es opcional: solo aporta la clase de vehículo si la cita no la tiene
async fn convert_appointment(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<Uuid>,
    request: Option<Json<ConvertAppointmentRequest>>,
) -> Result<Json<ApiResponse<ConversionResponse>>, AppError> {
    let request = request.map(|Json(body)| body).unwrap_or_default();

    let controller = AppointmentController::new(state.appointments.clone());
    let response = controller.convert(&session, id, request).await?;
    Ok(Json(response))
}
