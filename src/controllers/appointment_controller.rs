use uuid::Uuid;
use validator::Validate;

use crate::dto::appointment_dto::{
    ConversionResponse, ConvertAppointmentRequest, CreateAppointmentRequest,
};
use crate::dto::ApiResponse;
use crate::models::appointment::Appointment;
use crate::models::session::SessionContext;
use crate::services::appointment_service::{
    AppointmentService, ConversionOutcome, LINKED_TO_EXISTING,
};
use crate::utils::errors::AppError;

pub struct AppointmentController {
    service: AppointmentService,
}

impl AppointmentController {
    pub fn new(service: AppointmentService) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        session: &SessionContext,
        request: CreateAppointmentRequest,
    ) -> Result<ApiResponse<Appointment>, AppError> {
        request.validate()?;

        let appointment = self.service.create(session, request.into()).await?;
        Ok(ApiResponse::success(appointment))
    }

    pub async fn list(
        &self,
        session: &SessionContext,
    ) -> Result<ApiResponse<Vec<Appointment>>, AppError> {
        let appointments = self.service.list(session).await?;
        Ok(ApiResponse::success(appointments))
    }

    pub async fn convert(
        &self,
        session: &SessionContext,
        appointment_id: Uuid,
        request: ConvertAppointmentRequest,
    ) -> Result<ApiResponse<ConversionResponse>, AppError> {
        let outcome = self
            .service
            .convert(session, appointment_id, request.vehicle_class_id)
            .await?;

        match outcome {
            ConversionOutcome::Converted {
                appointment,
                intake,
            } => Ok(ApiResponse::success(ConversionResponse {
                appointment,
                job: intake.job,
                price: Some(intake.price),
            })),
            ConversionOutcome::LinkedExisting { appointment, job } => {
                Ok(ApiResponse::success_with_message(
                    ConversionResponse {
                        appointment,
                        job,
                        price: None,
                    },
                    LINKED_TO_EXISTING,
                ))
            }
        }
    }
}
