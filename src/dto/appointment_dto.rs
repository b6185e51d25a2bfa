use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::appointment::Appointment;
use crate::models::job::Job;
use crate::models::pricing::PriceResolution;
use crate::services::appointment_service::AppointmentRequest;
use crate::utils::validation::{validate_not_blank, validate_phone};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    #[validate(length(max = 120), custom = "validate_not_blank")]
    pub customer_name: String,

    #[validate(custom = "validate_phone")]
    pub customer_phone: Option<String>,

    #[validate(length(max = 20))]
    pub plate_number: Option<String>,

    pub scheduled_time: DateTime<Utc>,

    pub package_id: Uuid,

    pub vehicle_class_id: Option<Uuid>,

    #[serde(default)]
    pub is_valet: bool,

    #[validate(length(max = 300))]
    pub valet_address: Option<String>,
}

impl From<CreateAppointmentRequest> for AppointmentRequest {
    fn from(request: CreateAppointmentRequest) -> Self {
        AppointmentRequest {
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            plate_number: request.plate_number,
            scheduled_time: request.scheduled_time,
            package_id: request.package_id,
            vehicle_class_id: request.vehicle_class_id,
            is_valet: request.is_valet,
            valet_address: request.valet_address,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConvertAppointmentRequest {
    pub vehicle_class_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub appointment: Appointment,
    pub job: Job,
    pub price: Option<PriceResolution>,
}
