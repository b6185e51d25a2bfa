use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::car::CarDetails;
use crate::models::job::{Job, JobStatus};
use crate::models::payment::{Payment, PaymentMethod};
use crate::services::job_service::JobIntake;
use crate::utils::validation::{non_blank, validate_not_blank, validate_phone};

/// Request de recepción de un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(max = 20), custom = "validate_not_blank")]
    pub plate_number: String,

    pub package_id: Uuid,

    pub vehicle_class_id: Uuid,

    #[validate(custom = "validate_phone")]
    pub phone: Option<String>,

    #[validate(length(max = 120))]
    pub customer_name: Option<String>,

    #[validate(length(max = 60))]
    pub make: Option<String>,

    #[validate(length(max = 60))]
    pub model: Option<String>,

    #[validate(length(max = 40))]
    pub color: Option<String>,

    pub has_damage: Option<bool>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,

    #[validate(range(min = 0))]
    pub manual_price: Option<i64>,
}

impl From<CreateJobRequest> for JobIntake {
    fn from(request: CreateJobRequest) -> Self {
        JobIntake {
            plate_number: request.plate_number,
            package_id: request.package_id,
            vehicle_class_id: request.vehicle_class_id,
            phone: request.phone,
            customer_name: request.customer_name,
            car: CarDetails {
                make: non_blank(request.make.as_deref()),
                model: non_blank(request.model.as_deref()),
                color: non_blank(request.color.as_deref()),
                notes: non_blank(request.notes.as_deref()),
                has_damage: request.has_damage,
            },
            manual_price: request.manual_price,
            appointment_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: JobStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub assignee_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[validate(range(min = 1))]
    pub amount: i64,
    pub method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub payment: Payment,
    pub job: Job,
}

#[derive(Debug, Deserialize, Validate)]
pub struct JobHistoryQuery {
    #[validate(length(max = 20))]
    pub search: Option<String>,

    #[validate(range(min = 1, max = 200))]
    pub limit: Option<i64>,
}
