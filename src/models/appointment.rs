//! Modelo de Appointment
//!
//! Citas reservadas que más tarde se convierten en trabajos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la cita - mapea al ENUM appointment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub plate_number: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub package_id: Uuid,
    pub vehicle_class_id: Option<Uuid>,
    pub status: AppointmentStatus,
    pub converted_job_id: Option<Uuid>,
    pub is_valet: bool,
    pub valet_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub branch_id: Uuid,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub plate_number: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub package_id: Uuid,
    pub vehicle_class_id: Option<Uuid>,
    pub is_valet: bool,
    pub valet_address: Option<String>,
}
