//! Modelo de Job
//!
//! Un trabajo es el ciclo completo de lavado de un vehículo: desde la
//! recepción hasta el archivo. Mapea a las tablas `jobs` y `job_status_history`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::car::{CarDetails, CustomerContact};
use crate::models::session::Actor;

/// Estado del trabajo - mapea al ENUM job_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queue,
    Washing,
    Processing,
    Drying,
    Completed,
}

impl JobStatus {
    /// Orden del tablero kanban
    pub const PIPELINE: [JobStatus; 5] = [
        JobStatus::Queue,
        JobStatus::Washing,
        JobStatus::Processing,
        JobStatus::Drying,
        JobStatus::Completed,
    ];

    /// Siguiente columna del tablero, si existe
    pub fn next(self) -> Option<JobStatus> {
        let idx = Self::PIPELINE.iter().position(|s| *s == self)?;
        Self::PIPELINE.get(idx + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queue => "queue",
            JobStatus::Washing => "washing",
            JobStatus::Processing => "processing",
            JobStatus::Drying => "drying",
            JobStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PIPELINE
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown job status '{}'", s))
    }
}

/// Estado registrado en el historial - incluye los pseudo estados de asignación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "job_history_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Queue,
    Washing,
    Processing,
    Drying,
    Completed,
    Claimed,
    Reassigned,
}

impl From<JobStatus> for HistoryStatus {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Queue => HistoryStatus::Queue,
            JobStatus::Washing => HistoryStatus::Washing,
            JobStatus::Processing => HistoryStatus::Processing,
            JobStatus::Drying => HistoryStatus::Drying,
            JobStatus::Completed => HistoryStatus::Completed,
        }
    }
}

/// Estado de pago - mapea al ENUM payment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Job principal - mapea exactamente a la tabla jobs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub plate_number: String,
    pub package_id: Uuid,
    pub status: JobStatus,
    pub payment_status: PaymentStatus,
    pub price: i64,
    pub currency: String,
    pub car_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_to == Some(user_id)
    }
}

/// Entrada del historial de estados (solo inserción)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobStatusHistory {
    pub id: Uuid,
    pub job_id: Uuid,
    pub branch_id: Uuid,
    pub from_status: Option<HistoryStatus>,
    pub to_status: HistoryStatus,
    pub actor_user_id: Uuid,
    pub actor_email: String,
    pub created_at: DateTime<Utc>,
}

/// Recepción lista para persistir: vehículo, cliente y trabajo nuevo
/// (siempre entra en `queue` y `pending`). Con `appointment_id` la cita
/// queda enlazada en la misma escritura.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub branch_id: Uuid,
    pub plate_number: String,
    pub package_id: Uuid,
    pub vehicle_class_id: Uuid,
    pub car: CarDetails,
    pub contact: Option<CustomerContact>,
    pub price: i64,
    pub currency: String,
    pub appointment_id: Option<Uuid>,
}

/// Cambio de estado ya validado, listo para persistir junto a su historial
#[derive(Debug, Clone)]
pub struct JobTransition {
    pub job_id: Uuid,
    pub branch_id: Uuid,
    pub from: JobStatus,
    pub to: JobStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub actor: Actor,
    pub at: DateTime<Utc>,
}

/// Asignación de un trabajo (reclamo o reasignación)
#[derive(Debug, Clone)]
pub struct JobAssignment {
    pub job_id: Uuid,
    pub branch_id: Uuid,
    pub assignee: Uuid,
    pub actor: Actor,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_next() {
        assert_eq!(JobStatus::Queue.next(), Some(JobStatus::Washing));
        assert_eq!(JobStatus::Drying.next(), Some(JobStatus::Completed));
        assert_eq!(JobStatus::Completed.next(), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("processing".parse::<JobStatus>().unwrap(), JobStatus::Processing);
        assert!("claimed".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&JobStatus::Drying).unwrap(), "\"drying\"");
        assert_eq!(
            serde_json::to_string(&HistoryStatus::Reassigned).unwrap(),
            "\"reassigned\""
        );
    }
}
