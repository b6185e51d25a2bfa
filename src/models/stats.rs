//! Modelos de estadísticas de sucursal y del personal

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::PaymentStatus;
use crate::models::staff::StaffRole;

/// Periodo predefinido de los reportes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StatsPeriod {
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "thisWeek")]
    ThisWeek,
    #[serde(rename = "thisMonth")]
    #[default]
    ThisMonth,
    #[serde(rename = "lastMonth")]
    LastMonth,
    #[serde(rename = "all")]
    All,
    #[serde(rename = "custom")]
    Custom,
}

/// Rango de fechas inclusivo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Trabajo archivado con los datos que necesitan los agregados
#[derive(Debug, Clone, FromRow)]
pub struct ClosedJobFact {
    pub price: i64,
    pub payment_status: PaymentStatus,
    pub make: Option<String>,
    pub package_name: Option<String>,
    pub vehicle_class_label: Option<String>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountBucket {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchStats {
    pub range: DateRange,
    pub total_jobs: i64,
    pub revenue: i64,
    pub pending_revenue: i64,
    pub average_job_value: Decimal,
    pub by_make: Vec<CountBucket>,
    pub by_package: Vec<CountBucket>,
    pub by_vehicle_class: Vec<CountBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStat {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: StaffRole,
    pub claimed: i64,
    pub completed: i64,
    pub completion_rate: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub range: DateRange,
    pub workers: Vec<WorkerStat>,
}
