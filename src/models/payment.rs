//! Modelo de Payment
//!
//! Los pagos son registros inmutables; mapean a la tabla `payments`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Método de pago - mapea al ENUM payment_method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub branch_id: Uuid,
    pub amount: i64,
    pub method: PaymentMethod,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub job_id: Uuid,
    pub branch_id: Uuid,
    pub amount: i64,
    pub method: PaymentMethod,
    pub recorded_by: Uuid,
}
