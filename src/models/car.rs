//! Modelos de Car y Customer
//!
//! Se crean perezosamente en la primera recepción de una matrícula o teléfono
//! y no se eliminan nunca desde estas reglas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehículo identificado por matrícula dentro de una sucursal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub plate_number: String,
    pub vehicle_class_id: Uuid,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub has_damage: bool,
    pub created_at: DateTime<Utc>,
}

/// Datos opcionales del vehículo capturados en la recepción
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarDetails {
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub has_damage: Option<bool>,
}

/// Teléfono y nombre informados en la recepción
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
    pub phone: String,
    pub name: Option<String>,
}

/// Cliente identificado por teléfono dentro de una sucursal
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}
