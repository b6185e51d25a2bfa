//! Modelo de Branch
//!
//! La sucursal es el límite de tenant: casi todos los datos operativos
//! pertenecen exactamente a una.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Branch - mapea a la tabla branches
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}
