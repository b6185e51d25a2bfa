//! Modelo de Staff
//!
//! Perfiles del personal y sus roles. Mapea a la tabla `staff_profiles`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del personal - mapea al ENUM staff_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "staff_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    SuperAdmin,
    Partner,
    BranchAdmin,
    Manager,
    Staff,
}

impl StaffRole {
    /// Roles que operan sobre todas las sucursales
    pub fn is_cross_branch(self) -> bool {
        matches!(self, StaffRole::SuperAdmin | StaffRole::Partner)
    }

    /// Roles que pueden mover, reasignar y administrar cualquier trabajo
    pub fn can_manage_jobs(self) -> bool {
        matches!(
            self,
            StaffRole::SuperAdmin | StaffRole::BranchAdmin | StaffRole::Manager
        )
    }

    /// Roles con acceso a estadísticas
    pub fn can_view_reports(self) -> bool {
        self.can_manage_jobs() || self == StaffRole::Partner
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StaffRole::SuperAdmin => "super_admin",
            StaffRole::Partner => "partner",
            StaffRole::BranchAdmin => "branch_admin",
            StaffRole::Manager => "manager",
            StaffRole::Staff => "staff",
        }
    }
}

/// Perfil del personal - mapea a la tabla staff_profiles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: StaffRole,
    pub branch_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
