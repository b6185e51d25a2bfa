//! Contexto de sesión por request
//!
//! La identidad, el rol y la sucursal del usuario se derivan en cada request
//! y se pasan explícitamente a cada regla de negocio.

use serde::Serialize;
use uuid::Uuid;

use crate::models::staff::StaffRole;
use crate::utils::errors::{forbidden_error, validation_error, AppError, AppResult};

/// Identidad que queda registrada en el historial
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: String,
}

/// Contexto de sesión resuelto por el middleware de autenticación
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: StaffRole,
    pub branch_id: Option<Uuid>,
}

impl SessionContext {
    pub fn is_cross_branch(&self) -> bool {
        self.role.is_cross_branch()
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            email: self.email.clone(),
        }
    }

    /// Sucursal de trabajo; obligatoria para cualquier operación sobre datos operativos
    pub fn require_branch(&self) -> AppResult<Uuid> {
        self.branch_id
            .ok_or_else(|| validation_error("branch_id", "branch context is required"))
    }

    /// Exige un rol con permisos de gestión de trabajos y administración
    pub fn require_job_manager(&self, operation: &str) -> AppResult<()> {
        if self.role.can_manage_jobs() {
            Ok(())
        } else {
            Err(forbidden_error(operation, "requires super_admin, branch_admin or manager role"))
        }
    }

    /// Los socios solo consultan; el resto del personal opera trabajos
    pub fn require_operator(&self, operation: &str) -> AppResult<()> {
        if self.role == StaffRole::Partner {
            Err(forbidden_error(operation, "partners have read-only access"))
        } else {
            Ok(())
        }
    }

    /// Exige acceso a reportes
    pub fn require_reports(&self) -> Result<(), AppError> {
        if self.role.can_view_reports() {
            Ok(())
        } else {
            Err(forbidden_error("view statistics", "requires an administrative role"))
        }
    }
}
