//! Reglas del ciclo de vida de un trabajo
//!
//! Tabla de transiciones configurable, permisos para mover un trabajo y los
//! efectos de cada transición sobre las marcas de tiempo.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::job::{Job, JobStatus, JobTransition};
use crate::models::session::SessionContext;
use crate::models::staff::StaffRole;
use crate::utils::errors::{forbidden_error, validation_error, AppResult};

/// Tabla de transiciones permitidas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Cualquier estado hacia cualquier otro
    Permissive,
    /// Solo un paso hacia delante en el tablero
    Linear,
}

impl TransitionPolicy {
    pub fn permissive() -> Self {
        TransitionPolicy::Permissive
    }

    pub fn linear() -> Self {
        TransitionPolicy::Linear
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "permissive" => Some(TransitionPolicy::Permissive),
            "linear" => Some(TransitionPolicy::Linear),
            _ => None,
        }
    }

    /// Nunca permite quedarse en el mismo estado
    pub fn allows(self, from: JobStatus, to: JobStatus) -> bool {
        if from == to {
            return false;
        }

        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Linear => from.next() == Some(to),
        }
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        TransitionPolicy::permissive()
    }
}

/// Gestores mueven cualquier trabajo; el personal solo los suyos.
pub fn authorize_transition(session: &SessionContext, job: &Job) -> AppResult<()> {
    if session.role.can_manage_jobs() {
        return Ok(());
    }

    if session.role == StaffRole::Staff && job.is_assigned_to(session.user_id) {
        return Ok(());
    }

    Err(forbidden_error(
        "change job status",
        "staff can only move jobs assigned to them",
    ))
}

/// Valida la transición y calcula sus efectos
pub fn plan_transition(
    policy: TransitionPolicy,
    session: &SessionContext,
    job: &Job,
    to: JobStatus,
    at: DateTime<Utc>,
) -> AppResult<JobTransition> {
    if !job.is_open() {
        return Err(validation_error("status", "archived jobs cannot change status"));
    }

    if job.status == to {
        return Err(validation_error("status", "job is already in that status"));
    }

    if !policy.allows(job.status, to) {
        return Err(validation_error("status", "this status transition is not allowed"));
    }

    // Solo al salir de la cola y una única vez
    let started_at = (job.status == JobStatus::Queue
        && to == JobStatus::Washing
        && job.started_at.is_none())
    .then_some(at);
    let completed_at = (to == JobStatus::Completed).then_some(at);

    Ok(JobTransition {
        job_id: job.id,
        branch_id: job.branch_id,
        from: job.status,
        to,
        started_at,
        completed_at,
        actor: session.actor(),
        at,
    })
}
