//! Servicio de trabajos
//!
//! Recepción, cambios de estado, reclamo, reasignación, pagos, archivo y
//! las consultas del tablero. Cada operación recibe el contexto de sesión.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::car::{CarDetails, CustomerContact};
use crate::models::job::{Job, JobAssignment, JobStatus, JobStatusHistory, NewJob, PaymentStatus};
use crate::models::payment::{NewPayment, Payment, PaymentMethod};
use crate::models::pricing::PriceResolution;
use crate::models::session::SessionContext;
use crate::repositories::{JobStore, StaffStore};
use crate::services::job_lifecycle::{authorize_transition, plan_transition, TransitionPolicy};
use crate::services::price_resolver::PriceResolver;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult, StoreError};
use crate::utils::validation::{non_blank, normalize_plate};

pub const ACTIVE_JOB_EXISTS: &str = "an active job already exists for this plate";
pub const STALE_JOB: &str = "job was modified by someone else, reload and try again";
pub const CLAIM_REJECTED: &str = "job is already claimed or no longer queued";
pub const ARCHIVE_REQUIRES_PAYMENT: &str = "job must be paid before it can be archived";
pub const ARCHIVE_REQUIRES_COMPLETION: &str = "job must be completed before it can be archived";
pub const ALREADY_ARCHIVED: &str = "job is already archived";
pub const APPOINTMENT_NOT_BOOKED: &str = "appointment was already converted or cancelled";

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const MAX_HISTORY_LIMIT: i64 = 200;

/// Datos de recepción de un vehículo
#[derive(Debug, Clone)]
pub struct JobIntake {
    pub plate_number: String,
    pub package_id: Uuid,
    pub vehicle_class_id: Uuid,
    pub phone: Option<String>,
    pub customer_name: Option<String>,
    pub car: CarDetails,
    pub manual_price: Option<i64>,
    /// Cita que se enlaza al trabajo en la misma escritura
    pub appointment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub job: Job,
    pub price: PriceResolution,
}

#[derive(Debug, Clone)]
pub enum ClaimOutcome {
    Claimed(Job),
    Rejected,
}

#[derive(Debug, Clone)]
pub enum ArchiveOutcome {
    Archived(Job),
    NotPaid,
    NotCompleted,
    AlreadyArchived,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub job: Job,
    pub history: Vec<JobStatusHistory>,
}

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobStore>,
    staff: Arc<dyn StaffStore>,
    resolver: PriceResolver,
    policy: TransitionPolicy,
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        staff: Arc<dyn StaffStore>,
        resolver: PriceResolver,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            jobs,
            staff,
            resolver,
            policy,
        }
    }

    /// Recepción: vehículo, cliente, precio congelado y trabajo en cola
    pub async fn create_job(
        &self,
        session: &SessionContext,
        intake: JobIntake,
    ) -> AppResult<IntakeOutcome> {
        session.require_operator("create jobs")?;
        let branch_id = session.require_branch()?;

        let plate_number = normalize_plate(&intake.plate_number);
        if plate_number.is_empty() {
            return Err(validation_error("plate_number", "plate number is required"));
        }
        if intake.manual_price.is_some_and(|price| price < 0) {
            return Err(validation_error("manual_price", "manual price must not be negative"));
        }

        let price = self
            .resolver
            .resolve(
                branch_id,
                intake.package_id,
                intake.vehicle_class_id,
                Utc::now().date_naive(),
            )
            .await?;

        let amount = if price.found {
            price.amount
        } else {
            intake.manual_price.unwrap_or(0)
        };

        let contact = non_blank(intake.phone.as_deref()).map(|phone| CustomerContact {
            phone,
            name: non_blank(intake.customer_name.as_deref()),
        });

        let new_job = NewJob {
            branch_id,
            plate_number: plate_number.clone(),
            package_id: intake.package_id,
            vehicle_class_id: intake.vehicle_class_id,
            car: intake.car,
            contact,
            price: amount,
            currency: price.currency.clone(),
            appointment_id: intake.appointment_id,
        };

        let job = match self.jobs.create_intake(new_job).await {
            Ok(job) => job,
            Err(StoreError::Conflict) => {
                warn!("⚠️ Ya existe un trabajo abierto para {} en {}", plate_number, branch_id);
                return Err(AppError::Conflict(ACTIVE_JOB_EXISTS.to_string()));
            }
            Err(StoreError::NotFound) if intake.appointment_id.is_some() => {
                warn!("⚠️ La cita de {} ya no está reservada", plate_number);
                return Err(validation_error("appointment_id", APPOINTMENT_NOT_BOOKED));
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            "🚗 Trabajo {} creado para {} en la sucursal {} ({} {})",
            job.id, job.plate_number, branch_id, job.price, job.currency
        );

        Ok(IntakeOutcome { job, price })
    }

    pub async fn change_status(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        to: JobStatus,
    ) -> AppResult<Job> {
        let branch_id = session.require_branch()?;
        let job = self.load_job(branch_id, job_id).await?;

        authorize_transition(session, &job)?;
        let transition = plan_transition(self.policy, session, &job, to, Utc::now())?;
        let from = transition.from;

        match self.jobs.apply_transition(transition).await? {
            Some(updated) => {
                info!("🔄 Trabajo {}: {} → {} por {}", job_id, from, to, session.email);
                Ok(updated)
            }
            None => {
                warn!("⚠️ Trabajo {} modificado concurrentemente (esperado {})", job_id, from);
                Err(AppError::Conflict(STALE_JOB.to_string()))
            }
        }
    }

    /// Reclamo atómico de un trabajo en cola sin responsable
    pub async fn claim(&self, session: &SessionContext, job_id: Uuid) -> AppResult<ClaimOutcome> {
        session.require_operator("claim jobs")?;
        let branch_id = session.require_branch()?;

        let assignment = JobAssignment {
            job_id,
            branch_id,
            assignee: session.user_id,
            actor: session.actor(),
            at: Utc::now(),
        };

        match self.jobs.claim_job(assignment).await? {
            Some(job) => {
                info!("🙋 Trabajo {} reclamado por {}", job_id, session.email);
                Ok(ClaimOutcome::Claimed(job))
            }
            None => {
                self.load_job(branch_id, job_id).await?;
                warn!("⚠️ Reclamo rechazado para el trabajo {} ({})", job_id, session.email);
                Ok(ClaimOutcome::Rejected)
            }
        }
    }

    pub async fn reassign(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        assignee: Uuid,
    ) -> AppResult<Job> {
        session.require_job_manager("reassign jobs")?;
        let branch_id = session.require_branch()?;

        let target = self.staff.find_active_profile(assignee).await?;
        let eligible = target.is_some_and(|profile| {
            profile.branch_id == Some(branch_id) || profile.role.is_cross_branch()
        });
        if !eligible {
            return Err(validation_error(
                "assignee",
                "assignee must be an active staff member of this branch",
            ));
        }

        let assignment = JobAssignment {
            job_id,
            branch_id,
            assignee,
            actor: session.actor(),
            at: Utc::now(),
        };

        let job = self
            .jobs
            .reassign_job(assignment)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))?;

        info!("👥 Trabajo {} reasignado a {} por {}", job_id, assignee, session.email);
        Ok(job)
    }

    /// Registra el pago y marca el trabajo como pagado en una sola transacción
    pub async fn record_payment(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        amount: i64,
        method: PaymentMethod,
    ) -> AppResult<(Payment, Job)> {
        session.require_operator("record payments")?;
        let branch_id = session.require_branch()?;

        if amount <= 0 {
            return Err(validation_error("amount", "amount must be greater than zero"));
        }

        let payment = NewPayment {
            job_id,
            branch_id,
            amount,
            method,
            recorded_by: session.user_id,
        };

        match self.jobs.record_payment(payment).await? {
            Some((payment, job)) => {
                info!("💳 Pago de {} registrado para el trabajo {}", amount, job_id);
                Ok((payment, job))
            }
            None => {
                self.load_job(branch_id, job_id).await?;
                Err(validation_error("job_id", "archived jobs cannot take payments"))
            }
        }
    }

    pub async fn archive(&self, session: &SessionContext, job_id: Uuid) -> AppResult<ArchiveOutcome> {
        session.require_operator("archive jobs")?;
        let branch_id = session.require_branch()?;

        if let Some(job) = self.jobs.archive_job(branch_id, job_id, Utc::now()).await? {
            info!("📦 Trabajo {} archivado", job_id);
            return Ok(ArchiveOutcome::Archived(job));
        }

        let job = self.load_job(branch_id, job_id).await?;
        if !job.is_open() {
            return Ok(ArchiveOutcome::AlreadyArchived);
        }
        if job.payment_status != PaymentStatus::Paid {
            warn!("⚠️ El trabajo {} no está pagado y no se puede archivar", job_id);
            return Ok(ArchiveOutcome::NotPaid);
        }
        if job.status != JobStatus::Completed {
            warn!("⚠️ El trabajo {} sigue en {} y no se puede archivar", job_id, job.status);
            return Ok(ArchiveOutcome::NotCompleted);
        }

        warn!("⚠️ Trabajo {} modificado concurrentemente durante el archivo", job_id);
        Err(AppError::Conflict(STALE_JOB.to_string()))
    }

    /// Tablero: trabajos abiertos por orden de llegada
    pub async fn active_board(&self, session: &SessionContext) -> AppResult<Vec<Job>> {
        let branch_id = session.require_branch()?;
        Ok(self.jobs.list_open_jobs(branch_id).await?)
    }

    pub async fn archived(
        &self,
        session: &SessionContext,
        plate_search: Option<String>,
        limit: Option<i64>,
    ) -> AppResult<Vec<Job>> {
        let branch_id = session.require_branch()?;
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);
        let search = non_blank(plate_search.as_deref());

        Ok(self.jobs.list_archived_jobs(branch_id, search, limit).await?)
    }

    pub async fn detail(&self, session: &SessionContext, job_id: Uuid) -> AppResult<JobDetail> {
        let branch_id = session.require_branch()?;
        let job = self.load_job(branch_id, job_id).await?;
        let history = self.jobs.job_history(job_id).await?;

        Ok(JobDetail { job, history })
    }

    pub async fn find_open_job_by_plate(
        &self,
        branch_id: Uuid,
        plate_number: &str,
    ) -> AppResult<Option<Job>> {
        Ok(self
            .jobs
            .find_open_job_by_plate(branch_id, normalize_plate(plate_number))
            .await?)
    }

    async fn load_job(&self, branch_id: Uuid, job_id: Uuid) -> AppResult<Job> {
        self.jobs
            .find_job(branch_id, job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::HistoryStatus;
    use crate::models::staff::StaffRole;
    use crate::test_support::{session_for, MemoryStore};
    use futures::future::join_all;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: JobService,
        branch_id: Uuid,
        package_id: Uuid,
        vehicle_class_id: Uuid,
    }

    async fn fixture(policy: TransitionPolicy) -> Fixture {
        let store = MemoryStore::new();
        let branch_id = store.add_branch().await;
        let package_id = Uuid::new_v4();
        let vehicle_class_id = Uuid::new_v4();
        store
            .add_price(branch_id, package_id, vehicle_class_id, 35_000)
            .await;

        let resolver = PriceResolver::new(store.clone(), "TRY".to_string());
        let service = JobService::new(store.clone(), store.clone(), resolver, policy);

        Fixture {
            store,
            service,
            branch_id,
            package_id,
            vehicle_class_id,
        }
    }

    fn intake(f: &Fixture, plate: &str) -> JobIntake {
        JobIntake {
            plate_number: plate.to_string(),
            package_id: f.package_id,
            vehicle_class_id: f.vehicle_class_id,
            phone: None,
            customer_name: None,
            car: CarDetails::default(),
            manual_price: None,
            appointment_id: None,
        }
    }

    async fn manager(f: &Fixture) -> SessionContext {
        session_for(&f.store.add_staff(StaffRole::Manager, Some(f.branch_id)).await)
    }

    async fn worker(f: &Fixture) -> SessionContext {
        session_for(&f.store.add_staff(StaffRole::Staff, Some(f.branch_id)).await)
    }

    /// Completa, cobra y archiva
    async fn close_out(f: &Fixture, session: &SessionContext, job_id: Uuid) {
        f.service
            .change_status(session, job_id, JobStatus::Completed)
            .await
            .unwrap();
        f.service
            .record_payment(session, job_id, 35_000, PaymentMethod::Cash)
            .await
            .unwrap();
        assert!(matches!(
            f.service.archive(session, job_id).await.unwrap(),
            ArchiveOutcome::Archived(_)
        ));
    }

    #[tokio::test]
    async fn test_intake_freezes_resolved_price() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        let outcome = f.service.create_job(&session, intake(&f, " 34abc123 ")).await.unwrap();

        assert_eq!(outcome.job.plate_number, "34ABC123");
        assert_eq!(outcome.job.status, JobStatus::Queue);
        assert_eq!(outcome.job.payment_status, PaymentStatus::Pending);
        assert_eq!(outcome.job.price, 35_000);
        assert_eq!(outcome.job.currency, "TRY");
        assert!(outcome.price.found);
    }

    #[tokio::test]
    async fn test_intake_uses_manual_price_when_unresolved() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        let mut request = intake(&f, "06XYZ99");
        request.package_id = Uuid::new_v4();
        request.manual_price = Some(12_500);

        let outcome = f.service.create_job(&session, request).await.unwrap();
        assert_eq!(outcome.job.price, 12_500);
        assert!(!outcome.price.found);
        assert_eq!(outcome.price.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_second_open_job_for_plate_conflicts() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        f.service.create_job(&session, intake(&f, "34ABC123")).await.unwrap();
        let err = f
            .service
            .create_job(&session, intake(&f, "34abc123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == ACTIVE_JOB_EXISTS));
        assert_eq!(f.store.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_conflicting_intake_leaves_car_and_customer_untouched() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        let mut first = intake(&f, "34ABC123");
        first.phone = Some("+90 532 000 00 00".to_string());
        first.customer_name = Some("Ayşe".to_string());
        first.car.color = Some("Beyaz".to_string());
        f.service.create_job(&session, first).await.unwrap();

        let cars_before = f.store.cars().await;
        let customers_before = f.store.customers().await;

        let other_class = Uuid::new_v4();
        f.store
            .add_price(f.branch_id, f.package_id, other_class, 40_000)
            .await;
        let mut second = intake(&f, "34abc123");
        second.vehicle_class_id = other_class;
        second.phone = Some("+90 533 999 99 99".to_string());
        second.customer_name = Some("Can".to_string());
        second.car.color = Some("Siyah".to_string());

        let err = f.service.create_job(&session, second).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref msg) if msg == ACTIVE_JOB_EXISTS));

        let cars_after = f.store.cars().await;
        assert_eq!(cars_after.len(), 1);
        assert_eq!(cars_after[0].vehicle_class_id, cars_before[0].vehicle_class_id);
        assert_eq!(cars_after[0].color.as_deref(), Some("Beyaz"));

        let customers_after = f.store.customers().await;
        assert_eq!(customers_after.len(), customers_before.len());
        assert_eq!(customers_after[0].name.as_deref(), Some("Ayşe"));
        assert_eq!(f.store.jobs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_same_plate_open_in_two_branches() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        let other_branch = f.store.add_branch().await;
        f.store
            .add_price(other_branch, f.package_id, f.vehicle_class_id, 30_000)
            .await;
        let other_session =
            session_for(&f.store.add_staff(StaffRole::Manager, Some(other_branch)).await);

        let here = f.service.create_job(&session, intake(&f, "34ABC123")).await.unwrap().job;
        let there = f
            .service
            .create_job(&other_session, intake(&f, "34abc123"))
            .await
            .unwrap()
            .job;

        assert_eq!(here.branch_id, f.branch_id);
        assert_eq!(there.branch_id, other_branch);
        assert_eq!(there.price, 30_000);
        assert_ne!(here.car_id, there.car_id);
        assert_eq!(f.store.jobs().await.len(), 2);
        assert_eq!(f.store.cars().await.len(), 2);
    }

    #[tokio::test]
    async fn test_plate_reusable_after_archive() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        let job = f.service.create_job(&session, intake(&f, "34ABC123")).await.unwrap().job;
        close_out(&f, &session, job.id).await;

        assert!(f.service.create_job(&session, intake(&f, "34ABC123")).await.is_ok());
    }

    #[tokio::test]
    async fn test_customer_carried_forward_from_previous_job() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        let mut first = intake(&f, "34ABC123");
        first.phone = Some("+90 532 000 00 00".to_string());
        first.customer_name = Some("Ayşe".to_string());
        let first_job = f.service.create_job(&session, first).await.unwrap().job;
        assert!(first_job.customer_id.is_some());

        close_out(&f, &session, first_job.id).await;

        let second_job = f.service.create_job(&session, intake(&f, "34ABC123")).await.unwrap().job;
        assert_eq!(second_job.customer_id, first_job.customer_id);
    }

    #[tokio::test]
    async fn test_intake_rejects_blank_plate_without_writes() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let session = manager(&f).await;

        let err = f.service.create_job(&session, intake(&f, "   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(f.store.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_staff_must_claim_before_moving() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;
        let staff = worker(&f).await;

        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        let err = f
            .service
            .change_status(&staff, job.id, JobStatus::Washing)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        assert!(matches!(
            f.service.claim(&staff, job.id).await.unwrap(),
            ClaimOutcome::Claimed(_)
        ));

        let moved = f
            .service
            .change_status(&staff, job.id, JobStatus::Washing)
            .await
            .unwrap();
        assert_eq!(moved.status, JobStatus::Washing);
        assert!(moved.started_at.is_some());

        let history = f.service.detail(&admin, job.id).await.unwrap().history;
        let statuses: Vec<HistoryStatus> = history.iter().map(|h| h.to_status).collect();
        assert_eq!(statuses, vec![HistoryStatus::Claimed, HistoryStatus::Washing]);
    }

    #[tokio::test]
    async fn test_linear_policy_blocks_skipping() {
        let f = fixture(TransitionPolicy::linear()).await;
        let admin = manager(&f).await;
        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        let err = f
            .service
            .change_status(&admin, job.id, JobStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(f.store.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_claims_single_winner() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;
        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        let mut workers = Vec::new();
        for _ in 0..8 {
            workers.push(worker(&f).await);
        }

        let outcomes = join_all(workers.iter().map(|w| f.service.claim(w, job.id))).await;
        let winners = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(ClaimOutcome::Claimed(_))))
            .count();

        assert_eq!(winners, 1);
        let claimed_rows = f
            .store
            .history()
            .await
            .into_iter()
            .filter(|h| h.to_status == HistoryStatus::Claimed)
            .count();
        assert_eq!(claimed_rows, 1);
    }

    #[tokio::test]
    async fn test_claim_rejected_once_out_of_queue() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;
        let staff = worker(&f).await;
        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        f.service.change_status(&admin, job.id, JobStatus::Washing).await.unwrap();
        assert!(matches!(
            f.service.claim(&staff, job.id).await.unwrap(),
            ClaimOutcome::Rejected
        ));
    }

    #[tokio::test]
    async fn test_archive_requires_payment() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;
        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        assert!(matches!(
            f.service.archive(&admin, job.id).await.unwrap(),
            ArchiveOutcome::NotPaid
        ));
        assert!(f.store.jobs().await[0].closed_at.is_none());
    }

    #[tokio::test]
    async fn test_paid_job_stays_open_until_completed() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;
        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        f.service
            .record_payment(&admin, job.id, 35_000, PaymentMethod::Cash)
            .await
            .unwrap();
        assert!(matches!(
            f.service.archive(&admin, job.id).await.unwrap(),
            ArchiveOutcome::NotCompleted
        ));
        assert!(f.store.jobs().await[0].closed_at.is_none());
        assert_eq!(f.service.active_board(&admin).await.unwrap().len(), 1);

        f.service.change_status(&admin, job.id, JobStatus::Drying).await.unwrap();
        assert!(matches!(
            f.service.archive(&admin, job.id).await.unwrap(),
            ArchiveOutcome::NotCompleted
        ));

        f.service.change_status(&admin, job.id, JobStatus::Completed).await.unwrap();
        assert!(matches!(
            f.service.archive(&admin, job.id).await.unwrap(),
            ArchiveOutcome::Archived(_)
        ));
        assert!(matches!(
            f.service.archive(&admin, job.id).await.unwrap(),
            ArchiveOutcome::AlreadyArchived
        ));
    }

    #[tokio::test]
    async fn test_payment_validation_and_effect() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;
        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        assert!(f
            .service
            .record_payment(&admin, job.id, 0, PaymentMethod::Cash)
            .await
            .is_err());
        assert!(f.store.payments().await.is_empty());

        let (payment, paid) = f
            .service
            .record_payment(&admin, job.id, 35_000, PaymentMethod::Transfer)
            .await
            .unwrap();
        assert_eq!(payment.amount, 35_000);
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_reassign_requires_branch_staff() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;
        let staff = worker(&f).await;
        let outsider = f.store.add_staff(StaffRole::Staff, Some(Uuid::new_v4())).await;
        let job = f.service.create_job(&admin, intake(&f, "34ABC123")).await.unwrap().job;

        let err = f.service.reassign(&admin, job.id, outsider.user_id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = f.service.reassign(&staff, job.id, staff.user_id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let job = f.service.reassign(&admin, job.id, staff.user_id).await.unwrap();
        assert_eq!(job.assigned_to, Some(staff.user_id));
        assert_eq!(job.assigned_by, Some(admin.user_id));
    }

    #[tokio::test]
    async fn test_archived_search_and_board_order() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;

        let first = f.service.create_job(&admin, intake(&f, "34AAA01")).await.unwrap().job;
        f.service.create_job(&admin, intake(&f, "06BBB02")).await.unwrap();

        let board = f.service.active_board(&admin).await.unwrap();
        assert_eq!(board[0].id, first.id);

        close_out(&f, &admin, first.id).await;

        let found = f
            .service
            .archived(&admin, Some("aaa".to_string()), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(f
            .service
            .archived(&admin, Some("zzz".to_string()), None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_archived_search_treats_wildcards_literally() {
        let f = fixture(TransitionPolicy::permissive()).await;
        let admin = manager(&f).await;

        let job = f.service.create_job(&admin, intake(&f, "34AAA01")).await.unwrap().job;
        close_out(&f, &admin, job.id).await;

        for pattern in ["%", "_", "34_AA", "A%1"] {
            let found = f
                .service
                .archived(&admin, Some(pattern.to_string()), None)
                .await
                .unwrap();
            assert!(found.is_empty(), "{pattern} should not match");
        }
        assert_eq!(
            f.service
                .archived(&admin, Some("4aa".to_string()), None)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
