//! Repositorio de trabajos
//!
//! Recepción (vehículo, cliente, trabajo), cambios de estado, asignaciones,
//! pagos y archivo. Toda escritura que toca más de una tabla va en una
//! transacción y las actualizaciones condicionales deciden por filas afectadas.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::car::{Car, Customer};
use crate::models::job::{
    HistoryStatus, Job, JobAssignment, JobStatus, JobStatusHistory, JobTransition, NewJob,
};
use crate::models::payment::{NewPayment, Payment};
use crate::models::session::Actor;
use crate::utils::errors::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Recepción completa en una transacción: vehículo, cliente, trabajo y
    /// enlace de la cita. `StoreError::Conflict` si ya hay un trabajo abierto
    /// para la matrícula, `StoreError::NotFound` si la cita ya no está reservada.
    /// Ante cualquier error no queda nada escrito.
    async fn create_intake(&self, job: NewJob) -> Result<Job, StoreError>;

    async fn find_job(&self, branch_id: Uuid, job_id: Uuid) -> Result<Option<Job>, StoreError>;

    async fn find_open_job_by_plate(
        &self,
        branch_id: Uuid,
        plate_number: String,
    ) -> Result<Option<Job>, StoreError>;

    async fn list_open_jobs(&self, branch_id: Uuid) -> Result<Vec<Job>, StoreError>;

    async fn list_archived_jobs(
        &self,
        branch_id: Uuid,
        plate_search: Option<String>,
        limit: i64,
    ) -> Result<Vec<Job>, StoreError>;

    async fn job_history(&self, job_id: Uuid) -> Result<Vec<JobStatusHistory>, StoreError>;

    /// `None` si el estado leído ya no coincide
    async fn apply_transition(&self, transition: JobTransition) -> Result<Option<Job>, StoreError>;

    /// `None` si el trabajo ya tiene responsable o no está en cola
    async fn claim_job(&self, assignment: JobAssignment) -> Result<Option<Job>, StoreError>;

    async fn reassign_job(&self, assignment: JobAssignment) -> Result<Option<Job>, StoreError>;

    /// `None` si el trabajo no existe en la sucursal o está archivado
    async fn record_payment(
        &self,
        payment: NewPayment,
    ) -> Result<Option<(Payment, Job)>, StoreError>;

    /// `None` si el trabajo no está completado y pagado, o ya estaba archivado
    async fn archive_job(
        &self,
        branch_id: Uuid,
        job_id: Uuid,
        closed_at: DateTime<Utc>,
    ) -> Result<Option<Job>, StoreError>;
}

#[derive(FromRow)]
struct SavedCarRow {
    #[sqlx(flatten)]
    car: Car,
    created: bool,
}

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_history(
    tx: &mut Transaction<'_, Postgres>,
    job: &Job,
    from_status: Option<HistoryStatus>,
    to_status: HistoryStatus,
    actor: &Actor,
    at: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO job_status_history (id, job_id, branch_id, from_status, to_status, actor_user_id, actor_email, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.id)
    .bind(job.branch_id)
    .bind(from_status)
    .bind(to_status)
    .bind(actor.user_id)
    .bind(&actor.email)
    .bind(at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl JobStore for JobRepository {
    async fn create_intake(&self, job: NewJob) -> Result<Job, StoreError> {
        let NewJob {
            branch_id,
            plate_number,
            package_id,
            vehicle_class_id,
            car,
            contact,
            price,
            currency,
            appointment_id,
        } = job;

        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, SavedCarRow>(
            r#"
            INSERT INTO cars (id, branch_id, plate_number, vehicle_class_id, make, model, color, notes, has_damage)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, FALSE))
            ON CONFLICT (branch_id, plate_number) DO UPDATE SET
                vehicle_class_id = EXCLUDED.vehicle_class_id,
                make = COALESCE($5, cars.make),
                model = COALESCE($6, cars.model),
                color = COALESCE($7, cars.color),
                notes = COALESCE($8, cars.notes),
                has_damage = COALESCE($9, cars.has_damage)
            RETURNING *, (xmax = 0) AS created
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(branch_id)
        .bind(&plate_number)
        .bind(vehicle_class_id)
        .bind(car.make)
        .bind(car.model)
        .bind(car.color)
        .bind(car.notes)
        .bind(car.has_damage)
        .fetch_one(&mut *tx)
        .await?;

        let customer_id = match contact {
            Some(contact) => {
                let customer = sqlx::query_as::<_, Customer>(
                    r#"
                    INSERT INTO customers (id, branch_id, phone, name)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (branch_id, phone) WHERE phone IS NOT NULL
                    DO UPDATE SET name = COALESCE(EXCLUDED.name, customers.name)
                    RETURNING *
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(branch_id)
                .bind(contact.phone)
                .bind(contact.name)
                .fetch_one(&mut *tx)
                .await?;
                Some(customer.id)
            }
            // Vehículo conocido: se hereda el cliente de su último trabajo
            None if !saved.created => {
                let previous: Option<Option<Uuid>> = sqlx::query_scalar(
                    "SELECT customer_id FROM jobs WHERE car_id = $1 ORDER BY created_at DESC LIMIT 1",
                )
                .bind(saved.car.id)
                .fetch_optional(&mut *tx)
                .await?;
                previous.flatten()
            }
            None => None,
        };

        // El índice único parcial de matrícula abierta aborta la transacción
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, branch_id, plate_number, package_id, status, payment_status, price, currency, car_id, customer_id)
            VALUES ($1, $2, $3, $4, 'queue', 'pending', $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(branch_id)
        .bind(plate_number)
        .bind(package_id)
        .bind(price)
        .bind(currency)
        .bind(saved.car.id)
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(appointment_id) = appointment_id {
            let linked = sqlx::query(
                r#"
                UPDATE appointments
                SET status = 'completed', converted_job_id = $3
                WHERE id = $1 AND branch_id = $2 AND status = 'booked'
                "#,
            )
            .bind(appointment_id)
            .bind(branch_id)
            .bind(created.id)
            .execute(&mut *tx)
            .await?;

            if linked.rows_affected() == 0 {
                return Err(StoreError::NotFound);
            }
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn find_job(&self, branch_id: Uuid, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1 AND branch_id = $2")
            .bind(job_id)
            .bind(branch_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    async fn find_open_job_by_plate(
        &self,
        branch_id: Uuid,
        plate_number: String,
    ) -> Result<Option<Job>, StoreError> {
        let job = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE branch_id = $1 AND plate_number = $2 AND closed_at IS NULL",
        )
        .bind(branch_id)
        .bind(plate_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn list_open_jobs(&self, branch_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs WHERE branch_id = $1 AND closed_at IS NULL ORDER BY created_at ASC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn list_archived_jobs(
        &self,
        branch_id: Uuid,
        plate_search: Option<String>,
        limit: i64,
    ) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT * FROM jobs
            WHERE branch_id = $1
              AND closed_at IS NOT NULL
              AND ($2::TEXT IS NULL OR position(upper($2) IN upper(plate_number)) > 0)
            ORDER BY closed_at DESC
            LIMIT $3
            "#,
        )
        .bind(branch_id)
        .bind(plate_search)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn job_history(&self, job_id: Uuid) -> Result<Vec<JobStatusHistory>, StoreError> {
        let history = sqlx::query_as::<_, JobStatusHistory>(
            "SELECT * FROM job_status_history WHERE job_id = $1 ORDER BY created_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }

    async fn apply_transition(&self, transition: JobTransition) -> Result<Option<Job>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $4,
                started_at = COALESCE(started_at, $5),
                completed_at = COALESCE($6, completed_at)
            WHERE id = $1 AND branch_id = $2 AND status = $3 AND closed_at IS NULL
            RETURNING *
            "#,
        )
        .bind(transition.job_id)
        .bind(transition.branch_id)
        .bind(transition.from)
        .bind(transition.to)
        .bind(transition.started_at)
        .bind(transition.completed_at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(job) = updated else {
            return Ok(None);
        };

        insert_history(
            &mut tx,
            &job,
            Some(transition.from.into()),
            transition.to.into(),
            &transition.actor,
            transition.at,
        )
        .await?;

        tx.commit().await?;

        Ok(Some(job))
    }

    async fn claim_job(&self, assignment: JobAssignment) -> Result<Option<Job>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET assigned_to = $3, assigned_by = $4, assigned_at = $5
            WHERE id = $1 AND branch_id = $2
              AND assigned_to IS NULL
              AND status = 'queue'
              AND closed_at IS NULL
            RETURNING *
            "#,
        )
        .bind(assignment.job_id)
        .bind(assignment.branch_id)
        .bind(assignment.assignee)
        .bind(assignment.actor.user_id)
        .bind(assignment.at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(job) = claimed else {
            return Ok(None);
        };

        insert_history(
            &mut tx,
            &job,
            Some(HistoryStatus::from(JobStatus::Queue)),
            HistoryStatus::Claimed,
            &assignment.actor,
            assignment.at,
        )
        .await?;

        tx.commit().await?;

        Ok(Some(job))
    }

    async fn reassign_job(&self, assignment: JobAssignment) -> Result<Option<Job>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let reassigned = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET assigned_to = $3, assigned_by = $4, assigned_at = $5
            WHERE id = $1 AND branch_id = $2
            RETURNING *
            "#,
        )
        .bind(assignment.job_id)
        .bind(assignment.branch_id)
        .bind(assignment.assignee)
        .bind(assignment.actor.user_id)
        .bind(assignment.at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(job) = reassigned else {
            return Ok(None);
        };

        insert_history(
            &mut tx,
            &job,
            Some(job.status.into()),
            HistoryStatus::Reassigned,
            &assignment.actor,
            assignment.at,
        )
        .await?;

        tx.commit().await?;

        Ok(Some(job))
    }

    async fn record_payment(
        &self,
        payment: NewPayment,
    ) -> Result<Option<(Payment, Job)>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let paid = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET payment_status = 'paid'
            WHERE id = $1 AND branch_id = $2 AND closed_at IS NULL
            RETURNING *
            "#,
        )
        .bind(payment.job_id)
        .bind(payment.branch_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(job) = paid else {
            return Ok(None);
        };

        let recorded = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, job_id, branch_id, amount, method, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payment.job_id)
        .bind(payment.branch_id)
        .bind(payment.amount)
        .bind(payment.method)
        .bind(payment.recorded_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((recorded, job)))
    }

    async fn archive_job(
        &self,
        branch_id: Uuid,
        job_id: Uuid,
        closed_at: DateTime<Utc>,
    ) -> Result<Option<Job>, StoreError> {
        let archived = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET closed_at = $3
            WHERE id = $1 AND branch_id = $2
              AND status = 'completed'
              AND payment_status = 'paid'
              AND closed_at IS NULL
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(branch_id)
        .bind(closed_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(archived)
    }
}
