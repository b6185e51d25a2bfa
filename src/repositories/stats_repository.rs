use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::stats::ClosedJobFact;
use crate::utils::errors::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Trabajos archivados en `[from, to)`
    async fn closed_job_facts(
        &self,
        branch_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClosedJobFact>, StoreError>;

    /// Pasos a `completed` por actor en `[from, to)`
    async fn completions_by_actor(
        &self,
        branch_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(Uuid, i64)>, StoreError>;
}

#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for StatsRepository {
    async fn closed_job_facts(
        &self,
        branch_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ClosedJobFact>, StoreError> {
        let facts = sqlx::query_as::<_, ClosedJobFact>(
            r#"
            SELECT j.price, j.payment_status, c.make,
                   p.name AS package_name, vc.label AS vehicle_class_label,
                   j.assigned_to
            FROM jobs j
            LEFT JOIN cars c ON c.id = j.car_id
            LEFT JOIN packages p ON p.id = j.package_id
            LEFT JOIN vehicle_classes vc ON vc.id = c.vehicle_class_id
            WHERE j.branch_id = $1
              AND j.closed_at >= $2
              AND j.closed_at < $3
            "#,
        )
        .bind(branch_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(facts)
    }

    async fn completions_by_actor(
        &self,
        branch_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(Uuid, i64)>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT actor_user_id, COUNT(*)
            FROM job_status_history
            WHERE branch_id = $1
              AND to_status = 'completed'
              AND created_at >= $2
              AND created_at < $3
            GROUP BY actor_user_id
            "#,
        )
        .bind(branch_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
