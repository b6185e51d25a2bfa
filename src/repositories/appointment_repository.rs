use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::appointment::{Appointment, NewAppointment};
use crate::utils::errors::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError>;

    async fn list_appointments(&self, branch_id: Uuid) -> Result<Vec<Appointment>, StoreError>;

    async fn find_appointment(
        &self,
        branch_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, StoreError>;

    /// Marca la cita como completada; `None` si ya no estaba reservada
    async fn mark_converted(
        &self,
        branch_id: Uuid,
        appointment_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Appointment>, StoreError>;
}

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for AppointmentRepository {
    async fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let created = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                id, branch_id, customer_name, customer_phone, plate_number, scheduled_time,
                package_id, vehicle_class_id, status, is_valet, valet_address
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'booked', $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(appointment.branch_id)
        .bind(appointment.customer_name)
        .bind(appointment.customer_phone)
        .bind(appointment.plate_number)
        .bind(appointment.scheduled_time)
        .bind(appointment.package_id)
        .bind(appointment.vehicle_class_id)
        .bind(appointment.is_valet)
        .bind(appointment.valet_address)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_appointments(&self, branch_id: Uuid) -> Result<Vec<Appointment>, StoreError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE branch_id = $1 ORDER BY scheduled_time ASC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn find_appointment(
        &self,
        branch_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, StoreError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE id = $1 AND branch_id = $2",
        )
        .bind(appointment_id)
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn mark_converted(
        &self,
        branch_id: Uuid,
        appointment_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Appointment>, StoreError> {
        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = 'completed', converted_job_id = $3
            WHERE id = $1 AND branch_id = $2 AND status = 'booked'
            RETURNING *
            "#,
        )
        .bind(appointment_id)
        .bind(branch_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
