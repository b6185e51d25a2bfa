//! Servicio de citas
//!
//! Alta y listado de citas, y su conversión en trabajo reutilizando la
//! recepción normal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::appointment::{Appointment, AppointmentStatus, NewAppointment};
use crate::models::car::CarDetails;
use crate::models::job::Job;
use crate::models::session::SessionContext;
use crate::repositories::AppointmentStore;
use crate::services::job_service::{IntakeOutcome, JobIntake, JobService, APPOINTMENT_NOT_BOOKED};
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::{non_blank, normalize_plate};

pub const UNKNOWN_PLATE: &str = "UNKNOWN";
pub const LINKED_TO_EXISTING: &str = "an active job already exists; appointment linked to it";

#[derive(Debug, Clone)]
pub struct AppointmentRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub plate_number: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub package_id: Uuid,
    pub vehicle_class_id: Option<Uuid>,
    pub is_valet: bool,
    pub valet_address: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ConversionOutcome {
    Converted {
        appointment: Appointment,
        intake: IntakeOutcome,
    },
    LinkedExisting {
        appointment: Appointment,
        job: Job,
    },
}

#[derive(Clone)]
pub struct AppointmentService {
    store: Arc<dyn AppointmentStore>,
    jobs: JobService,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn AppointmentStore>, jobs: JobService) -> Self {
        Self { store, jobs }
    }

    pub async fn create(
        &self,
        session: &SessionContext,
        request: AppointmentRequest,
    ) -> AppResult<Appointment> {
        session.require_operator("book appointments")?;
        let branch_id = session.require_branch()?;

        let customer_name = non_blank(Some(request.customer_name.as_str()))
            .ok_or_else(|| validation_error("customer_name", "customer name is required"))?;

        let appointment = NewAppointment {
            branch_id,
            customer_name,
            customer_phone: non_blank(request.customer_phone.as_deref()),
            plate_number: non_blank(request.plate_number.as_deref()).map(|p| normalize_plate(&p)),
            scheduled_time: request.scheduled_time,
            package_id: request.package_id,
            vehicle_class_id: request.vehicle_class_id,
            is_valet: request.is_valet,
            valet_address: if request.is_valet {
                non_blank(request.valet_address.as_deref())
            } else {
                None
            },
        };

        let created = self.store.insert_appointment(appointment).await?;
        info!("📅 Cita {} creada para {}", created.id, created.scheduled_time);
        Ok(created)
    }

    pub async fn list(&self, session: &SessionContext) -> AppResult<Vec<Appointment>> {
        let branch_id = session.require_branch()?;
        Ok(self.store.list_appointments(branch_id).await?)
    }

    pub async fn convert(
        &self,
        session: &SessionContext,
        appointment_id: Uuid,
        vehicle_class_id: Option<Uuid>,
    ) -> AppResult<ConversionOutcome> {
        let branch_id = session.require_branch()?;

        let appointment = self
            .store
            .find_appointment(branch_id, appointment_id)
            .await?
            .ok_or_else(|| not_found_error("Appointment", &appointment_id.to_string()))?;

        if appointment.status != AppointmentStatus::Booked {
            return Err(validation_error("appointment_id", APPOINTMENT_NOT_BOOKED));
        }

        let vehicle_class_id = vehicle_class_id
            .or(appointment.vehicle_class_id)
            .ok_or_else(|| validation_error("vehicle_class_id", "vehicle class is required"))?;

        let plate_number = appointment
            .plate_number
            .clone()
            .and_then(|p| non_blank(Some(p.as_str())))
            .unwrap_or_else(|| UNKNOWN_PLATE.to_string());

        let intake = JobIntake {
            plate_number: plate_number.clone(),
            package_id: appointment.package_id,
            vehicle_class_id,
            phone: appointment.customer_phone.clone(),
            customer_name: Some(appointment.customer_name.clone()),
            car: CarDetails::default(),
            manual_price: None,
            appointment_id: Some(appointment_id),
        };

        // La recepción enlaza la cita en la misma transacción que crea el trabajo
        match self.jobs.create_job(session, intake).await {
            Ok(outcome) => {
                let appointment = self
                    .store
                    .find_appointment(branch_id, appointment_id)
                    .await?
                    .ok_or_else(|| not_found_error("Appointment", &appointment_id.to_string()))?;
                info!("📅 Cita {} convertida en el trabajo {}", appointment_id, outcome.job.id);
                Ok(ConversionOutcome::Converted {
                    appointment,
                    intake: outcome,
                })
            }
            Err(AppError::Conflict(message)) => {
                let Some(job) = self.jobs.find_open_job_by_plate(branch_id, &plate_number).await?
                else {
                    return Err(AppError::Conflict(message));
                };

                warn!(
                    "⚠️ Cita {} enlazada al trabajo abierto {} de {}",
                    appointment_id, job.id, plate_number
                );
                let appointment = self.link(branch_id, appointment_id, job.id).await?;
                Ok(ConversionOutcome::LinkedExisting { appointment, job })
            }
            Err(e) => Err(e),
        }
    }

    async fn link(
        &self,
        branch_id: Uuid,
        appointment_id: Uuid,
        job_id: Uuid,
    ) -> AppResult<Appointment> {
        self.store
            .mark_converted(branch_id, appointment_id, job_id)
            .await?
            .ok_or_else(|| validation_error("appointment_id", APPOINTMENT_NOT_BOOKED))
    }
}
