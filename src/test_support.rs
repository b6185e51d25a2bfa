//! Almacenamiento en memoria para los tests
//!
//! Reproduce las restricciones de PostgreSQL que importan a las reglas:
//! un trabajo abierto por matrícula y actualizaciones condicionales atómicas.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::appointment::{Appointment, AppointmentStatus, NewAppointment};
use crate::models::branch::Branch;
use crate::models::car::{Car, CarDetails, Customer, CustomerContact};
use crate::models::job::{
    HistoryStatus, Job, JobAssignment, JobStatus, JobStatusHistory, JobTransition, NewJob,
    PaymentStatus,
};
use crate::models::payment::{NewPayment, Payment};
use crate::models::pricing::{PriceList, PriceRule};
use crate::models::session::{Actor, SessionContext};
use crate::models::staff::{StaffProfile, StaffRole};
use crate::repositories::{AppointmentStore, JobStore, PricingStore, StaffStore};
use crate::utils::errors::StoreError;

#[derive(Default)]
struct Tables {
    branches: Vec<Branch>,
    staff: Vec<StaffProfile>,
    price_lists: Vec<PriceList>,
    price_rules: Vec<PriceRule>,
    cars: Vec<Car>,
    customers: Vec<Customer>,
    jobs: Vec<Job>,
    history: Vec<JobStatusHistory>,
    payments: Vec<Payment>,
    appointments: Vec<Appointment>,
}

impl Tables {
    fn push_history(
        &mut self,
        job: &Job,
        from_status: Option<HistoryStatus>,
        to_status: HistoryStatus,
        actor: &Actor,
        at: DateTime<Utc>,
    ) {
        self.history.push(JobStatusHistory {
            id: Uuid::new_v4(),
            job_id: job.id,
            branch_id: job.branch_id,
            from_status,
            to_status,
            actor_user_id: actor.user_id,
            actor_email: actor.email.clone(),
            created_at: at,
        });
    }

    /// Devuelve el id del vehículo y si se acaba de crear
    fn upsert_car(
        &mut self,
        branch_id: Uuid,
        plate_number: &str,
        vehicle_class_id: Uuid,
        details: CarDetails,
    ) -> (Uuid, bool) {
        if let Some(car) = self
            .cars
            .iter_mut()
            .find(|c| c.branch_id == branch_id && c.plate_number == plate_number)
        {
            car.vehicle_class_id = vehicle_class_id;
            car.make = details.make.or(car.make.take());
            car.model = details.model.or(car.model.take());
            car.color = details.color.or(car.color.take());
            car.notes = details.notes.or(car.notes.take());
            car.has_damage = details.has_damage.unwrap_or(car.has_damage);
            return (car.id, false);
        }

        let id = Uuid::new_v4();
        self.cars.push(Car {
            id,
            branch_id,
            plate_number: plate_number.to_string(),
            vehicle_class_id,
            make: details.make,
            model: details.model,
            color: details.color,
            notes: details.notes,
            has_damage: details.has_damage.unwrap_or(false),
            created_at: Utc::now(),
        });
        (id, true)
    }

    fn upsert_customer(&mut self, branch_id: Uuid, contact: CustomerContact) -> Uuid {
        if let Some(customer) = self.customers.iter_mut().find(|c| {
            c.branch_id == branch_id && c.phone.as_deref() == Some(contact.phone.as_str())
        }) {
            if contact.name.is_some() {
                customer.name = contact.name;
            }
            return customer.id;
        }

        let id = Uuid::new_v4();
        self.customers.push(Customer {
            id,
            branch_id,
            name: contact.name,
            phone: Some(contact.phone),
            email: None,
            created_at: Utc::now(),
        });
        id
    }

    fn job_mut(&mut self, branch_id: Uuid, job_id: Uuid) -> Option<&mut Job> {
        self.jobs
            .iter_mut()
            .find(|j| j.id == job_id && j.branch_id == branch_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn add_branch(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().await.branches.push(Branch {
            id,
            name: format!("Şube {}", &id.to_string()[..4]),
            is_active: true,
            timezone: "Europe/Istanbul".to_string(),
            created_at: Utc::now(),
        });
        id
    }

    pub async fn add_staff(&self, role: StaffRole, branch_id: Option<Uuid>) -> StaffProfile {
        let user_id = Uuid::new_v4();
        let profile = StaffProfile {
            id: Uuid::new_v4(),
            user_id,
            email: format!("{}@carwash.test", &user_id.to_string()[..8]),
            full_name: format!("{} {}", role.as_str(), &user_id.to_string()[..4]),
            role,
            branch_id,
            is_active: true,
            created_at: Utc::now(),
        };
        self.tables.lock().await.staff.push(profile.clone());
        profile
    }

    /// Lista de precios sin fechas con una sola regla
    pub async fn add_price(
        &self,
        branch_id: Uuid,
        package_id: Uuid,
        vehicle_class_id: Uuid,
        amount: i64,
    ) -> Uuid {
        let list_id = Uuid::new_v4();
        let mut tables = self.tables.lock().await;
        tables.price_lists.push(PriceList {
            id: list_id,
            branch_id,
            name: "Standard".to_string(),
            is_active: true,
            valid_from: None,
            valid_to: None,
            created_at: Utc::now(),
        });
        tables.price_rules.push(PriceRule {
            id: Uuid::new_v4(),
            price_list_id: list_id,
            package_id,
            vehicle_class_id,
            amount_minor_units: amount,
            currency: Some("TRY".to_string()),
            package_name: Some("Standard Wash".to_string()),
            vehicle_class_label: Some("Sedan".to_string()),
        });
        list_id
    }

    pub async fn jobs(&self) -> Vec<Job> {
        self.tables.lock().await.jobs.clone()
    }

    pub async fn cars(&self) -> Vec<Car> {
        self.tables.lock().await.cars.clone()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.tables.lock().await.customers.clone()
    }

    pub async fn history(&self) -> Vec<JobStatusHistory> {
        self.tables.lock().await.history.clone()
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.tables.lock().await.payments.clone()
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.tables.lock().await.appointments.clone()
    }
}

/// Contexto de sesión equivalente al que resuelve el middleware
pub fn session_for(profile: &StaffProfile) -> SessionContext {
    SessionContext {
        user_id: profile.user_id,
        email: profile.email.clone(),
        role: profile.role,
        branch_id: profile.branch_id,
    }
}

#[async_trait]
impl PricingStore for MemoryStore {
    async fn candidate_price_lists(
        &self,
        branch_id: Uuid,
        _today: NaiveDate,
    ) -> Result<Vec<PriceList>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .price_lists
            .iter()
            .filter(|l| l.branch_id == branch_id)
            .cloned()
            .collect())
    }

    async fn find_price_rule(
        &self,
        price_list_id: Uuid,
        package_id: Uuid,
        vehicle_class_id: Uuid,
    ) -> Result<Option<PriceRule>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .price_rules
            .iter()
            .find(|r| {
                r.price_list_id == price_list_id
                    && r.package_id == package_id
                    && r.vehicle_class_id == vehicle_class_id
            })
            .cloned())
    }
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn find_active_profile(&self, user_id: Uuid) -> Result<Option<StaffProfile>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .staff
            .iter()
            .find(|s| s.user_id == user_id && s.is_active)
            .cloned())
    }

    async fn find_active_branch(&self, branch_id: Uuid) -> Result<Option<Branch>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .branches
            .iter()
            .find(|b| b.id == branch_id && b.is_active)
            .cloned())
    }

    async fn list_branch_staff(&self, branch_id: Uuid) -> Result<Vec<StaffProfile>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .staff
            .iter()
            .filter(|s| s.branch_id == Some(branch_id) && s.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_intake(&self, job: NewJob) -> Result<Job, StoreError> {
        let mut tables = self.tables.lock().await;

        let open_exists = tables.jobs.iter().any(|j| {
            j.branch_id == job.branch_id && j.plate_number == job.plate_number && j.is_open()
        });
        if open_exists {
            return Err(StoreError::Conflict);
        }

        if let Some(appointment_id) = job.appointment_id {
            let booked = tables.appointments.iter().any(|a| {
                a.id == appointment_id
                    && a.branch_id == job.branch_id
                    && a.status == AppointmentStatus::Booked
            });
            if !booked {
                return Err(StoreError::NotFound);
            }
        }

        let (car_id, car_created) =
            tables.upsert_car(job.branch_id, &job.plate_number, job.vehicle_class_id, job.car);

        let customer_id = match job.contact {
            Some(contact) => Some(tables.upsert_customer(job.branch_id, contact)),
            None if !car_created => tables
                .jobs
                .iter()
                .rev()
                .find(|j| j.car_id == Some(car_id))
                .and_then(|j| j.customer_id),
            None => None,
        };

        let created = Job {
            id: Uuid::new_v4(),
            branch_id: job.branch_id,
            plate_number: job.plate_number,
            package_id: job.package_id,
            status: JobStatus::Queue,
            payment_status: PaymentStatus::Pending,
            price: job.price,
            currency: job.currency,
            car_id: Some(car_id),
            customer_id,
            assigned_to: None,
            assigned_by: None,
            assigned_at: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
            closed_at: None,
        };
        tables.jobs.push(created.clone());

        if let Some(appointment_id) = job.appointment_id {
            if let Some(appointment) = tables
                .appointments
                .iter_mut()
                .find(|a| a.id == appointment_id)
            {
                appointment.status = AppointmentStatus::Completed;
                appointment.converted_job_id = Some(created.id);
            }
        }

        Ok(created)
    }

    async fn find_job(&self, branch_id: Uuid, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .jobs
            .iter()
            .find(|j| j.id == job_id && j.branch_id == branch_id)
            .cloned())
    }

    async fn find_open_job_by_plate(
        &self,
        branch_id: Uuid,
        plate_number: String,
    ) -> Result<Option<Job>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .jobs
            .iter()
            .find(|j| j.branch_id == branch_id && j.plate_number == plate_number && j.is_open())
            .cloned())
    }

    async fn list_open_jobs(&self, branch_id: Uuid) -> Result<Vec<Job>, StoreError> {
        let tables = self.tables.lock().await;
        let mut jobs: Vec<Job> = tables
            .jobs
            .iter()
            .filter(|j| j.branch_id == branch_id && j.is_open())
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.created_at);
        Ok(jobs)
    }

    async fn list_archived_jobs(
        &self,
        branch_id: Uuid,
        plate_search: Option<String>,
        limit: i64,
    ) -> Result<Vec<Job>, StoreError> {
        let tables = self.tables.lock().await;
        let needle = plate_search.map(|s| s.to_uppercase());
        let mut jobs: Vec<Job> = tables
            .jobs
            .iter()
            .filter(|j| j.branch_id == branch_id && !j.is_open())
            .filter(|j| {
                needle
                    .as_deref()
                    .map_or(true, |n| j.plate_number.to_uppercase().contains(n))
            })
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
        jobs.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(jobs)
    }

    async fn job_history(&self, job_id: Uuid) -> Result<Vec<JobStatusHistory>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .history
            .iter()
            .filter(|h| h.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn apply_transition(&self, transition: JobTransition) -> Result<Option<Job>, StoreError> {
        let mut tables = self.tables.lock().await;

        let Some(job) = tables.job_mut(transition.branch_id, transition.job_id) else {
            return Ok(None);
        };
        if job.status != transition.from || !job.is_open() {
            return Ok(None);
        }

        job.status = transition.to;
        job.started_at = job.started_at.or(transition.started_at);
        job.completed_at = transition.completed_at.or(job.completed_at);
        let updated = job.clone();

        tables.push_history(
            &updated,
            Some(transition.from.into()),
            transition.to.into(),
            &transition.actor,
            transition.at,
        );
        Ok(Some(updated))
    }

    async fn claim_job(&self, assignment: JobAssignment) -> Result<Option<Job>, StoreError> {
        let mut tables = self.tables.lock().await;

        let Some(job) = tables.job_mut(assignment.branch_id, assignment.job_id) else {
            return Ok(None);
        };
        if job.assigned_to.is_some() || job.status != JobStatus::Queue || !job.is_open() {
            return Ok(None);
        }

        job.assigned_to = Some(assignment.assignee);
        job.assigned_by = Some(assignment.actor.user_id);
        job.assigned_at = Some(assignment.at);
        let updated = job.clone();

        tables.push_history(
            &updated,
            Some(HistoryStatus::Queue),
            HistoryStatus::Claimed,
            &assignment.actor,
            assignment.at,
        );
        Ok(Some(updated))
    }

    async fn reassign_job(&self, assignment: JobAssignment) -> Result<Option<Job>, StoreError> {
        let mut tables = self.tables.lock().await;

        let Some(job) = tables.job_mut(assignment.branch_id, assignment.job_id) else {
            return Ok(None);
        };

        job.assigned_to = Some(assignment.assignee);
        job.assigned_by = Some(assignment.actor.user_id);
        job.assigned_at = Some(assignment.at);
        let updated = job.clone();

        tables.push_history(
            &updated,
            Some(updated.status.into()),
            HistoryStatus::Reassigned,
            &assignment.actor,
            assignment.at,
        );
        Ok(Some(updated))
    }

    async fn record_payment(
        &self,
        payment: NewPayment,
    ) -> Result<Option<(Payment, Job)>, StoreError> {
        let mut tables = self.tables.lock().await;

        let Some(job) = tables.job_mut(payment.branch_id, payment.job_id) else {
            return Ok(None);
        };
        if !job.is_open() {
            return Ok(None);
        }

        job.payment_status = PaymentStatus::Paid;
        let updated = job.clone();

        let recorded = Payment {
            id: Uuid::new_v4(),
            job_id: payment.job_id,
            branch_id: payment.branch_id,
            amount: payment.amount,
            method: payment.method,
            recorded_by: payment.recorded_by,
            created_at: Utc::now(),
        };
        tables.payments.push(recorded.clone());
        Ok(Some((recorded, updated)))
    }

    async fn archive_job(
        &self,
        branch_id: Uuid,
        job_id: Uuid,
        closed_at: DateTime<Utc>,
    ) -> Result<Option<Job>, StoreError> {
        let mut tables = self.tables.lock().await;

        let Some(job) = tables.job_mut(branch_id, job_id) else {
            return Ok(None);
        };
        if job.status != JobStatus::Completed
            || job.payment_status != PaymentStatus::Paid
            || !job.is_open()
        {
            return Ok(None);
        }

        job.closed_at = Some(closed_at);
        Ok(Some(job.clone()))
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let created = Appointment {
            id: Uuid::new_v4(),
            branch_id: appointment.branch_id,
            customer_name: appointment.customer_name,
            customer_phone: appointment.customer_phone,
            plate_number: appointment.plate_number,
            scheduled_time: appointment.scheduled_time,
            package_id: appointment.package_id,
            vehicle_class_id: appointment.vehicle_class_id,
            status: AppointmentStatus::Booked,
            converted_job_id: None,
            is_valet: appointment.is_valet,
            valet_address: appointment.valet_address,
            created_at: Utc::now(),
        };
        self.tables.lock().await.appointments.push(created.clone());
        Ok(created)
    }

    async fn list_appointments(&self, branch_id: Uuid) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.lock().await;
        let mut appointments: Vec<Appointment> = tables
            .appointments
            .iter()
            .filter(|a| a.branch_id == branch_id)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.scheduled_time);
        Ok(appointments)
    }

    async fn find_appointment(
        &self,
        branch_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .appointments
            .iter()
            .find(|a| a.id == appointment_id && a.branch_id == branch_id)
            .cloned())
    }

    async fn mark_converted(
        &self,
        branch_id: Uuid,
        appointment_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Appointment>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(appointment) = tables.appointments.iter_mut().find(|a| {
            a.id == appointment_id
                && a.branch_id == branch_id
                && a.status == AppointmentStatus::Booked
        }) else {
            return Ok(None);
        };

        appointment.status = AppointmentStatus::Completed;
        appointment.converted_job_id = Some(job_id);
        Ok(Some(appointment.clone()))
    }
}
