//! Repositorios
//!
//! Cada repositorio expone un trait de almacenamiento (la costura que usan los
//! servicios) y su implementación sobre PostgreSQL.

pub mod appointment_repository;
pub mod catalog_repository;
pub mod job_repository;
pub mod pricing_repository;
pub mod staff_repository;
pub mod stats_repository;

pub use appointment_repository::{AppointmentRepository, AppointmentStore};
pub use catalog_repository::{CatalogRepository, CatalogStore};
pub use job_repository::{JobRepository, JobStore};
pub use pricing_repository::{PricingAdminStore, PricingRepository, PricingStore};
pub use staff_repository::{StaffRepository, StaffStore};
pub use stats_repository::{StatsRepository, StatsStore};
