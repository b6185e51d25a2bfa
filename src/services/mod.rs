//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los servicios
//! reciben el contexto de sesión de cada request y trabajan contra los traits
//! de almacenamiento, nunca contra el pool directamente.

pub mod appointment_service;
pub mod catalog_service;
pub mod job_lifecycle;
pub mod job_service;
pub mod price_resolver;
pub mod pricing_admin_service;
pub mod stats_service;

pub use appointment_service::AppointmentService;
pub use catalog_service::CatalogService;
pub use job_lifecycle::TransitionPolicy;
pub use job_service::JobService;
pub use price_resolver::PriceResolver;
pub use pricing_admin_service::PricingAdminService;
pub use stats_service::StatsService;
