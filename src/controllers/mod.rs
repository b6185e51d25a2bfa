//! Controladores
//!
//! Validan los DTOs, delegan en los servicios y envuelven el resultado en
//! `ApiResponse`.

pub mod appointment_controller;
pub mod catalog_controller;
pub mod job_controller;
pub mod pricing_controller;
pub mod stats_controller;
