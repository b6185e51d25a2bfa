//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod appointment;
pub mod branch;
pub mod car;
pub mod catalog;
pub mod job;
pub mod payment;
pub mod pricing;
pub mod session;
pub mod staff;
pub mod stats;
