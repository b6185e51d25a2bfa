//! DTOs de entrada y salida de la API

pub mod appointment_dto;
pub mod catalog_dto;
pub mod common_dto;
pub mod job_dto;
pub mod pricing_dto;
pub mod stats_dto;

pub use common_dto::ApiResponse;
