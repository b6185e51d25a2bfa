//! Backend de operaciones de lavaderos
//!
//! Recepción de vehículos, tablero de trabajos, precios por sucursal, citas y
//! estadísticas sobre PostgreSQL.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
pub mod test_support;

pub use routes::create_router;
pub use state::AppState;
