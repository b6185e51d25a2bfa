//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use thiserror::Error;

use crate::models::pricing::DEFAULT_CURRENCY;
use crate::services::job_lifecycle::TransitionPolicy;

/// Errores al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub transition_policy: TransitionPolicy,
    pub default_currency: String,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            Err(_) => 3000,
        };

        let transition_policy = match env::var("JOB_TRANSITION_POLICY") {
            Ok(value) => TransitionPolicy::from_name(&value).ok_or(ConfigError::Invalid {
                name: "JOB_TRANSITION_POLICY",
                value,
            })?,
            Err(_) => TransitionPolicy::permissive(),
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
            transition_policy,
            default_currency: env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| DEFAULT_CURRENCY.to_string()),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
impl EnvironmentConfig {
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: "test-secret".to_string(),
            cors_origins: Vec::new(),
            transition_policy: TransitionPolicy::permissive(),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}
