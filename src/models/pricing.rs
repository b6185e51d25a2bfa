//! Modelos de precios
//!
//! Listas de precios con vigencia por fechas, reglas paquete × clase de
//! vehículo y el resultado de la resolución de precio.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Moneda por defecto cuando la regla no indica ninguna
pub const DEFAULT_CURRENCY: &str = "TRY";

/// Clase de vehículo (pequeño, sedán, SUV, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleClass {
    pub id: Uuid,
    pub key: String,
    pub label: String,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct NewVehicleClass {
    pub key: String,
    pub label: String,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Lista de precios - mapea a la tabla price_lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceList {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl PriceList {
    /// Activa y vigente en la fecha indicada (extremos incluidos)
    pub fn is_in_effect(&self, today: NaiveDate) -> bool {
        self.is_active
            && self.valid_from.map_or(true, |from| from <= today)
            && self.valid_to.map_or(true, |to| to >= today)
    }
}

#[derive(Debug, Clone)]
pub struct NewPriceList {
    pub branch_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

/// Regla de precio con los nombres para mostrar ya resueltos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceRule {
    pub id: Uuid,
    pub price_list_id: Uuid,
    pub package_id: Uuid,
    pub vehicle_class_id: Uuid,
    pub amount_minor_units: i64,
    pub currency: Option<String>,
    pub package_name: Option<String>,
    pub vehicle_class_label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPriceRule {
    pub price_list_id: Uuid,
    pub package_id: Uuid,
    pub vehicle_class_id: Uuid,
    pub amount_minor_units: i64,
    pub currency: String,
}

/// Desglose de un precio resuelto
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub price_list_id: Uuid,
    pub price_list_name: String,
    pub package_id: Uuid,
    pub package_name: String,
    pub vehicle_class_id: Uuid,
    pub vehicle_class_label: String,
    pub amount: i64,
    pub currency: String,
}

/// Resultado de la resolución de precio
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceResolution {
    pub found: bool,
    pub amount: i64,
    pub currency: String,
    pub breakdown: Vec<PriceBreakdown>,
    pub warnings: Vec<String>,
}

impl PriceResolution {
    pub fn not_found(warning: &str, currency: &str) -> Self {
        Self {
            found: false,
            amount: 0,
            currency: currency.to_string(),
            breakdown: Vec::new(),
            warnings: vec![warning.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(valid_from: Option<NaiveDate>, valid_to: Option<NaiveDate>, is_active: bool) -> PriceList {
        PriceList {
            id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            name: "Standard".to_string(),
            is_active,
            valid_from,
            valid_to,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_in_effect_bounds_are_inclusive() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(list(Some(today), Some(today), true).is_in_effect(today));
        assert!(list(None, None, true).is_in_effect(today));
        assert!(!list(None, None, false).is_in_effect(today));
        assert!(!list(today.succ_opt(), None, true).is_in_effect(today));
        assert!(!list(None, today.pred_opt(), true).is_in_effect(today));
    }
}
