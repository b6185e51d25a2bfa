use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::services::pricing_admin_service::{PriceListInput, PriceRuleInput, VehicleClassInput};
use crate::utils::validation::{validate_date_window, validate_not_blank};

/// Query de vista previa de precio
#[derive(Debug, Deserialize)]
pub struct ResolvePriceQuery {
    pub package_id: Uuid,
    pub vehicle_class_id: Uuid,
}

/// Alta o edición de una lista de precios (`id` presente = edición)
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_price_list_window"))]
pub struct PriceListRequest {
    pub id: Option<Uuid>,

    #[validate(length(max = 120), custom = "validate_not_blank")]
    pub name: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    pub valid_from: Option<NaiveDate>,

    pub valid_to: Option<NaiveDate>,
}

fn validate_price_list_window(request: &PriceListRequest) -> Result<(), ValidationError> {
    validate_date_window(request.valid_from, request.valid_to)
}

impl From<PriceListRequest> for PriceListInput {
    fn from(request: PriceListRequest) -> Self {
        PriceListInput {
            name: request.name,
            is_active: request.is_active,
            valid_from: request.valid_from,
            valid_to: request.valid_to,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PriceRuleRequest {
    pub id: Option<Uuid>,

    pub package_id: Uuid,

    pub vehicle_class_id: Uuid,

    #[validate(range(min = 1))]
    pub amount_minor_units: i64,

    #[validate(length(min = 3, max = 3))]
    pub currency: Option<String>,
}

impl From<PriceRuleRequest> for PriceRuleInput {
    fn from(request: PriceRuleRequest) -> Self {
        PriceRuleInput {
            package_id: request.package_id,
            vehicle_class_id: request.vehicle_class_id,
            amount_minor_units: request.amount_minor_units,
            currency: request.currency,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VehicleClassRequest {
    pub id: Option<Uuid>,

    #[validate(length(max = 40), custom = "validate_not_blank")]
    pub key: String,

    #[validate(length(max = 80), custom = "validate_not_blank")]
    pub label: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub sort_order: i32,
}

impl From<VehicleClassRequest> for VehicleClassInput {
    fn from(request: VehicleClassRequest) -> Self {
        VehicleClassInput {
            key: request.key,
            label: request.label,
            is_active: request.is_active,
            sort_order: request.sort_order,
        }
    }
}

fn default_true() -> bool {
    true
}
