//! Administración de precios
//!
//! Listas de precios, reglas y clases de vehículo. Reservado a roles de gestión.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::pricing::{
    NewPriceList, NewPriceRule, NewVehicleClass, PriceList, PriceRule, VehicleClass,
};
use crate::models::session::SessionContext;
use crate::repositories::PricingAdminStore;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult, StoreError};
use crate::utils::validation::{non_blank, normalize_currency};

pub const DUPLICATE_PRICE_RULE: &str =
    "a price rule for this package and vehicle class already exists";
pub const DUPLICATE_VEHICLE_CLASS: &str = "this vehicle class key is already in use";

#[derive(Debug, Clone)]
pub struct PriceListInput {
    pub name: String,
    pub is_active: bool,
    pub valid_from: Option<chrono::NaiveDate>,
    pub valid_to: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct PriceRuleInput {
    pub package_id: Uuid,
    pub vehicle_class_id: Uuid,
    pub amount_minor_units: i64,
    pub currency: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VehicleClassInput {
    pub key: String,
    pub label: String,
    pub is_active: bool,
    pub sort_order: i32,
}

fn map_conflict(error: StoreError, message: &str) -> AppError {
    match error {
        StoreError::Conflict => AppError::Conflict(message.to_string()),
        other => other.into(),
    }
}

#[derive(Clone)]
pub struct PricingAdminService {
    store: Arc<dyn PricingAdminStore>,
    default_currency: String,
}

impl PricingAdminService {
    pub fn new(store: Arc<dyn PricingAdminStore>, default_currency: String) -> Self {
        Self {
            store,
            default_currency,
        }
    }

    pub async fn list_price_lists(&self, session: &SessionContext) -> AppResult<Vec<PriceList>> {
        session.require_job_manager("manage pricing")?;
        let branch_id = session.require_branch()?;
        Ok(self.store.list_price_lists(branch_id).await?)
    }

    /// Crea la lista o la actualiza cuando se indica `price_list_id`
    pub async fn save_price_list(
        &self,
        session: &SessionContext,
        price_list_id: Option<Uuid>,
        input: PriceListInput,
    ) -> AppResult<PriceList> {
        session.require_job_manager("manage pricing")?;
        let branch_id = session.require_branch()?;

        let name = non_blank(Some(input.name.as_str()))
            .ok_or_else(|| validation_error("name", "price list name is required"))?;
        if let (Some(from), Some(to)) = (input.valid_from, input.valid_to) {
            if from > to {
                return Err(validation_error("valid_from", "valid_from must not be after valid_to"));
            }
        }

        let list = NewPriceList {
            branch_id,
            name,
            is_active: input.is_active,
            valid_from: input.valid_from,
            valid_to: input.valid_to,
        };

        let saved = match price_list_id {
            Some(id) => self
                .store
                .update_price_list(id, list)
                .await?
                .ok_or_else(|| not_found_error("PriceList", &id.to_string()))?,
            None => self.store.insert_price_list(list).await?,
        };

        info!("🏷️ Lista de precios {} guardada en {}", saved.id, branch_id);
        Ok(saved)
    }

    pub async fn list_rules(
        &self,
        session: &SessionContext,
        price_list_id: Uuid,
    ) -> AppResult<Vec<PriceRule>> {
        session.require_job_manager("manage pricing")?;
        let branch_id = session.require_branch()?;
        self.owned_list(branch_id, price_list_id).await?;

        Ok(self.store.list_price_rules(price_list_id).await?)
    }

    pub async fn save_rule(
        &self,
        session: &SessionContext,
        price_list_id: Uuid,
        rule_id: Option<Uuid>,
        input: PriceRuleInput,
    ) -> AppResult<PriceRule> {
        session.require_job_manager("manage pricing")?;
        let branch_id = session.require_branch()?;

        if input.amount_minor_units <= 0 {
            return Err(validation_error(
                "amount_minor_units",
                "amount must be greater than zero",
            ));
        }
        self.owned_list(branch_id, price_list_id).await?;

        let rule = NewPriceRule {
            price_list_id,
            package_id: input.package_id,
            vehicle_class_id: input.vehicle_class_id,
            amount_minor_units: input.amount_minor_units,
            currency: normalize_currency(input.currency.as_deref(), &self.default_currency),
        };

        let result = match rule_id {
            Some(id) => self
                .store
                .update_price_rule(id, rule)
                .await
                .map_err(|e| map_conflict(e, DUPLICATE_PRICE_RULE))?
                .ok_or_else(|| not_found_error("PriceRule", &id.to_string())),
            None => self
                .store
                .insert_price_rule(rule)
                .await
                .map_err(|e| map_conflict(e, DUPLICATE_PRICE_RULE)),
        };

        if let Err(AppError::Conflict(_)) = &result {
            warn!("⚠️ Regla duplicada en la lista {}", price_list_id);
        }
        result
    }

    pub async fn delete_rule(&self, session: &SessionContext, rule_id: Uuid) -> AppResult<()> {
        session.require_job_manager("manage pricing")?;
        let branch_id = session.require_branch()?;

        if !self.store.delete_price_rule(branch_id, rule_id).await? {
            return Err(not_found_error("PriceRule", &rule_id.to_string()));
        }

        info!("🗑️ Regla de precio {} eliminada", rule_id);
        Ok(())
    }

    pub async fn list_vehicle_classes(&self, session: &SessionContext) -> AppResult<Vec<VehicleClass>> {
        session.require_operator("list vehicle classes")?;
        Ok(self.store.list_vehicle_classes().await?)
    }

    pub async fn save_vehicle_class(
        &self,
        session: &SessionContext,
        vehicle_class_id: Option<Uuid>,
        input: VehicleClassInput,
    ) -> AppResult<VehicleClass> {
        session.require_job_manager("manage vehicle classes")?;

        let key = non_blank(Some(input.key.as_str()))
            .map(|k| k.to_lowercase())
            .ok_or_else(|| validation_error("key", "vehicle class key is required"))?;
        let label = non_blank(Some(input.label.as_str()))
            .ok_or_else(|| validation_error("label", "vehicle class label is required"))?;

        let class = NewVehicleClass {
            key,
            label,
            is_active: input.is_active,
            sort_order: input.sort_order,
        };

        let saved = match vehicle_class_id {
            Some(id) => self
                .store
                .update_vehicle_class(id, class)
                .await
                .map_err(|e| map_conflict(e, DUPLICATE_VEHICLE_CLASS))?
                .ok_or_else(|| not_found_error("VehicleClass", &id.to_string()))?,
            None => self
                .store
                .insert_vehicle_class(class)
                .await
                .map_err(|e| map_conflict(e, DUPLICATE_VEHICLE_CLASS))?,
        };

        info!("🚙 Clase de vehículo {} ({}) guardada", saved.key, saved.id);
        Ok(saved)
    }

    async fn owned_list(&self, branch_id: Uuid, price_list_id: Uuid) -> AppResult<PriceList> {
        self.store
            .find_price_list(branch_id, price_list_id)
            .await?
            .ok_or_else(|| not_found_error("PriceList", &price_list_id.to_string()))
    }
}
