//! Repositorio de precios
//!
//! Listas de precios, reglas y clases de vehículo sobre PostgreSQL.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::pricing::{
    NewPriceList, NewPriceRule, NewVehicleClass, PriceList, PriceRule, VehicleClass,
};
use crate::utils::errors::StoreError;

/// Lecturas que necesita el resolvedor de precios
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingStore: Send + Sync {
    /// Listas activas de la sucursal vigentes en `today`
    async fn candidate_price_lists(
        &self,
        branch_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<PriceList>, StoreError>;

    /// Regla exacta paquete × clase de vehículo dentro de una lista
    async fn find_price_rule(
        &self,
        price_list_id: Uuid,
        package_id: Uuid,
        vehicle_class_id: Uuid,
    ) -> Result<Option<PriceRule>, StoreError>;
}

/// Operaciones de administración de precios
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingAdminStore: Send + Sync {
    async fn list_price_lists(&self, branch_id: Uuid) -> Result<Vec<PriceList>, StoreError>;

    async fn find_price_list(
        &self,
        branch_id: Uuid,
        price_list_id: Uuid,
    ) -> Result<Option<PriceList>, StoreError>;

    async fn insert_price_list(&self, list: NewPriceList) -> Result<PriceList, StoreError>;

    async fn update_price_list(
        &self,
        price_list_id: Uuid,
        list: NewPriceList,
    ) -> Result<Option<PriceList>, StoreError>;

    async fn list_price_rules(&self, price_list_id: Uuid) -> Result<Vec<PriceRule>, StoreError>;

    async fn insert_price_rule(&self, rule: NewPriceRule) -> Result<PriceRule, StoreError>;

    async fn update_price_rule(
        &self,
        rule_id: Uuid,
        rule: NewPriceRule,
    ) -> Result<Option<PriceRule>, StoreError>;

    /// Borra la regla solo si pertenece a una lista de la sucursal
    async fn delete_price_rule(&self, branch_id: Uuid, rule_id: Uuid) -> Result<bool, StoreError>;

    async fn list_vehicle_classes(&self) -> Result<Vec<VehicleClass>, StoreError>;

    async fn insert_vehicle_class(
        &self,
        class: NewVehicleClass,
    ) -> Result<VehicleClass, StoreError>;

    async fn update_vehicle_class(
        &self,
        vehicle_class_id: Uuid,
        class: NewVehicleClass,
    ) -> Result<Option<VehicleClass>, StoreError>;
}

const PRICE_RULE_SELECT: &str = r#"
    SELECT r.id, r.price_list_id, r.package_id, r.vehicle_class_id,
           r.amount_minor_units, r.currency,
           p.name AS package_name, vc.label AS vehicle_class_label
    FROM price_rules r
    LEFT JOIN packages p ON p.id = r.package_id
    LEFT JOIN vehicle_classes vc ON vc.id = r.vehicle_class_id
"#;

#[derive(Clone)]
pub struct PricingRepository {
    pool: PgPool,
}

impl PricingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rule(&self, rule_id: Uuid) -> Result<Option<PriceRule>, StoreError> {
        let rule = sqlx::query_as::<_, PriceRule>(&format!("{PRICE_RULE_SELECT} WHERE r.id = $1"))
            .bind(rule_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rule)
    }
}

#[async_trait]
impl PricingStore for PricingRepository {
    async fn candidate_price_lists(
        &self,
        branch_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<PriceList>, StoreError> {
        let lists = sqlx::query_as::<_, PriceList>(
            r#"
            SELECT * FROM price_lists
            WHERE branch_id = $1
              AND is_active = TRUE
              AND (valid_from IS NULL OR valid_from <= $2)
              AND (valid_to IS NULL OR valid_to >= $2)
            ORDER BY valid_from DESC NULLS LAST, id ASC
            "#,
        )
        .bind(branch_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(lists)
    }

    async fn find_price_rule(
        &self,
        price_list_id: Uuid,
        package_id: Uuid,
        vehicle_class_id: Uuid,
    ) -> Result<Option<PriceRule>, StoreError> {
        let rule = sqlx::query_as::<_, PriceRule>(&format!(
            "{PRICE_RULE_SELECT} WHERE r.price_list_id = $1 AND r.package_id = $2 AND r.vehicle_class_id = $3"
        ))
        .bind(price_list_id)
        .bind(package_id)
        .bind(vehicle_class_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }
}

#[async_trait]
impl PricingAdminStore for PricingRepository {
    async fn list_price_lists(&self, branch_id: Uuid) -> Result<Vec<PriceList>, StoreError> {
        let lists = sqlx::query_as::<_, PriceList>(
            "SELECT * FROM price_lists WHERE branch_id = $1 ORDER BY created_at DESC",
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lists)
    }

    async fn find_price_list(
        &self,
        branch_id: Uuid,
        price_list_id: Uuid,
    ) -> Result<Option<PriceList>, StoreError> {
        let list = sqlx::query_as::<_, PriceList>(
            "SELECT * FROM price_lists WHERE id = $1 AND branch_id = $2",
        )
        .bind(price_list_id)
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(list)
    }

    async fn insert_price_list(&self, list: NewPriceList) -> Result<PriceList, StoreError> {
        let created = sqlx::query_as::<_, PriceList>(
            r#"
            INSERT INTO price_lists (id, branch_id, name, is_active, valid_from, valid_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(list.branch_id)
        .bind(list.name)
        .bind(list.is_active)
        .bind(list.valid_from)
        .bind(list.valid_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_price_list(
        &self,
        price_list_id: Uuid,
        list: NewPriceList,
    ) -> Result<Option<PriceList>, StoreError> {
        let updated = sqlx::query_as::<_, PriceList>(
            r#"
            UPDATE price_lists
            SET name = $3, is_active = $4, valid_from = $5, valid_to = $6
            WHERE id = $1 AND branch_id = $2
            RETURNING *
            "#,
        )
        .bind(price_list_id)
        .bind(list.branch_id)
        .bind(list.name)
        .bind(list.is_active)
        .bind(list.valid_from)
        .bind(list.valid_to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn list_price_rules(&self, price_list_id: Uuid) -> Result<Vec<PriceRule>, StoreError> {
        let rules = sqlx::query_as::<_, PriceRule>(&format!(
            "{PRICE_RULE_SELECT} WHERE r.price_list_id = $1 ORDER BY p.name, vc.sort_order"
        ))
        .bind(price_list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    async fn insert_price_rule(&self, rule: NewPriceRule) -> Result<PriceRule, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO price_rules (id, price_list_id, package_id, vehicle_class_id, amount_minor_units, currency)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(rule.price_list_id)
        .bind(rule.package_id)
        .bind(rule.vehicle_class_id)
        .bind(rule.amount_minor_units)
        .bind(rule.currency)
        .fetch_one(&self.pool)
        .await?;

        self.fetch_rule(id).await?.ok_or(StoreError::NotFound)
    }

    async fn update_price_rule(
        &self,
        rule_id: Uuid,
        rule: NewPriceRule,
    ) -> Result<Option<PriceRule>, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE price_rules
            SET package_id = $3, vehicle_class_id = $4, amount_minor_units = $5, currency = $6
            WHERE id = $1 AND price_list_id = $2
            "#,
        )
        .bind(rule_id)
        .bind(rule.price_list_id)
        .bind(rule.package_id)
        .bind(rule.vehicle_class_id)
        .bind(rule.amount_minor_units)
        .bind(rule.currency)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_rule(rule_id).await
    }

    async fn delete_price_rule(&self, branch_id: Uuid, rule_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM price_rules r
            USING price_lists l
            WHERE r.id = $1 AND l.id = r.price_list_id AND l.branch_id = $2
            "#,
        )
        .bind(rule_id)
        .bind(branch_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_vehicle_classes(&self) -> Result<Vec<VehicleClass>, StoreError> {
        let classes = sqlx::query_as::<_, VehicleClass>(
            "SELECT * FROM vehicle_classes WHERE is_active = TRUE ORDER BY sort_order, label",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    async fn insert_vehicle_class(
        &self,
        class: NewVehicleClass,
    ) -> Result<VehicleClass, StoreError> {
        let created = sqlx::query_as::<_, VehicleClass>(
            r#"
            INSERT INTO vehicle_classes (id, key, label, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(class.key)
        .bind(class.label)
        .bind(class.is_active)
        .bind(class.sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_vehicle_class(
        &self,
        vehicle_class_id: Uuid,
        class: NewVehicleClass,
    ) -> Result<Option<VehicleClass>, StoreError> {
        let updated = sqlx::query_as::<_, VehicleClass>(
            r#"
            UPDATE vehicle_classes
            SET key = $2, label = $3, is_active = $4, sort_order = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle_class_id)
        .bind(class.key)
        .bind(class.label)
        .bind(class.is_active)
        .bind(class.sort_order)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
