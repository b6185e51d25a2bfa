//! Repositorio del catálogo
//!
//! Servicios y paquetes comparten forma: tabla principal más tabla de ajustes
//! por sucursal. Los paquetes no tienen precio ni duración propios.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::catalog::{CatalogKind, CatalogOverride, CatalogRow};
use crate::utils::errors::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Elementos universales y privados de la sucursal con su ajuste unido
    async fn list_items(
        &self,
        kind: CatalogKind,
        branch_id: Uuid,
    ) -> Result<Vec<CatalogRow>, StoreError>;

    /// Elemento visible desde la sucursal (universal o propio)
    async fn find_item(
        &self,
        kind: CatalogKind,
        branch_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<CatalogRow>, StoreError>;

    async fn upsert_override(
        &self,
        kind: CatalogKind,
        item: CatalogOverride,
    ) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_sql(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Service => {
            r#"
            SELECT s.id, s.branch_id, s.name, s.is_active, s.price, s.duration_min, s.sort_order,
                   o.is_active AS override_active,
                   o.custom_price AS override_price,
                   o.custom_duration_min AS override_duration_min
            FROM services s
            LEFT JOIN branch_service_overrides o
                   ON o.service_id = s.id AND o.branch_id = $1
            WHERE (s.branch_id IS NULL OR s.branch_id = $1)
            "#
        }
        CatalogKind::Package => {
            r#"
            SELECT p.id, p.branch_id, p.name, p.is_active,
                   NULL::BIGINT AS price, NULL::INTEGER AS duration_min, p.sort_order,
                   o.is_active AS override_active,
                   o.custom_price AS override_price,
                   o.custom_duration_min AS override_duration_min
            FROM packages p
            LEFT JOIN branch_package_overrides o
                   ON o.package_id = p.id AND o.branch_id = $1
            WHERE (p.branch_id IS NULL OR p.branch_id = $1)
            "#
        }
    }
}

fn id_column(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Service => "s.id",
        CatalogKind::Package => "p.id",
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn list_items(
        &self,
        kind: CatalogKind,
        branch_id: Uuid,
    ) -> Result<Vec<CatalogRow>, StoreError> {
        let rows = sqlx::query_as::<_, CatalogRow>(select_sql(kind))
            .bind(branch_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn find_item(
        &self,
        kind: CatalogKind,
        branch_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<CatalogRow>, StoreError> {
        let sql = format!("{} AND {} = $2", select_sql(kind), id_column(kind));
        let row = sqlx::query_as::<_, CatalogRow>(&sql)
            .bind(branch_id)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn upsert_override(
        &self,
        kind: CatalogKind,
        item: CatalogOverride,
    ) -> Result<(), StoreError> {
        let sql = match kind {
            CatalogKind::Service => {
                r#"
                INSERT INTO branch_service_overrides (branch_id, service_id, is_active, custom_price, custom_duration_min)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (branch_id, service_id) DO UPDATE SET
                    is_active = EXCLUDED.is_active,
                    custom_price = EXCLUDED.custom_price,
                    custom_duration_min = EXCLUDED.custom_duration_min
                "#
            }
            CatalogKind::Package => {
                r#"
                INSERT INTO branch_package_overrides (branch_id, package_id, is_active, custom_price, custom_duration_min)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (branch_id, package_id) DO UPDATE SET
                    is_active = EXCLUDED.is_active,
                    custom_price = EXCLUDED.custom_price,
                    custom_duration_min = EXCLUDED.custom_duration_min
                "#
            }
        };

        sqlx::query(sql)
            .bind(item.branch_id)
            .bind(item.item_id)
            .bind(item.is_active)
            .bind(item.custom_price)
            .bind(item.custom_duration_min)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
