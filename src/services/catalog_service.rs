//! Servicio de catálogo por sucursal
//!
//! Resuelve la disponibilidad efectiva de servicios y paquetes una vez por
//! lectura y gestiona los ajustes de los elementos universales.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::models::catalog::{CatalogKind, CatalogOverride, CatalogRow, EffectiveCatalogItem};
use crate::models::session::SessionContext;
use crate::repositories::CatalogStore;
use crate::utils::errors::{not_found_error, validation_error, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideRequest {
    pub is_active: bool,
    pub custom_price: Option<i64>,
    pub custom_duration_min: Option<i32>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Elementos universales y propios con los ajustes aplicados
    pub async fn list_effective(
        &self,
        session: &SessionContext,
        kind: CatalogKind,
    ) -> AppResult<Vec<EffectiveCatalogItem>> {
        let branch_id = session.require_branch()?;
        let rows = self.store.list_items(kind, branch_id).await?;
        Ok(effective_items(&rows))
    }

    pub async fn set_override(
        &self,
        session: &SessionContext,
        kind: CatalogKind,
        item_id: Uuid,
        request: OverrideRequest,
    ) -> AppResult<EffectiveCatalogItem> {
        session.require_job_manager("change catalog availability")?;
        let branch_id = session.require_branch()?;

        if request.custom_price.is_some_and(|p| p < 0) {
            return Err(validation_error("custom_price", "custom price must not be negative"));
        }
        if request.custom_duration_min.is_some_and(|d| d <= 0) {
            return Err(validation_error(
                "custom_duration_min",
                "custom duration must be greater than zero",
            ));
        }

        let row = self.find(kind, branch_id, item_id).await?;
        if row.branch_id.is_some() {
            return Err(validation_error(
                "item_id",
                "branch-private items cannot be overridden",
            ));
        }

        self.store
            .upsert_override(
                kind,
                CatalogOverride {
                    branch_id,
                    item_id,
                    is_active: request.is_active,
                    custom_price: request.custom_price,
                    custom_duration_min: request.custom_duration_min,
                },
            )
            .await?;

        info!(
            "🧾 Ajuste de {} {} en la sucursal {} (activo: {})",
            kind.as_str(),
            item_id,
            branch_id,
            request.is_active
        );

        let updated = self.find(kind, branch_id, item_id).await?;
        Ok(EffectiveCatalogItem::from(&updated))
    }

    async fn find(&self, kind: CatalogKind, branch_id: Uuid, item_id: Uuid) -> AppResult<CatalogRow> {
        self.store
            .find_item(kind, branch_id, item_id)
            .await?
            .ok_or_else(|| not_found_error(kind.as_str(), &item_id.to_string()))
    }
}

/// Ordenados por `sort_order` y después por nombre
pub fn effective_items(rows: &[CatalogRow]) -> Vec<EffectiveCatalogItem> {
    let mut items: Vec<EffectiveCatalogItem> = rows.iter().map(EffectiveCatalogItem::from).collect();
    items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
    items
}
