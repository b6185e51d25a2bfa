//! Modelos del catálogo (servicios y paquetes)
//!
//! Un elemento es universal (`branch_id` nulo, visible en todas las sucursales)
//! o privado de una sucursal. Los universales admiten una fila de ajuste por
//! sucursal que sustituye su disponibilidad, precio y duración.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fila del catálogo unida con el ajuste de la sucursal consultada (si existe)
#[derive(Debug, Clone, FromRow)]
pub struct CatalogRow {
    pub id: Uuid,
    pub branch_id: Option<Uuid>,
    pub name: String,
    pub is_active: bool,
    pub price: Option<i64>,
    pub duration_min: Option<i32>,
    pub sort_order: i32,
    pub override_active: Option<bool>,
    pub override_price: Option<i64>,
    pub override_duration_min: Option<i32>,
}

/// Disponibilidad de un elemento en una sucursal concreta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Global {
        active: bool,
        price: Option<i64>,
        duration_min: Option<i32>,
    },
    GlobalWithOverride {
        active: bool,
        price: Option<i64>,
        duration_min: Option<i32>,
    },
    BranchPrivate {
        active: bool,
        price: Option<i64>,
        duration_min: Option<i32>,
    },
}

impl Availability {
    /// El ajuste gana cuando existe; un precio o duración vacíos en el ajuste
    /// heredan el valor universal.
    pub fn from_row(row: &CatalogRow) -> Self {
        if row.branch_id.is_some() {
            return Availability::BranchPrivate {
                active: row.is_active,
                price: row.price,
                duration_min: row.duration_min,
            };
        }

        match row.override_active {
            Some(active) => Availability::GlobalWithOverride {
                active,
                price: row.override_price.or(row.price),
                duration_min: row.override_duration_min.or(row.duration_min),
            },
            None => Availability::Global {
                active: row.is_active,
                price: row.price,
                duration_min: row.duration_min,
            },
        }
    }

    pub fn scope(&self) -> CatalogScope {
        match self {
            Availability::Global { .. } => CatalogScope::Universal,
            Availability::GlobalWithOverride { .. } => CatalogScope::UniversalOverridden,
            Availability::BranchPrivate { .. } => CatalogScope::BranchPrivate,
        }
    }

    fn values(&self) -> (bool, Option<i64>, Option<i32>) {
        match *self {
            Availability::Global { active, price, duration_min }
            | Availability::GlobalWithOverride { active, price, duration_min }
            | Availability::BranchPrivate { active, price, duration_min } => {
                (active, price, duration_min)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogScope {
    Universal,
    UniversalOverridden,
    BranchPrivate,
}

/// Vista plana y efectiva de un elemento del catálogo en una sucursal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveCatalogItem {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub price: Option<i64>,
    pub duration_min: Option<i32>,
    pub sort_order: i32,
    pub scope: CatalogScope,
}

impl From<&CatalogRow> for EffectiveCatalogItem {
    fn from(row: &CatalogRow) -> Self {
        let availability = Availability::from_row(row);
        let (is_active, price, duration_min) = availability.values();

        Self {
            id: row.id,
            name: row.name.clone(),
            is_active,
            price,
            duration_min,
            sort_order: row.sort_order,
            scope: availability.scope(),
        }
    }
}

/// Ajuste de un elemento universal para una sucursal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOverride {
    pub branch_id: Uuid,
    pub item_id: Uuid,
    pub is_active: bool,
    pub custom_price: Option<i64>,
    pub custom_duration_min: Option<i32>,
}

/// Tipo de elemento del catálogo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Service,
    Package,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Service => "service",
            CatalogKind::Package => "package",
        }
    }
}
