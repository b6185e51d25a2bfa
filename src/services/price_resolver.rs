//! Resolvedor de precios
//!
//! Dado sucursal, paquete, clase de vehículo y la fecha de hoy, elige la lista
//! de precios vigente más reciente que tenga una regla exacta para el par.
//! Solo lectura; el mismo resultado para los mismos datos y la misma fecha.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::models::pricing::{PriceBreakdown, PriceList, PriceResolution};
use crate::repositories::PricingStore;
use crate::utils::errors::AppResult;
use crate::utils::validation::normalize_currency;

pub const NO_ACTIVE_PRICE_LIST: &str = "no active price list";
pub const NO_PRICE_RULE: &str = "no price rule for this package/vehicle-class combination";

#[derive(Clone)]
pub struct PriceResolver {
    store: Arc<dyn PricingStore>,
    default_currency: String,
}

impl PriceResolver {
    pub fn new(store: Arc<dyn PricingStore>, default_currency: String) -> Self {
        Self {
            store,
            default_currency,
        }
    }

    pub async fn resolve(
        &self,
        branch_id: Uuid,
        package_id: Uuid,
        vehicle_class_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<PriceResolution> {
        let lists = self.store.candidate_price_lists(branch_id, today).await?;
        let candidates = order_candidates(lists, today);

        if candidates.is_empty() {
            debug!("💸 Sin lista de precios vigente para la sucursal {}", branch_id);
            return Ok(PriceResolution::not_found(
                NO_ACTIVE_PRICE_LIST,
                &self.default_currency,
            ));
        }

        for list in &candidates {
            let Some(rule) = self
                .store
                .find_price_rule(list.id, package_id, vehicle_class_id)
                .await?
            else {
                continue;
            };

            let currency = normalize_currency(rule.currency.as_deref(), &self.default_currency);
            debug!(
                "💰 Precio resuelto desde la lista {} ({}): {} {}",
                list.name, list.id, rule.amount_minor_units, currency
            );

            return Ok(PriceResolution {
                found: true,
                amount: rule.amount_minor_units,
                currency: currency.clone(),
                breakdown: vec![PriceBreakdown {
                    price_list_id: list.id,
                    price_list_name: list.name.clone(),
                    package_id,
                    package_name: rule.package_name.unwrap_or_default(),
                    vehicle_class_id,
                    vehicle_class_label: rule.vehicle_class_label.unwrap_or_default(),
                    amount: rule.amount_minor_units,
                    currency,
                }],
                warnings: Vec::new(),
            });
        }

        debug!(
            "💸 Ninguna de las {} listas tiene regla para paquete {} / clase {}",
            candidates.len(),
            package_id,
            vehicle_class_id
        );
        Ok(PriceResolution::not_found(NO_PRICE_RULE, &self.default_currency))
    }
}

/// Filtra las listas vigentes en `today` y las ordena por `valid_from`
/// descendente (sin fecha al final) y por id ascendente en caso de empate.
pub fn order_candidates(lists: Vec<PriceList>, today: NaiveDate) -> Vec<PriceList> {
    let mut candidates: Vec<PriceList> = lists
        .into_iter()
        .filter(|list| list.is_in_effect(today))
        .collect();

    candidates.sort_by(|a, b| {
        let by_start = match (a.valid_from, b.valid_from) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_start.then_with(|| a.id.cmp(&b.id))
    });

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pricing::PriceRule;
    use crate::repositories::pricing_repository::MockPricingStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn list(id: u128, valid_from: Option<NaiveDate>) -> PriceList {
        PriceList {
            id: Uuid::from_u128(id),
            branch_id: Uuid::nil(),
            name: format!("list-{id}"),
            is_active: true,
            valid_from,
            valid_to: None,
            created_at: Utc::now(),
        }
    }

    fn rule(price_list_id: Uuid, amount: i64, currency: Option<&str>) -> PriceRule {
        PriceRule {
            id: Uuid::new_v4(),
            price_list_id,
            package_id: Uuid::nil(),
            vehicle_class_id: Uuid::nil(),
            amount_minor_units: amount,
            currency: currency.map(str::to_string),
            package_name: Some("Full Wash".to_string()),
            vehicle_class_label: Some("SUV".to_string()),
        }
    }

    #[test]
    fn test_order_candidates_latest_start_first_nulls_last() {
        let today = date(2025, 6, 15);
        let ordered = order_candidates(
            vec![
                list(1, None),
                list(2, Some(date(2025, 1, 1))),
                list(3, Some(date(2025, 5, 1))),
                list(4, Some(date(2025, 7, 1))),
            ],
            today,
        );

        let ids: Vec<u128> = ordered.iter().map(|l| l.id.as_u128()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_order_candidates_tie_broken_by_id() {
        let start = Some(date(2025, 1, 1));
        let ordered = order_candidates(vec![list(9, start), list(5, start)], date(2025, 6, 1));
        assert_eq!(ordered[0].id, Uuid::from_u128(5));
    }

    #[tokio::test]
    async fn test_resolve_without_lists_warns() {
        let mut store = MockPricingStore::new();
        store
            .expect_candidate_price_lists()
            .returning(|_, _| Ok(Vec::new()));
        store.expect_find_price_rule().never();

        let resolver = PriceResolver::new(Arc::new(store), "TRY".to_string());
        let result = resolver
            .resolve(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), date(2025, 6, 15))
            .await
            .unwrap();

        assert!(!result.found);
        assert_eq!(result.amount, 0);
        assert_eq!(result.currency, "TRY");
        assert_eq!(result.warnings, vec![NO_ACTIVE_PRICE_LIST.to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_falls_through_to_older_list() {
        let newer = list(1, Some(date(2025, 6, 1)));
        let older = list(2, Some(date(2025, 1, 1)));
        let older_id = older.id;
        let newer_id = newer.id;

        let mut store = MockPricingStore::new();
        store
            .expect_candidate_price_lists()
            .returning(move |_, _| Ok(vec![older.clone(), newer.clone()]));
        store
            .expect_find_price_rule()
            .with(eq(newer_id), mockall::predicate::always(), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| Ok(None));
        store
            .expect_find_price_rule()
            .with(eq(older_id), mockall::predicate::always(), mockall::predicate::always())
            .times(1)
            .returning(move |id, _, _| Ok(Some(rule(id, 45_000, Some(" ")))));

        let resolver = PriceResolver::new(Arc::new(store), "TRY".to_string());
        let result = resolver
            .resolve(Uuid::new_v4(), Uuid::nil(), Uuid::nil(), date(2025, 6, 15))
            .await
            .unwrap();

        assert!(result.found);
        assert_eq!(result.amount, 45_000);
        assert_eq!(result.currency, "TRY");
        assert!(result.warnings.is_empty());
        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].price_list_id, older_id);
        assert_eq!(result.breakdown[0].package_name, "Full Wash");
    }

    #[tokio::test]
    async fn test_resolve_with_lists_but_no_rule() {
        let mut store = MockPricingStore::new();
        store
            .expect_candidate_price_lists()
            .returning(|_, _| Ok(vec![list(1, None)]));
        store.expect_find_price_rule().returning(|_, _, _| Ok(None));

        let resolver = PriceResolver::new(Arc::new(store), "TRY".to_string());
        let result = resolver
            .resolve(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), date(2025, 6, 15))
            .await
            .unwrap();

        assert!(!result.found);
        assert_eq!(result.warnings, vec![NO_PRICE_RULE.to_string()]);
    }
}
