use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::stats::{DateRange, StatsPeriod};

/// `?period=thisMonth` o `?period=custom&from=2025-01-01&to=2025-01-31`
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub period: StatsPeriod,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl StatsQuery {
    /// Rango personalizado solo cuando llegan ambos extremos
    pub fn custom_range(&self) -> Option<DateRange> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some(DateRange { from, to }),
            _ => None,
        }
    }
}
