//! Servicio de estadísticas
//!
//! Agregados sobre los trabajos archivados de una sucursal y rendimiento del
//! personal dentro de un periodo.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::models::job::PaymentStatus;
use crate::models::session::SessionContext;
use crate::models::staff::{StaffProfile, StaffRole};
use crate::models::stats::{
    BranchStats, ClosedJobFact, CountBucket, DateRange, StatsPeriod, WorkerStat, WorkerStats,
};
use crate::repositories::{StaffStore, StatsStore};
use crate::utils::errors::{validation_error, AppResult};

const UNKNOWN_KEY: &str = "unknown";

fn all_time() -> DateRange {
    DateRange {
        from: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN),
        to: NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX),
    }
}

/// Rango inclusivo del periodo relativo a `today`
pub fn date_range(period: StatsPeriod, today: NaiveDate, custom: Option<DateRange>) -> DateRange {
    let month_start = today.with_day(1).unwrap_or(today);

    match period {
        StatsPeriod::Last7Days => DateRange {
            from: today - Duration::days(7),
            to: today,
        },
        StatsPeriod::ThisWeek => DateRange {
            from: today - Duration::days(i64::from(today.weekday().num_days_from_monday())),
            to: today,
        },
        StatsPeriod::ThisMonth => DateRange {
            from: month_start,
            to: today,
        },
        StatsPeriod::LastMonth => {
            let last_day = month_start.pred_opt().unwrap_or(month_start);
            DateRange {
                from: last_day.with_day(1).unwrap_or(last_day),
                to: last_day,
            }
        }
        StatsPeriod::All => all_time(),
        StatsPeriod::Custom => custom.unwrap_or_else(all_time),
    }
}

/// Límites `[desde, hasta)` en UTC para las consultas
fn bounds(range: DateRange) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&range.from.and_time(NaiveTime::default()));
    let end_day = range.to.succ_opt().unwrap_or(range.to);
    let end = Utc.from_utc_datetime(&end_day.and_time(NaiveTime::default()));
    (start, end)
}

fn count_by<'a>(keys: impl Iterator<Item = Option<&'a str>>) -> Vec<CountBucket> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for key in keys {
        let key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(UNKNOWN_KEY);
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }

    let mut buckets: Vec<CountBucket> = counts
        .into_iter()
        .map(|(key, count)| CountBucket { key, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets
}

pub fn branch_stats(range: DateRange, facts: &[ClosedJobFact]) -> BranchStats {
    let total_jobs = facts.len() as i64;
    let (revenue, pending_revenue) = facts.iter().fold((0i64, 0i64), |(paid, pending), f| {
        match f.payment_status {
            PaymentStatus::Paid => (paid + f.price, pending),
            PaymentStatus::Pending => (paid, pending + f.price),
        }
    });

    let average_job_value = if total_jobs == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(revenue) / Decimal::from(total_jobs)).round_dp(2)
    };

    BranchStats {
        range,
        total_jobs,
        revenue,
        pending_revenue,
        average_job_value,
        by_make: count_by(facts.iter().map(|f| f.make.as_deref())),
        by_package: count_by(facts.iter().map(|f| f.package_name.as_deref())),
        by_vehicle_class: count_by(facts.iter().map(|f| f.vehicle_class_label.as_deref())),
    }
}

fn counts_as_worker(role: StaffRole) -> bool {
    matches!(
        role,
        StaffRole::Staff | StaffRole::Manager | StaffRole::BranchAdmin
    )
}

pub fn worker_stats(
    range: DateRange,
    staff: &[StaffProfile],
    facts: &[ClosedJobFact],
    completions: &[(Uuid, i64)],
) -> WorkerStats {
    let completed_by: HashMap<Uuid, i64> = completions.iter().copied().collect();

    let mut workers: Vec<WorkerStat> = staff
        .iter()
        .filter(|p| p.is_active && counts_as_worker(p.role))
        .map(|p| {
            let claimed = facts
                .iter()
                .filter(|f| f.assigned_to == Some(p.user_id))
                .count() as i64;
            let completed = completed_by.get(&p.user_id).copied().unwrap_or(0);
            let completion_rate = if claimed == 0 {
                0
            } else {
                (completed as f64 * 100.0 / claimed as f64).round() as i64
            };

            WorkerStat {
                user_id: p.user_id,
                full_name: p.full_name.clone(),
                email: p.email.clone(),
                role: p.role,
                claimed,
                completed,
                completion_rate,
            }
        })
        .collect();

    workers.sort_by(|a, b| {
        b.completed
            .cmp(&a.completed)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });

    WorkerStats { range, workers }
}

#[derive(Clone)]
pub struct StatsService {
    stats: Arc<dyn StatsStore>,
    staff: Arc<dyn StaffStore>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsStore>, staff: Arc<dyn StaffStore>) -> Self {
        Self { stats, staff }
    }

    fn resolve_range(period: StatsPeriod, custom: Option<DateRange>) -> AppResult<DateRange> {
        if let Some(range) = custom {
            if range.from > range.to {
                return Err(validation_error("from", "from must not be after to"));
            }
        }
        Ok(date_range(period, Utc::now().date_naive(), custom))
    }

    pub async fn branch(
        &self,
        session: &SessionContext,
        period: StatsPeriod,
        custom: Option<DateRange>,
    ) -> AppResult<BranchStats> {
        session.require_reports()?;
        let branch_id = session.require_branch()?;
        let range = Self::resolve_range(period, custom)?;
        let (from, to) = bounds(range);

        let facts = self.stats.closed_job_facts(branch_id, from, to).await?;
        debug!("📊 {} trabajos archivados en {:?} para {}", facts.len(), range, branch_id);

        Ok(branch_stats(range, &facts))
    }

    pub async fn workers(
        &self,
        session: &SessionContext,
        period: StatsPeriod,
        custom: Option<DateRange>,
    ) -> AppResult<WorkerStats> {
        session.require_reports()?;
        let branch_id = session.require_branch()?;
        let range = Self::resolve_range(period, custom)?;
        let (from, to) = bounds(range);

        let staff = self.staff.list_branch_staff(branch_id).await?;
        let facts = self.stats.closed_job_facts(branch_id, from, to).await?;
        let completions = self.stats.completions_by_actor(branch_id, from, to).await?;

        Ok(worker_stats(range, &staff, &facts, &completions))
    }
}
