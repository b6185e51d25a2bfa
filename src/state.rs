//! Estado compartido de la aplicación
//!
//! Este módulo define el estado compartido que se pasa a través del router de
//! Axum. Los servicios se construyen una sola vez sobre los traits de
//! almacenamiento.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    AppointmentRepository, AppointmentStore, CatalogRepository, CatalogStore, JobRepository,
    JobStore, PricingAdminStore, PricingRepository, PricingStore, StaffRepository, StaffStore,
    StatsRepository, StatsStore,
};
use crate::services::{
    AppointmentService, CatalogService, JobService, PriceResolver, PricingAdminService,
    StatsService,
};

/// Almacenes con los que se arma el estado
pub struct Stores {
    pub pricing: Arc<dyn PricingStore>,
    pub pricing_admin: Arc<dyn PricingAdminStore>,
    pub staff: Arc<dyn StaffStore>,
    pub jobs: Arc<dyn JobStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub stats: Arc<dyn StatsStore>,
}

impl Stores {
    /// Repositorios PostgreSQL sobre un mismo pool
    pub fn postgres(pool: PgPool) -> Self {
        let pricing = Arc::new(PricingRepository::new(pool.clone()));

        Self {
            pricing: pricing.clone(),
            pricing_admin: pricing,
            staff: Arc::new(StaffRepository::new(pool.clone())),
            jobs: Arc::new(JobRepository::new(pool.clone())),
            appointments: Arc::new(AppointmentRepository::new(pool.clone())),
            catalog: Arc::new(CatalogRepository::new(pool.clone())),
            stats: Arc::new(StatsRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub staff: Arc<dyn StaffStore>,
    pub resolver: PriceResolver,
    pub jobs: JobService,
    pub appointments: AppointmentService,
    pub catalog: CatalogService,
    pub stats: StatsService,
    pub pricing_admin: PricingAdminService,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self::from_stores(config, Stores::postgres(pool))
    }

    pub fn from_stores(config: EnvironmentConfig, stores: Stores) -> Self {
        let resolver = PriceResolver::new(stores.pricing, config.default_currency.clone());
        let jobs = JobService::new(
            stores.jobs,
            stores.staff.clone(),
            resolver.clone(),
            config.transition_policy,
        );

        Self {
            staff: stores.staff.clone(),
            appointments: AppointmentService::new(stores.appointments, jobs.clone()),
            catalog: CatalogService::new(stores.catalog),
            stats: StatsService::new(stores.stats, stores.staff),
            pricing_admin: PricingAdminService::new(
                stores.pricing_admin,
                config.default_currency.clone(),
            ),
            resolver,
            jobs,
            config: Arc::new(config),
        }
    }
}
