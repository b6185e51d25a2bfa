use crate::dto::stats_dto::StatsQuery;
use crate::dto::ApiResponse;
use crate::models::session::SessionContext;
use crate::models::stats::{BranchStats, WorkerStats};
use crate::services::stats_service::StatsService;
use crate::utils::errors::AppError;

pub struct StatsController {
    service: StatsService,
}

impl StatsController {
    pub fn new(service: StatsService) -> Self {
        Self { service }
    }

    pub async fn branch(
        &self,
        session: &SessionContext,
        query: StatsQuery,
    ) -> Result<ApiResponse<BranchStats>, AppError> {
        let stats = self
            .service
            .branch(session, query.period, query.custom_range())
            .await?;
        Ok(ApiResponse::success(stats))
    }

    pub async fn workers(
        &self,
        session: &SessionContext,
        query: StatsQuery,
    ) -> Result<ApiResponse<WorkerStats>, AppError> {
        let stats = self
            .service
            .workers(session, query.period, query.custom_range())
            .await?;
        Ok(ApiResponse::success(stats))
    }
}
