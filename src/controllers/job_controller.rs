use uuid::Uuid;
use validator::Validate;

use crate::dto::job_dto::{
    ChangeStatusRequest, CreateJobRequest, JobHistoryQuery, PaymentResponse, ReassignRequest,
    RecordPaymentRequest,
};
use crate::dto::ApiResponse;
use crate::models::job::Job;
use crate::models::session::SessionContext;
use crate::services::job_service::{
    ArchiveOutcome, ClaimOutcome, IntakeOutcome, JobDetail, JobService, ALREADY_ARCHIVED,
    ARCHIVE_REQUIRES_COMPLETION, ARCHIVE_REQUIRES_PAYMENT, CLAIM_REJECTED,
};
use crate::utils::errors::AppError;

pub struct JobController {
    service: JobService,
}

impl JobController {
    pub fn new(service: JobService) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        session: &SessionContext,
        request: CreateJobRequest,
    ) -> Result<ApiResponse<IntakeOutcome>, AppError> {
        request.validate()?;

        let outcome = self.service.create_job(session, request.into()).await?;

        // Las advertencias del precio viajan también en el mensaje para el formulario
        if outcome.price.warnings.is_empty() {
            Ok(ApiResponse::success(outcome))
        } else {
            let message = outcome.price.warnings.join("; ");
            Ok(ApiResponse::success_with_message(outcome, message))
        }
    }

    pub async fn board(&self, session: &SessionContext) -> Result<ApiResponse<Vec<Job>>, AppError> {
        let jobs = self.service.active_board(session).await?;
        Ok(ApiResponse::success(jobs))
    }

    pub async fn history(
        &self,
        session: &SessionContext,
        query: JobHistoryQuery,
    ) -> Result<ApiResponse<Vec<Job>>, AppError> {
        query.validate()?;

        let jobs = self.service.archived(session, query.search, query.limit).await?;
        Ok(ApiResponse::success(jobs))
    }

    pub async fn detail(
        &self,
        session: &SessionContext,
        job_id: Uuid,
    ) -> Result<ApiResponse<JobDetail>, AppError> {
        let detail = self.service.detail(session, job_id).await?;
        Ok(ApiResponse::success(detail))
    }

    pub async fn change_status(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        request: ChangeStatusRequest,
    ) -> Result<ApiResponse<Job>, AppError> {
        let job = self.service.change_status(session, job_id, request.status).await?;
        Ok(ApiResponse::success(job))
    }

    pub async fn claim(
        &self,
        session: &SessionContext,
        job_id: Uuid,
    ) -> Result<ApiResponse<Job>, AppError> {
        match self.service.claim(session, job_id).await? {
            ClaimOutcome::Claimed(job) => Ok(ApiResponse::success(job)),
            ClaimOutcome::Rejected => Ok(ApiResponse::rejected(CLAIM_REJECTED)),
        }
    }

    pub async fn reassign(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        request: ReassignRequest,
    ) -> Result<ApiResponse<Job>, AppError> {
        let job = self
            .service
            .reassign(session, job_id, request.assignee_id)
            .await?;
        Ok(ApiResponse::success(job))
    }

    pub async fn record_payment(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        request: RecordPaymentRequest,
    ) -> Result<ApiResponse<PaymentResponse>, AppError> {
        request.validate()?;

        let (payment, job) = self
            .service
            .record_payment(session, job_id, request.amount, request.method)
            .await?;
        Ok(ApiResponse::success(PaymentResponse { payment, job }))
    }

    pub async fn archive(
        &self,
        session: &SessionContext,
        job_id: Uuid,
    ) -> Result<ApiResponse<Job>, AppError> {
        match self.service.archive(session, job_id).await? {
            ArchiveOutcome::Archived(job) => Ok(ApiResponse::success(job)),
            ArchiveOutcome::NotPaid => Ok(ApiResponse::rejected(ARCHIVE_REQUIRES_PAYMENT)),
            ArchiveOutcome::NotCompleted => Ok(ApiResponse::rejected(ARCHIVE_REQUIRES_COMPLETION)),
            ArchiveOutcome::AlreadyArchived => Ok(ApiResponse::rejected(ALREADY_ARCHIVED)),
        }
    }
}
