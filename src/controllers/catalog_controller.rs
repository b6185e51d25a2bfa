use uuid::Uuid;
use validator::Validate;

use crate::dto::catalog_dto::CatalogOverrideRequest;
use crate::dto::ApiResponse;
use crate::models::catalog::{CatalogKind, EffectiveCatalogItem};
use crate::models::session::SessionContext;
use crate::services::catalog_service::CatalogService;
use crate::utils::errors::AppError;

pub struct CatalogController {
    service: CatalogService,
}

impl CatalogController {
    pub fn new(service: CatalogService) -> Self {
        Self { service }
    }

    pub async fn list(
        &self,
        session: &SessionContext,
        kind: CatalogKind,
    ) -> Result<ApiResponse<Vec<EffectiveCatalogItem>>, AppError> {
        let items = self.service.list_effective(session, kind).await?;
        Ok(ApiResponse::success(items))
    }

    pub async fn set_override(
        &self,
        session: &SessionContext,
        kind: CatalogKind,
        item_id: Uuid,
        request: CatalogOverrideRequest,
    ) -> Result<ApiResponse<EffectiveCatalogItem>, AppError> {
        request.validate()?;

        let item = self
            .service
            .set_override(session, kind, item_id, request.into())
            .await?;
        Ok(ApiResponse::success(item))
    }
}
