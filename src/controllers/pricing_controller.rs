use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::pricing_dto::{
    PriceListRequest, PriceRuleRequest, ResolvePriceQuery, VehicleClassRequest,
};
use crate::dto::ApiResponse;
use crate::models::pricing::{PriceList, PriceResolution, PriceRule, VehicleClass};
use crate::models::session::SessionContext;
use crate::services::price_resolver::PriceResolver;
use crate::services::pricing_admin_service::PricingAdminService;
use crate::utils::errors::AppError;

pub struct PricingController {
    resolver: PriceResolver,
    admin: PricingAdminService,
}

impl PricingController {
    pub fn new(resolver: PriceResolver, admin: PricingAdminService) -> Self {
        Self { resolver, admin }
    }

    /// Vista previa del precio para el formulario de recepción
    pub async fn resolve(
        &self,
        session: &SessionContext,
        query: ResolvePriceQuery,
    ) -> Result<ApiResponse<PriceResolution>, AppError> {
        let branch_id = session.require_branch()?;
        let resolution = self
            .resolver
            .resolve(
                branch_id,
                query.package_id,
                query.vehicle_class_id,
                Utc::now().date_naive(),
            )
            .await?;

        if resolution.found {
            Ok(ApiResponse::success(resolution))
        } else {
            let message = resolution.warnings.join("; ");
            Ok(ApiResponse::success_with_message(resolution, message))
        }
    }

    pub async fn list_price_lists(
        &self,
        session: &SessionContext,
    ) -> Result<ApiResponse<Vec<PriceList>>, AppError> {
        Ok(ApiResponse::success(self.admin.list_price_lists(session).await?))
    }

    pub async fn save_price_list(
        &self,
        session: &SessionContext,
        request: PriceListRequest,
    ) -> Result<ApiResponse<PriceList>, AppError> {
        request.validate()?;

        let id = request.id;
        let list = self.admin.save_price_list(session, id, request.into()).await?;
        Ok(ApiResponse::success(list))
    }

    pub async fn list_rules(
        &self,
        session: &SessionContext,
        price_list_id: Uuid,
    ) -> Result<ApiResponse<Vec<PriceRule>>, AppError> {
        Ok(ApiResponse::success(
            self.admin.list_rules(session, price_list_id).await?,
        ))
    }

    pub async fn save_rule(
        &self,
        session: &SessionContext,
        price_list_id: Uuid,
        request: PriceRuleRequest,
    ) -> Result<ApiResponse<PriceRule>, AppError> {
        request.validate()?;

        let id = request.id;
        let rule = self
            .admin
            .save_rule(session, price_list_id, id, request.into())
            .await?;
        Ok(ApiResponse::success(rule))
    }

    pub async fn delete_rule(
        &self,
        session: &SessionContext,
        rule_id: Uuid,
    ) -> Result<ApiResponse<Uuid>, AppError> {
        self.admin.delete_rule(session, rule_id).await?;
        Ok(ApiResponse::success(rule_id))
    }

    pub async fn list_vehicle_classes(
        &self,
        session: &SessionContext,
    ) -> Result<ApiResponse<Vec<VehicleClass>>, AppError> {
        Ok(ApiResponse::success(
            self.admin.list_vehicle_classes(session).await?,
        ))
    }

    pub async fn save_vehicle_class(
        &self,
        session: &SessionContext,
        request: VehicleClassRequest,
    ) -> Result<ApiResponse<VehicleClass>, AppError> {
        request.validate()?;

        let id = request.id;
        let class = self
            .admin
            .save_vehicle_class(session, id, request.into())
            .await?;
        Ok(ApiResponse::success(class))
    }
}
