use serde::Deserialize;
use validator::Validate;

use crate::services::catalog_service::OverrideRequest;

/// Ajuste de un servicio o paquete universal para la sucursal actual
#[derive(Debug, Deserialize, Validate)]
pub struct CatalogOverrideRequest {
    pub is_active: bool,

    #[validate(range(min = 0))]
    pub custom_price: Option<i64>,

    #[validate(range(min = 1, max = 1440))]
    pub custom_duration_min: Option<i32>,
}

impl From<CatalogOverrideRequest> for OverrideRequest {
    fn from(request: CatalogOverrideRequest) -> Self {
        OverrideRequest {
            is_active: request.is_active,
            custom_price: request.custom_price,
            custom_duration_min: request.custom_duration_min,
        }
    }
}
