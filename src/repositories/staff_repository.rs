use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::branch::Branch;
use crate::models::staff::StaffProfile;
use crate::utils::errors::StoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffStore: Send + Sync {
    /// Perfil activo del usuario autenticado
    async fn find_active_profile(&self, user_id: Uuid) -> Result<Option<StaffProfile>, StoreError>;

    async fn find_active_branch(&self, branch_id: Uuid) -> Result<Option<Branch>, StoreError>;

    /// Personal activo asignado a la sucursal
    async fn list_branch_staff(&self, branch_id: Uuid) -> Result<Vec<StaffProfile>, StoreError>;
}

#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffStore for StaffRepository {
    async fn find_active_profile(&self, user_id: Uuid) -> Result<Option<StaffProfile>, StoreError> {
        let profile = sqlx::query_as::<_, StaffProfile>(
            "SELECT * FROM staff_profiles WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_active_branch(&self, branch_id: Uuid) -> Result<Option<Branch>, StoreError> {
        let branch = sqlx::query_as::<_, Branch>(
            "SELECT * FROM branches WHERE id = $1 AND is_active = TRUE",
        )
        .bind(branch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }

    async fn list_branch_staff(&self, branch_id: Uuid) -> Result<Vec<StaffProfile>, StoreError> {
        let profiles = sqlx::query_as::<_, StaffProfile>(
            r#"
            SELECT * FROM staff_profiles
            WHERE branch_id = $1 AND is_active = TRUE
            ORDER BY full_name
            "#,
        )
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}
