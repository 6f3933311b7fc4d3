use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::users::UserEntity;

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;

    /// Resolves the id only when it belongs to an active user with the
    /// master role.
    async fn find_active_master(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
}
