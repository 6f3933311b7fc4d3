use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;

use crate::entities::plans::{PlanEntity, SubscriptionActionEntity};

#[async_trait]
#[automock]
pub trait PlanRepository {
    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>>;

    async fn find_default(&self) -> Result<Option<PlanEntity>>;

    /// Plans currently offered: not disabled, with today inside the active
    /// window (open or absent ends never exclude).
    async fn list_offered(&self, today: NaiveDate) -> Result<Vec<PlanEntity>>;

    async fn action_codes(&self, plan_id: i64) -> Result<Vec<String>>;

    async fn list_actions(&self, plan_id: i64) -> Result<Vec<SubscriptionActionEntity>>;

    /// Administrative operation keeping the single-default invariant: unsets
    /// every other default and sets this plan, in one transaction.
    async fn set_default_plan(&self, plan_id: i64) -> Result<()>;
}
