use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use domain::{
    entities::plans::PlanEntity,
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::usecases::error::{ApiError, ApiResult};

/// Gate consulted by other usecases for plan-granted actions. Kept as a trait
/// so callers can be tested without wiring the full resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionGate: Send + Sync {
    async fn check_action(&self, user_id: Uuid, action_code: &str) -> ApiResult<bool>;

    async fn require_action(&self, user_id: Uuid, action_code: &str) -> ApiResult<()>;
}

/// Resolves the effective plan for a user: the active, non-frozen paid
/// subscription's plan, or the default plan fallback.
pub struct EntitlementResolver<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
}

impl<P, S> EntitlementResolver<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, subscription_repo: Arc<S>) -> Self {
        Self {
            plan_repo,
            subscription_repo,
        }
    }

    pub async fn active_plan(&self, user_id: Uuid) -> ApiResult<PlanEntity> {
        self.active_plan_on(user_id, Utc::now().date_naive()).await
    }

    pub async fn active_plan_on(&self, user_id: Uuid, today: NaiveDate) -> ApiResult<PlanEntity> {
        if let Some(subscription) = self
            .subscription_repo
            .find_active_on(user_id, today)
            .await?
        {
            let frozen = self
                .subscription_repo
                .has_freeze_on(subscription.id, today)
                .await?;

            if frozen {
                debug!(
                    %user_id,
                    subscription_id = subscription.id,
                    "entitlements: subscription is frozen, falling back to default plan"
                );
            } else {
                match self.plan_repo.find_by_id(subscription.plan_id).await? {
                    Some(plan) => {
                        debug!(
                            %user_id,
                            plan_id = plan.id,
                            "entitlements: using active subscription plan"
                        );
                        return Ok(plan);
                    }
                    None => {
                        warn!(
                            %user_id,
                            plan_id = subscription.plan_id,
                            "entitlements: subscription references a missing plan"
                        );
                    }
                }
            }
        }

        debug!(%user_id, "entitlements: falling back to default plan");
        self.plan_repo
            .find_default()
            .await?
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("no default plan configured")))
    }
}

#[async_trait]
impl<P, S> ActionGate for EntitlementResolver<P, S>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
{
    async fn check_action(&self, user_id: Uuid, action_code: &str) -> ApiResult<bool> {
        let plan = self.active_plan(user_id).await?;
        let codes = self.plan_repo.action_codes(plan.id).await?;
        Ok(codes.iter().any(|code| code == action_code))
    }

    async fn require_action(&self, user_id: Uuid, action_code: &str) -> ApiResult<()> {
        if self.check_action(user_id, action_code).await? {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "your plan does not include the {} action",
                action_code
            )))
        }
    }
}
