use std::sync::Arc;

use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use chrono::{Days, Months, NaiveDate, Utc};
use domain::{
    entities::subscriptions::InsertSubscriptionEntity,
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        enums::duration_types::DurationType,
        plans::PlanDto,
        subscriptions::{
            ActivationResult, CurrentSubscriptionDto, SubscribeModel, SubscribeResponse,
        },
    },
};
use infra::payments::yookassa_client::{PaymentCreated, YookassaClient};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::usecases::{
    error::{ApiError, ApiResult},
    notify::{RealtimeNotifier, permissions_topic},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(
        &self,
        amount_minor: i32,
        currency: &str,
        description: &str,
        return_url: &str,
    ) -> AnyResult<PaymentCreated>;
}

#[async_trait]
impl PaymentGateway for YookassaClient {
    async fn create_payment(
        &self,
        amount_minor: i32,
        currency: &str,
        description: &str,
        return_url: &str,
    ) -> AnyResult<PaymentCreated> {
        self.create_payment(amount_minor, currency, description, return_url)
            .await
    }
}

/// Calendar-aware end of a validity window starting at `start`.
pub fn validity_end(
    start: NaiveDate,
    duration: i32,
    duration_type: DurationType,
) -> AnyResult<NaiveDate> {
    let duration = u32::try_from(duration).context("negative plan duration")?;
    let end = match duration_type {
        DurationType::Day => start.checked_add_days(Days::new(duration.into())),
        DurationType::Month => start.checked_add_months(Months::new(duration)),
        DurationType::Year => start.checked_add_months(Months::new(duration * 12)),
    };
    end.context("subscription end date out of range")
}

pub struct SubscriptionUseCase<P, S, G, N>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
    N: RealtimeNotifier + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
    payment_gateway: Arc<G>,
    notifier: Arc<N>,
}

impl<P, S, G, N> SubscriptionUseCase<P, S, G, N>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
    N: RealtimeNotifier + 'static,
{
    pub fn new(
        plan_repo: Arc<P>,
        subscription_repo: Arc<S>,
        payment_gateway: Arc<G>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            plan_repo,
            subscription_repo,
            payment_gateway,
            notifier,
        }
    }

    pub async fn list_plans(&self) -> ApiResult<Vec<PlanDto>> {
        let today = Utc::now().date_naive();
        let plans = self.plan_repo.list_offered(today).await?;

        let mut dtos = Vec::with_capacity(plans.len());
        for plan in plans {
            let actions = self.plan_repo.list_actions(plan.id).await?;
            dtos.push(PlanDto::from_entity(plan, actions));
        }
        Ok(dtos)
    }

    pub async fn current(&self, user_id: Uuid) -> ApiResult<CurrentSubscriptionDto> {
        let today = Utc::now().date_naive();

        if let Some(subscription) = self
            .subscription_repo
            .find_active_on(user_id, today)
            .await?
        {
            let frozen = self
                .subscription_repo
                .has_freeze_on(subscription.id, today)
                .await?;
            if !frozen {
                let plan = self
                    .plan_repo
                    .find_by_id(subscription.plan_id)
                    .await?
                    .ok_or_else(|| {
                        ApiError::Internal(anyhow::anyhow!(
                            "subscription {} references a missing plan",
                            subscription.id
                        ))
                    })?;
                return Ok(CurrentSubscriptionDto {
                    plan_code: plan.code,
                    plan_name: plan.name,
                    value: subscription.value,
                    start_date: Some(subscription.start_date),
                    expiration_date: Some(subscription.expiration_date),
                    active: true,
                });
            }
        }

        let default_plan = self
            .plan_repo
            .find_default()
            .await?
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("no default plan configured")))?;

        Ok(CurrentSubscriptionDto {
            plan_code: default_plan.code,
            plan_name: default_plan.name,
            value: String::new(),
            start_date: None,
            expiration_date: None,
            active: false,
        })
    }

    /// Starts the paid-subscription flow: computes the validity window,
    /// registers a pending payment at the provider and records the local
    /// pending row keyed by the provider's payment id.
    pub async fn subscribe(
        &self,
        user_id: Uuid,
        model: SubscribeModel,
    ) -> ApiResult<SubscribeResponse> {
        let plan = self
            .plan_repo
            .find_by_id(model.plan_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("plan".to_string()))?;

        if plan.disabled {
            return Err(ApiError::BadRequest("plan is disabled".to_string()));
        }

        let today = Utc::now().date_naive();
        // A current subscription extends back-to-back from its expiration.
        let start_date = match self
            .subscription_repo
            .find_active_on(user_id, today)
            .await?
        {
            Some(current) => current.expiration_date,
            None => today,
        };
        let expiration_date = validity_end(
            start_date,
            plan.duration,
            DurationType::from_str(&plan.duration_type),
        )?;

        let description = format!("{} ({} {})", plan.name, plan.duration, plan.duration_type);
        let payment = self
            .payment_gateway
            .create_payment(plan.cost_minor, &plan.currency, &description, &model.return_url)
            .await
            .map_err(|err| {
                warn!(%user_id, plan_id = plan.id, error = %err, "subscriptions: payment creation rejected");
                ApiError::BadRequest(err.to_string())
            })?;

        let created = self
            .subscription_repo
            .create_pending_if_absent(InsertSubscriptionEntity {
                user_id,
                plan_id: plan.id,
                payment_id: payment.payment_id.clone(),
                start_date,
                expiration_date,
                value: plan.name.clone(),
                active: false,
            })
            .await?;

        if !created {
            info!(
                %user_id,
                payment_id = %payment.payment_id,
                "subscriptions: pending row already exists for payment"
            );
        }

        info!(
            %user_id,
            plan_id = plan.id,
            payment_id = %payment.payment_id,
            %start_date,
            %expiration_date,
            "subscriptions: payment initiated"
        );

        Ok(SubscribeResponse {
            payment_id: payment.payment_id,
            confirmation_url: payment.confirmation_url,
        })
    }

    /// Provider callback: activates the pending row on success, deletes it on
    /// failure.
    pub async fn confirm_payment(&self, payment_id: &str, succeeded: bool) -> ApiResult<()> {
        if !succeeded {
            let deleted = self
                .subscription_repo
                .delete_by_payment_id(payment_id)
                .await?;
            info!(payment_id, deleted, "subscriptions: failed payment cleaned up");
            return Ok(());
        }

        match self
            .subscription_repo
            .activate_by_payment_id(payment_id)
            .await?
        {
            ActivationResult::Activated(subscription) => {
                info!(
                    payment_id,
                    subscription_id = subscription.id,
                    user_id = %subscription.user_id,
                    "subscriptions: subscription activated"
                );
                self.notify_permissions(subscription.user_id).await;
                Ok(())
            }
            ActivationResult::Overlapping => Err(ApiError::BadRequest(
                "overlapping subscription window".to_string(),
            )),
            ActivationResult::Unknown => Err(ApiError::NotFound("subscription".to_string())),
        }
    }

    pub async fn cancel_active(&self, user_id: Uuid) -> ApiResult<usize> {
        let today = Utc::now().date_naive();
        let changed = self
            .subscription_repo
            .deactivate_active(user_id, today)
            .await?;
        if changed > 0 {
            info!(%user_id, changed, "subscriptions: active subscription canceled");
            self.notify_permissions(user_id).await;
        }
        Ok(changed)
    }

    /// Interval-membership only; deliberately ignores freeze intervals,
    /// unlike the entitlement resolution path.
    pub async fn has_active(&self, user_id: Uuid) -> ApiResult<bool> {
        let today = Utc::now().date_naive();
        Ok(self
            .subscription_repo
            .find_active_on(user_id, today)
            .await?
            .is_some())
    }

    /// Administrative: moves the default flag to the given plan.
    pub async fn set_default_plan(&self, plan_id: i64) -> ApiResult<()> {
        self.plan_repo
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("plan".to_string()))?;
        self.plan_repo.set_default_plan(plan_id).await?;
        info!(plan_id, "subscriptions: default plan changed");
        Ok(())
    }

    async fn notify_permissions(&self, user_id: Uuid) {
        let channel = permissions_topic(user_id);
        let payload = json!({"type": "permissions_updated"});
        if let Err(err) = self.notifier.publish(&channel, payload).await {
            warn!(channel, error = ?err, "subscriptions: realtime publish failed");
        }
    }
}

#[cfg(test)]
mod tests;
