use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};
use crate::value_objects::subscriptions::ActivationResult;

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    /// Active subscription whose `[start, expiration)` window contains the
    /// given day, most recent start first.
    async fn find_active_on(
        &self,
        user_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Whether any freeze interval of the subscription contains the day
    /// (closed on both ends).
    async fn has_freeze_on(&self, subscription_id: i64, day: NaiveDate) -> Result<bool>;

    async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<SubscriptionEntity>>;

    /// Inserts the pending row unless one with the same payment id already
    /// exists. Returns whether a row was written.
    async fn create_pending_if_absent(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<bool>;

    /// Flips the row with this payment id to active. The interval-overlap
    /// check against the user's other active subscriptions runs inside the
    /// same transaction.
    async fn activate_by_payment_id(&self, payment_id: &str) -> Result<ActivationResult>;

    async fn delete_by_payment_id(&self, payment_id: &str) -> Result<usize>;

    /// Deactivates the subscription currently covering the day. Returns how
    /// many rows changed.
    async fn deactivate_active(&self, user_id: Uuid, day: NaiveDate) -> Result<usize>;
}
