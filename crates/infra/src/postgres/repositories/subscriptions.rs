use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{delete, insert_into, prelude::*, update};
use uuid::Uuid;

use domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    repositories::subscriptions::SubscriptionRepository,
    schema::{subscription_freezes, subscriptions},
    value_objects::subscriptions::ActivationResult,
};

use crate::postgres::postgres_connection::PgPoolSquad;

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_active_on(
        &self,
        user_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::active.eq(true))
            .filter(subscriptions::start_date.le(day))
            .filter(subscriptions::expiration_date.gt(day))
            .order(subscriptions::start_date.desc())
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn has_freeze_on(&self, subscription_id: i64, day: NaiveDate) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let freeze = subscription_freezes::table
            .filter(subscription_freezes::subscription_id.eq(subscription_id))
            .filter(subscription_freezes::start_date.le(day))
            .filter(subscription_freezes::end_date.ge(day))
            .select(subscription_freezes::id)
            .first::<i64>(&mut conn)
            .optional()?;

        Ok(freeze.is_some())
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let subscription = subscriptions::table
            .filter(subscriptions::payment_id.eq(payment_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(subscription)
    }

    async fn create_pending_if_absent(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<bool, anyhow::Error, _>(|conn| {
            let existing = subscriptions::table
                .filter(subscriptions::payment_id.eq(&insert_subscription_entity.payment_id))
                .select(subscriptions::id)
                .first::<i64>(conn)
                .optional()?;

            if existing.is_some() {
                return Ok(false);
            }

            insert_into(subscriptions::table)
                .values(&insert_subscription_entity)
                .execute(conn)?;

            Ok(true)
        })
    }

    async fn activate_by_payment_id(&self, payment_id: &str) -> Result<ActivationResult> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<ActivationResult, anyhow::Error, _>(|conn| {
            let subscription = subscriptions::table
                .filter(subscriptions::payment_id.eq(payment_id))
                .for_update()
                .select(SubscriptionEntity::as_select())
                .first::<SubscriptionEntity>(conn)
                .optional()?;

            let Some(subscription) = subscription else {
                return Ok(ActivationResult::Unknown);
            };

            let overlapping = subscriptions::table
                .filter(subscriptions::user_id.eq(subscription.user_id))
                .filter(subscriptions::active.eq(true))
                .filter(subscriptions::id.ne(subscription.id))
                .filter(subscriptions::start_date.lt(subscription.expiration_date))
                .filter(subscriptions::expiration_date.gt(subscription.start_date))
                .select(subscriptions::id)
                .first::<i64>(conn)
                .optional()?;

            if overlapping.is_some() {
                return Ok(ActivationResult::Overlapping);
            }

            let activated = update(subscriptions::table)
                .filter(subscriptions::id.eq(subscription.id))
                .set(subscriptions::active.eq(true))
                .returning(SubscriptionEntity::as_returning())
                .get_result::<SubscriptionEntity>(conn)?;

            Ok(ActivationResult::Activated(activated))
        })
    }

    async fn delete_by_payment_id(&self, payment_id: &str) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(subscriptions::table)
            .filter(subscriptions::payment_id.eq(payment_id))
            .filter(subscriptions::active.eq(false))
            .execute(&mut conn)?;

        Ok(deleted)
    }

    async fn deactivate_active(&self, user_id: Uuid, day: NaiveDate) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let changed = update(subscriptions::table)
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::active.eq(true))
            .filter(subscriptions::start_date.le(day))
            .filter(subscriptions::expiration_date.gt(day))
            .set(subscriptions::active.eq(false))
            .execute(&mut conn)?;

        Ok(changed)
    }
}
