use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{subscription_freezes, subscriptions};

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub plan_id: i64,
    pub payment_id: String,
    pub start_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub value: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionEntity {
    /// Half-open validity interval: `start_date <= day < expiration_date`.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day < self.expiration_date
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub user_id: Uuid,
    pub plan_id: i64,
    pub payment_id: String,
    pub start_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub value: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_freezes)]
pub struct SubscriptionFreezeEntity {
    pub id: i64,
    pub subscription_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SubscriptionFreezeEntity {
    /// Freeze intervals are closed on both ends; a one-day freeze has
    /// `start_date == end_date`.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}
