use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::subscriptions::SubscriptionEntity;

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeModel {
    pub plan_id: i64,
    pub return_url: String,
}

/// Payload returned after a payment was initiated with the provider.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeResponse {
    pub payment_id: String,
    pub confirmation_url: String,
}

/// Current entitlement state shown to the user: either the paid subscription
/// window or the default plan with no window.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentSubscriptionDto {
    pub plan_code: String,
    pub plan_name: String,
    pub value: String,
    pub start_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub active: bool,
}

/// Result of flipping a pending subscription to active inside the write
/// transaction. `Overlapping` means another active subscription of the same
/// user intersects the `[start, expiration)` window.
#[derive(Debug, Clone)]
pub enum ActivationResult {
    Activated(SubscriptionEntity),
    Overlapping,
    Unknown,
}
