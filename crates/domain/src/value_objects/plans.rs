use serde::Serialize;

use crate::entities::plans::{PlanEntity, SubscriptionActionEntity};

/// Action codes granted by subscription plans.
pub mod actions {
    /// Gates the master-initiated respond transition on offers.
    pub const CAN_TAKE_OFFERS: &str = "can_take_offers";
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanDto {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub role: String,
    pub cost_minor: i32,
    pub currency: String,
    pub duration: i32,
    pub duration_type: String,
    pub is_default: bool,
    pub actions: Vec<SubscriptionActionEntity>,
}

impl PlanDto {
    pub fn from_entity(plan: PlanEntity, actions: Vec<SubscriptionActionEntity>) -> Self {
        Self {
            id: plan.id,
            code: plan.code,
            name: plan.name,
            role: plan.role,
            cost_minor: plan.cost_minor,
            currency: plan.currency,
            duration: plan.duration,
            duration_type: plan.duration_type,
            is_default: plan.is_default,
            actions,
        }
    }
}
