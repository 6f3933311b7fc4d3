use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::{subscription_actions, subscription_plans};

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_plans)]
pub struct PlanEntity {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub role: String,
    pub cost_minor: i32,
    pub currency: String,
    pub duration: i32,
    pub duration_type: String,
    pub disabled: bool,
    pub is_default: bool,
    pub active_date_start: Option<NaiveDate>,
    pub active_date_end: Option<NaiveDate>,
}

impl PlanEntity {
    /// A plan is offered only while today falls inside its active window;
    /// open or absent ends never exclude it.
    pub fn is_offered_on(&self, today: NaiveDate) -> bool {
        if self.disabled {
            return false;
        }
        let starts_ok = self.active_date_start.map_or(true, |d| d <= today);
        let ends_ok = self.active_date_end.map_or(true, |d| d >= today);
        starts_ok && ends_ok
    }
}

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscription_actions)]
pub struct SubscriptionActionEntity {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub value: String,
    pub description: String,
}
