use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{prelude::*, update};

use domain::{
    entities::plans::{PlanEntity, SubscriptionActionEntity},
    repositories::plans::PlanRepository,
    schema::{plan_actions, subscription_actions, subscription_plans},
};

use crate::postgres::postgres_connection::PgPoolSquad;

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let plan = subscription_plans::table
            .filter(subscription_plans::id.eq(plan_id))
            .select(PlanEntity::as_select())
            .first::<PlanEntity>(&mut conn)
            .optional()?;

        Ok(plan)
    }

    async fn find_default(&self) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let plan = subscription_plans::table
            .filter(subscription_plans::is_default.eq(true))
            .select(PlanEntity::as_select())
            .first::<PlanEntity>(&mut conn)
            .optional()?;

        Ok(plan)
    }

    async fn list_offered(&self, today: NaiveDate) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let plans = subscription_plans::table
            .filter(subscription_plans::disabled.eq(false))
            .filter(
                subscription_plans::active_date_start
                    .le(today)
                    .or(subscription_plans::active_date_start.is_null()),
            )
            .filter(
                subscription_plans::active_date_end
                    .ge(today)
                    .or(subscription_plans::active_date_end.is_null()),
            )
            .order(subscription_plans::cost_minor.asc())
            .select(PlanEntity::as_select())
            .load::<PlanEntity>(&mut conn)?;

        Ok(plans)
    }

    async fn action_codes(&self, plan_id: i64) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let codes = plan_actions::table
            .inner_join(subscription_actions::table)
            .filter(plan_actions::plan_id.eq(plan_id))
            .order(subscription_actions::code.asc())
            .select(subscription_actions::code)
            .load::<String>(&mut conn)?;

        Ok(codes)
    }

    async fn list_actions(&self, plan_id: i64) -> Result<Vec<SubscriptionActionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let actions = plan_actions::table
            .inner_join(subscription_actions::table)
            .filter(plan_actions::plan_id.eq(plan_id))
            .order(subscription_actions::code.asc())
            .select(SubscriptionActionEntity::as_select())
            .load::<SubscriptionActionEntity>(&mut conn)?;

        Ok(actions)
    }

    async fn set_default_plan(&self, plan_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), anyhow::Error, _>(|conn| {
            update(subscription_plans::table)
                .filter(subscription_plans::is_default.eq(true))
                .set(subscription_plans::is_default.eq(false))
                .execute(conn)?;

            let changed = update(subscription_plans::table)
                .filter(subscription_plans::id.eq(plan_id))
                .set(subscription_plans::is_default.eq(true))
                .execute(conn)?;

            if changed != 1 {
                return Err(anyhow!("plan {} not found", plan_id));
            }

            Ok(())
        })
    }
}
