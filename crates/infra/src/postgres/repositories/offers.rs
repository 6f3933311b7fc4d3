use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use diesel::{delete, insert_into, prelude::*, update};
use uuid::Uuid;

use domain::{
    entities::{
        grades::{GradeEntity, InsertGradeEntity},
        offers::{InsertOfferEntity, OfferEntity, OfferImageEntity},
    },
    repositories::offers::OfferRepository,
    schema::{grade_photos, grades, offer_canceled_masters, offer_categories, offer_images, repair_offers},
    value_objects::grades::{AttachGradeOutcome, GradeParty},
};

use crate::postgres::postgres_connection::PgPoolSquad;

pub struct OfferPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OfferPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OfferRepository for OfferPostgres {
    async fn create_with_images(
        &self,
        insert_offer_entity: InsertOfferEntity,
        category_ids: Vec<i64>,
        image_paths: Vec<String>,
    ) -> Result<OfferEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<OfferEntity, anyhow::Error, _>(|conn| {
            let offer = insert_into(repair_offers::table)
                .values(&insert_offer_entity)
                .returning(OfferEntity::as_returning())
                .get_result::<OfferEntity>(conn)?;

            if !category_ids.is_empty() {
                let category_rows: Vec<_> = category_ids
                    .iter()
                    .map(|category_id| {
                        (
                            offer_categories::offer_id.eq(offer.id),
                            offer_categories::category_id.eq(*category_id),
                        )
                    })
                    .collect();
                insert_into(offer_categories::table)
                    .values(&category_rows)
                    .execute(conn)?;
            }

            if !image_paths.is_empty() {
                let image_rows: Vec<_> = image_paths
                    .iter()
                    .map(|path| {
                        (
                            offer_images::offer_id.eq(offer.id),
                            offer_images::file_path.eq(path),
                        )
                    })
                    .collect();
                insert_into(offer_images::table)
                    .values(&image_rows)
                    .execute(conn)?;
            }

            Ok(offer)
        })
    }

    async fn find_by_id(&self, offer_id: i64) -> Result<Option<OfferEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let offer = repair_offers::table
            .filter(repair_offers::id.eq(offer_id))
            .select(OfferEntity::as_select())
            .first::<OfferEntity>(&mut conn)
            .optional()?;

        Ok(offer)
    }

    async fn list_visible(&self, user_id: Uuid) -> Result<Vec<OfferEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let offers = repair_offers::table
            .filter(
                repair_offers::private
                    .eq(false)
                    .or(repair_offers::owner_id.eq(user_id))
                    .or(repair_offers::master_id.eq(user_id)),
            )
            .order(repair_offers::created_at.desc())
            .select(OfferEntity::as_select())
            .load::<OfferEntity>(&mut conn)?;

        Ok(offers)
    }

    async fn list_images(&self, offer_id: i64) -> Result<Vec<OfferImageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let images = offer_images::table
            .filter(offer_images::offer_id.eq(offer_id))
            .order(offer_images::id.asc())
            .select(OfferImageEntity::as_select())
            .load::<OfferImageEntity>(&mut conn)?;

        Ok(images)
    }

    async fn list_category_ids(&self, offer_id: i64) -> Result<Vec<i64>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = offer_categories::table
            .filter(offer_categories::offer_id.eq(offer_id))
            .select(offer_categories::category_id)
            .load::<i64>(&mut conn)?;

        Ok(ids)
    }

    async fn update_master(&self, offer_id: i64, master_id: Option<Uuid>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(repair_offers::table)
            .filter(repair_offers::id.eq(offer_id))
            .set(repair_offers::master_id.eq(master_id))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn refuse(&self, offer_id: i64, user_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), anyhow::Error, _>(|conn| {
            insert_into(offer_canceled_masters::table)
                .values((
                    offer_canceled_masters::offer_id.eq(offer_id),
                    offer_canceled_masters::user_id.eq(user_id),
                ))
                .on_conflict((
                    offer_canceled_masters::offer_id,
                    offer_canceled_masters::user_id,
                ))
                .do_nothing()
                .execute(conn)?;

            update(repair_offers::table)
                .filter(repair_offers::id.eq(offer_id))
                .set(repair_offers::master_id.eq(None::<Uuid>))
                .execute(conn)?;

            Ok(())
        })
    }

    async fn clear_refusal(&self, offer_id: i64, user_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(offer_canceled_masters::table)
            .filter(offer_canceled_masters::offer_id.eq(offer_id))
            .filter(offer_canceled_masters::user_id.eq(user_id))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn canceled_masters(&self, offer_id: i64) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let ids = offer_canceled_masters::table
            .filter(offer_canceled_masters::offer_id.eq(offer_id))
            .select(offer_canceled_masters::user_id)
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }

    async fn find_grade(&self, grade_id: i64) -> Result<Option<GradeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let grade = grades::table
            .filter(grades::id.eq(grade_id))
            .select(GradeEntity::as_select())
            .first::<GradeEntity>(&mut conn)
            .optional()?;

        Ok(grade)
    }

    async fn attach_grade(
        &self,
        offer_id: i64,
        party: GradeParty,
        insert_grade_entity: InsertGradeEntity,
        photo_paths: Vec<String>,
    ) -> Result<AttachGradeOutcome> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<AttachGradeOutcome, anyhow::Error, _>(|conn| {
            let offer = repair_offers::table
                .filter(repair_offers::id.eq(offer_id))
                .for_update()
                .select(OfferEntity::as_select())
                .first::<OfferEntity>(conn)
                .optional()?
                .ok_or_else(|| anyhow!("offer {} not found", offer_id))?;

            let slot_taken = match party {
                GradeParty::Owner => offer.owner_grade_id.is_some(),
                GradeParty::Master => offer.master_grade_id.is_some(),
            };
            if slot_taken {
                return Ok(AttachGradeOutcome::SlotTaken);
            }

            let grade = insert_into(grades::table)
                .values(&insert_grade_entity)
                .returning(GradeEntity::as_returning())
                .get_result::<GradeEntity>(conn)
                .context("failed to insert grade")?;

            if !photo_paths.is_empty() {
                let photo_rows: Vec<_> = photo_paths
                    .iter()
                    .map(|path| {
                        (
                            grade_photos::grade_id.eq(grade.id),
                            grade_photos::file_path.eq(path),
                        )
                    })
                    .collect();
                insert_into(grade_photos::table)
                    .values(&photo_rows)
                    .execute(conn)?;
            }

            match party {
                GradeParty::Owner => {
                    update(repair_offers::table)
                        .filter(repair_offers::id.eq(offer_id))
                        .set(repair_offers::owner_grade_id.eq(Some(grade.id)))
                        .execute(conn)?;
                }
                GradeParty::Master => {
                    update(repair_offers::table)
                        .filter(repair_offers::id.eq(offer_id))
                        .set(repair_offers::master_grade_id.eq(Some(grade.id)))
                        .execute(conn)?;
                }
            }

            Ok(AttachGradeOutcome::Attached(grade))
        })
    }
}
