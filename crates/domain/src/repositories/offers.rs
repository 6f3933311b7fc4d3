use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::entities::{
    grades::{GradeEntity, InsertGradeEntity},
    offers::{InsertOfferEntity, OfferEntity, OfferImageEntity},
};
use crate::value_objects::grades::{AttachGradeOutcome, GradeParty};

#[async_trait]
#[automock]
pub trait OfferRepository {
    /// Inserts the offer, its category links and its image rows in one
    /// transaction.
    async fn create_with_images(
        &self,
        insert_offer_entity: InsertOfferEntity,
        category_ids: Vec<i64>,
        image_paths: Vec<String>,
    ) -> Result<OfferEntity>;

    async fn find_by_id(&self, offer_id: i64) -> Result<Option<OfferEntity>>;

    /// Public offers plus private ones where the user is owner or master.
    async fn list_visible(&self, user_id: Uuid) -> Result<Vec<OfferEntity>>;

    async fn list_images(&self, offer_id: i64) -> Result<Vec<OfferImageEntity>>;

    async fn list_category_ids(&self, offer_id: i64) -> Result<Vec<i64>>;

    async fn update_master(&self, offer_id: i64, master_id: Option<Uuid>) -> Result<()>;

    /// Records the refusing master and clears the assignment in one
    /// transaction.
    async fn refuse(&self, offer_id: i64, user_id: Uuid) -> Result<()>;

    async fn clear_refusal(&self, offer_id: i64, user_id: Uuid) -> Result<()>;

    async fn canceled_masters(&self, offer_id: i64) -> Result<Vec<Uuid>>;

    async fn find_grade(&self, grade_id: i64) -> Result<Option<GradeEntity>>;

    /// Inserts the grade and its photos and fills the party's slot on the
    /// offer, all in one transaction. Returns `SlotTaken` when the slot was
    /// already filled.
    async fn attach_grade(
        &self,
        offer_id: i64,
        party: GradeParty,
        insert_grade_entity: InsertGradeEntity,
        photo_paths: Vec<String>,
    ) -> Result<AttachGradeOutcome>;
}
