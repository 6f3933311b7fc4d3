use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{offer_images, repair_categories, repair_offers};

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = repair_offers)]
pub struct OfferEntity {
    pub id: i64,
    pub owner_id: Uuid,
    pub master_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub private: bool,
    pub owner_grade_id: Option<i64>,
    pub master_grade_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl OfferEntity {
    pub fn has_master(&self) -> bool {
        self.master_id.is_some()
    }

    /// Both grade slots filled means the offer reached its terminal state.
    pub fn is_completed(&self) -> bool {
        self.owner_grade_id.is_some() && self.master_grade_id.is_some()
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = repair_offers)]
pub struct InsertOfferEntity {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub private: bool,
}

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = offer_images)]
pub struct OfferImageEntity {
    pub id: i64,
    pub offer_id: i64,
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = repair_categories)]
pub struct RepairCategoryEntity {
    pub id: i64,
    pub name: String,
    pub color: String,
}
