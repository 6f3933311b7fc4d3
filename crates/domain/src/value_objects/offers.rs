use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    grades::GradeEntity,
    offers::{OfferEntity, OfferImageEntity},
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOfferModel {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestMasterModel {
    pub master_id: Uuid,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetMasterModel {
    pub master_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendGradeModel {
    pub grade: i32,
    pub comment: String,
}

/// Full offer payload returned by detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OfferDetailsDto {
    #[serde(flatten)]
    pub offer: OfferEntity,
    pub completed: bool,
    pub images: Vec<OfferImageEntity>,
    pub category_ids: Vec<i64>,
    pub canceled_masters: Vec<Uuid>,
    pub owner_grade: Option<GradeEntity>,
    pub master_grade: Option<GradeEntity>,
}
