use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{grade_photos, grades};

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = grades)]
pub struct GradeEntity {
    pub id: i64,
    pub rating_user_id: Uuid,
    pub valued_user_id: Uuid,
    pub grade: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = grades)]
pub struct InsertGradeEntity {
    pub rating_user_id: Uuid,
    pub valued_user_id: Uuid,
    pub grade: i32,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Identifiable, Selectable, Queryable)]
#[diesel(table_name = grade_photos)]
pub struct GradePhotoEntity {
    pub id: i64,
    pub grade_id: i64,
    pub file_path: String,
}
