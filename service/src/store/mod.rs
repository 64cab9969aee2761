//! Persistence for the course wizard. The wizard only talks to
//! [`CourseStore`]; [`DbCourseStore`] is the SeaORM implementation.

mod db;
mod schema_cache;

pub use db::DbCourseStore;
pub use schema_cache::{is_schema_cache_error, SchemaRefreshPolicy};

use async_trait::async_trait;
use entity::{course, hole, tee_set, tee_set_distance};
use sea_orm::DbErr;
use thiserror::Error;

use crate::dto::{CourseFormData, HoleForm, TeeSetForm};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("Database schema cache is stale: {0}")]
    SchemaCache(String),
    #[error("Course {0} not found")]
    CourseNotFound(i32),
    #[error("Unknown tee set \"{0}\"")]
    UnknownTeeSet(String),
    #[error("Hole {0} is not part of the saved scorecard")]
    UnknownHole(i32),
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn fetch_course(&self, id: i32) -> Result<Option<course::Model>, StoreError>;

    /// In insertion order.
    async fn fetch_tee_sets(&self, course_id: i32) -> Result<Vec<tee_set::Model>, StoreError>;

    /// Ordered by hole number.
    async fn fetch_holes(&self, course_id: i32) -> Result<Vec<hole::Model>, StoreError>;

    async fn fetch_distances(
        &self,
        hole_ids: &[i32],
    ) -> Result<Vec<tee_set_distance::Model>, StoreError>;

    /// Inserts when `id` is `None`, updates otherwise. Returns the course id.
    async fn save_course(&self, id: Option<i32>, form: &CourseFormData) -> Result<i32, StoreError>;

    /// Replaces every tee set of the course with `tee_sets`.
    async fn save_tee_sets(
        &self,
        course_id: i32,
        tee_sets: &[TeeSetForm],
    ) -> Result<Vec<tee_set::Model>, StoreError>;

    /// Replaces every hole of the course with `holes`.
    async fn save_holes(
        &self,
        course_id: i32,
        holes: &[HoleForm],
    ) -> Result<Vec<hole::Model>, StoreError>;

    /// Replaces the distance rows of the course's holes. Returns rows written.
    async fn save_distances(&self, course_id: i32, holes: &[HoleForm]) -> Result<usize, StoreError>;

    /// Holes followed by their distances.
    async fn save_scorecard(
        &self,
        course_id: i32,
        holes: &[HoleForm],
    ) -> Result<Vec<hole::Model>, StoreError> {
        let saved = self.save_holes(course_id, holes).await?;
        self.save_distances(course_id, holes).await?;
        Ok(saved)
    }
}

/// Everything stored for one course, holes joined with their distances.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSheet {
    pub course: course::Model,
    pub tee_sets: Vec<tee_set::Model>,
    pub holes: Vec<HoleForm>,
}

pub async fn load_course_sheet<S>(store: &S, course_id: i32) -> Result<CourseSheet, StoreError>
where
    S: CourseStore + ?Sized,
{
    let course = store
        .fetch_course(course_id)
        .await?
        .ok_or(StoreError::CourseNotFound(course_id))?;
    let tee_sets = store.fetch_tee_sets(course_id).await?;
    let holes = store.fetch_holes(course_id).await?;
    let hole_ids: Vec<i32> = holes.iter().map(|h| h.id).collect();
    let distances = store.fetch_distances(&hole_ids).await?;
    let holes = HoleForm::assemble(holes, &tee_sets, &distances);
    Ok(CourseSheet {
        course,
        tee_sets,
        holes,
    })
}
