use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use entity::prelude::*;
use entity::{course, hole, tee_set, tee_set_distance};
use log::{debug, error, info, warn};
use sea_orm::ActiveValue::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder, Statement, TransactionTrait,
};

use super::schema_cache::with_schema_refresh;
use super::{CourseStore, SchemaRefreshPolicy, StoreError};
use crate::dto::{CourseFormData, HoleForm, TeeSetForm};

/// The `create_course` function is only installed on Postgres.
fn has_course_function(backend: DbBackend) -> bool {
    backend == DbBackend::Postgres
}

#[derive(Debug, Clone)]
pub struct DbCourseStore {
    db: DatabaseConnection,
    refresh: SchemaRefreshPolicy,
}

impl DbCourseStore {
    pub fn new(db: DatabaseConnection, refresh: SchemaRefreshPolicy) -> Self {
        Self { db, refresh }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Creation through the `create_course` database function.
    async fn create_course_rpc(&self, form: &CourseFormData, location: &str) -> Result<i32, DbErr> {
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            "SELECT create_course($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) AS id",
            [
                form.name.trim().into(),
                location.into(),
                form.city.clone().into(),
                form.state.clone().into(),
                form.holes.into(),
                form.par.into(),
                form.amenities.clone().into(),
                form.website.clone().into(),
                form.phone_number.clone().into(),
                form.is_active.into(),
            ],
        );
        self.db
            .query_one(stmt)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("create_course returned no row".to_string()))?
            .try_get("", "id")
    }

    async fn insert_course(&self, form: &CourseFormData, location: &str) -> Result<i32, StoreError> {
        with_schema_refresh(&self.db, &self.refresh, "Insert course", move || async move {
            let model = course::ActiveModel {
                created_at: Set(Utc::now().fixed_offset()),
                ..course_fields(form, location)
            };
            Course::insert(model)
                .exec(&self.db)
                .await
                .map(|r| r.last_insert_id)
        })
        .await
    }

    async fn update_course(
        &self,
        id: i32,
        form: &CourseFormData,
        location: &str,
    ) -> Result<i32, StoreError> {
        if Course::find_by_id(id).one(&self.db).await?.is_none() {
            return Err(StoreError::CourseNotFound(id));
        }
        with_schema_refresh(&self.db, &self.refresh, "Update course", move || async move {
            let model = course::ActiveModel {
                id: Unchanged(id),
                ..course_fields(form, location)
            };
            model.update(&self.db).await.map(|m| m.id)
        })
        .await
    }

    async fn ensure_course(&self, course_id: i32) -> Result<(), StoreError> {
        match Course::find_by_id(course_id).one(&self.db).await? {
            Some(_) => Ok(()),
            None => Err(StoreError::CourseNotFound(course_id)),
        }
    }

    async fn finish<T>(
        txn: DatabaseTransaction,
        result: Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        match result {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    error!("Rollback failed: {rollback}");
                }
                Err(e)
            }
        }
    }
}

fn course_fields(form: &CourseFormData, location: &str) -> course::ActiveModel {
    course::ActiveModel {
        id: NotSet,
        name: Set(form.name.trim().to_string()),
        location: Set(location.to_string()),
        city: Set(form.city.clone()),
        state: Set(form.state.clone()),
        holes: Set(form.holes),
        par: Set(form.par),
        amenities: Set(form.amenities.clone()),
        website: Set(form.website.clone()),
        phone_number: Set(form.phone_number.clone()),
        is_active: Set(form.is_active),
        created_at: NotSet,
    }
}

async fn replace_tee_sets<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    tee_sets: &[TeeSetForm],
) -> Result<Vec<tee_set::Model>, StoreError> {
    let removed = TeeSet::delete_many()
        .filter(tee_set::Column::CourseId.eq(course_id))
        .exec(db)
        .await?
        .rows_affected;
    let mut saved = Vec::with_capacity(tee_sets.len());
    for tee in tee_sets {
        let model = tee_set::ActiveModel {
            id: NotSet,
            course_id: Set(course_id),
            name: Set(tee.name.trim().to_string()),
            color: Set(tee.color.trim().to_string()),
            rating: Set(tee.rating),
            slope: Set(tee.slope),
            par: Set(tee.par),
            distance: Set(tee.distance),
        };
        saved.push(model.insert(db).await?);
    }
    info!(
        "Replaced tee sets of course {course_id}: {removed} removed, {} inserted",
        saved.len()
    );
    Ok(saved)
}

async fn replace_holes<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    holes: &[HoleForm],
) -> Result<Vec<hole::Model>, StoreError> {
    let removed = Hole::delete_many()
        .filter(hole::Column::CourseId.eq(course_id))
        .exec(db)
        .await?
        .rows_affected;
    let mut ordered: Vec<&HoleForm> = holes.iter().collect();
    ordered.sort_by_key(|h| h.number);
    let mut saved = Vec::with_capacity(ordered.len());
    for h in ordered {
        let model = hole::ActiveModel {
            id: NotSet,
            course_id: Set(course_id),
            hole_number: Set(h.number),
            par: Set(h.par),
            handicap_index: Set(h.handicap_index),
            notes: Set(h.notes.clone().filter(|n| !n.trim().is_empty())),
        };
        saved.push(model.insert(db).await?);
    }
    info!(
        "Replaced holes of course {course_id}: {removed} removed, {} inserted",
        saved.len()
    );
    Ok(saved)
}

/// Distances arrive keyed by tee set name and hole number; both are
/// resolved against what is stored for the course right now.
async fn replace_distances<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    holes: &[HoleForm],
) -> Result<usize, StoreError> {
    let tee_ids: HashMap<String, i32> = TeeSet::find()
        .filter(tee_set::Column::CourseId.eq(course_id))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.name.to_lowercase(), t.id))
        .collect();
    let hole_ids: HashMap<i32, i32> = Hole::find()
        .filter(hole::Column::CourseId.eq(course_id))
        .all(db)
        .await?
        .into_iter()
        .map(|h| (h.hole_number, h.id))
        .collect();

    TeeSetDistance::delete_many()
        .filter(tee_set_distance::Column::HoleId.is_in(hole_ids.values().copied()))
        .exec(db)
        .await?;

    let mut written = 0;
    for h in holes {
        if h.distances.is_empty() {
            continue;
        }
        let hole_id = *hole_ids.get(&h.number).ok_or(StoreError::UnknownHole(h.number))?;
        for (tee_name, length) in &h.distances {
            let tee_set_id = *tee_ids
                .get(&tee_name.to_lowercase())
                .ok_or_else(|| StoreError::UnknownTeeSet(tee_name.clone()))?;
            tee_set_distance::ActiveModel {
                id: NotSet,
                hole_id: Set(hole_id),
                tee_set_id: Set(tee_set_id),
                length: Set(*length),
            }
            .insert(db)
            .await?;
            written += 1;
        }
    }
    debug!("Wrote {written} distances for course {course_id}");
    Ok(written)
}

#[async_trait]
impl CourseStore for DbCourseStore {
    async fn fetch_course(&self, id: i32) -> Result<Option<course::Model>, StoreError> {
        Ok(Course::find_by_id(id).one(&self.db).await?)
    }

    async fn fetch_tee_sets(&self, course_id: i32) -> Result<Vec<tee_set::Model>, StoreError> {
        Ok(TeeSet::find()
            .filter(tee_set::Column::CourseId.eq(course_id))
            .order_by_asc(tee_set::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn fetch_holes(&self, course_id: i32) -> Result<Vec<hole::Model>, StoreError> {
        Ok(Hole::find()
            .filter(hole::Column::CourseId.eq(course_id))
            .order_by_asc(hole::Column::HoleNumber)
            .all(&self.db)
            .await?)
    }

    async fn fetch_distances(
        &self,
        hole_ids: &[i32],
    ) -> Result<Vec<tee_set_distance::Model>, StoreError> {
        if hole_ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(TeeSetDistance::find()
            .filter(tee_set_distance::Column::HoleId.is_in(hole_ids.iter().copied()))
            .order_by_asc(tee_set_distance::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn save_course(&self, id: Option<i32>, form: &CourseFormData) -> Result<i32, StoreError> {
        let location = form.effective_location().unwrap_or_default();
        if let Some(id) = id {
            return self.update_course(id, form, &location).await;
        }
        if !has_course_function(self.db.get_database_backend()) {
            return self.insert_course(form, &location).await;
        }
        match self.create_course_rpc(form, &location).await {
            Ok(id) => Ok(id),
            Err(e) => {
                warn!("create_course failed, inserting directly: {e}");
                self.insert_course(form, &location).await
            }
        }
    }

    async fn save_tee_sets(
        &self,
        course_id: i32,
        tee_sets: &[TeeSetForm],
    ) -> Result<Vec<tee_set::Model>, StoreError> {
        self.ensure_course(course_id).await?;
        let txn = self.db.begin().await?;
        let result = replace_tee_sets(&txn, course_id, tee_sets).await;
        Self::finish(txn, result).await
    }

    async fn save_holes(
        &self,
        course_id: i32,
        holes: &[HoleForm],
    ) -> Result<Vec<hole::Model>, StoreError> {
        self.ensure_course(course_id).await?;
        let txn = self.db.begin().await?;
        let result = replace_holes(&txn, course_id, holes).await;
        Self::finish(txn, result).await
    }

    async fn save_distances(&self, course_id: i32, holes: &[HoleForm]) -> Result<usize, StoreError> {
        self.ensure_course(course_id).await?;
        let txn = self.db.begin().await?;
        let result = replace_distances(&txn, course_id, holes).await;
        Self::finish(txn, result).await
    }

    async fn save_scorecard(
        &self,
        course_id: i32,
        holes: &[HoleForm],
    ) -> Result<Vec<hole::Model>, StoreError> {
        self.ensure_course(course_id).await?;
        let txn = self.db.begin().await?;
        let result = match replace_holes(&txn, course_id, holes).await {
            Ok(saved) => replace_distances(&txn, course_id, holes)
                .await
                .map(|_| saved),
            Err(e) => Err(e),
        };
        Self::finish(txn, result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::load_course_sheet;
    use crate::test_support::migrated_db;
    use std::time::Duration;

    fn store(db: DatabaseConnection) -> DbCourseStore {
        DbCourseStore::new(
            db,
            SchemaRefreshPolicy {
                attempts: 1,
                delay: Duration::from_millis(1),
            },
        )
    }

    fn course_form() -> CourseFormData {
        CourseFormData {
            name: "Test Course".to_string(),
            location: "Test City".to_string(),
            ..Default::default()
        }
    }

    fn tee(name: &str, color: &str) -> TeeSetForm {
        TeeSetForm {
            id: None,
            name: name.to_string(),
            color: color.to_string(),
            rating: 74.2,
            slope: 142,
            par: Some(72),
            distance: None,
        }
    }

    #[tokio::test]
    async fn creates_course_without_the_database_function() {
        let store = store(migrated_db().await);
        let id = store.save_course(None, &course_form()).await.unwrap();
        let course = store.fetch_course(id).await.unwrap().unwrap();
        assert_eq!(course.name, "Test Course");
        assert_eq!(course.location, "Test City");
        assert_eq!(course.holes, 18);
        assert!(course.is_active);
    }

    #[test]
    fn only_postgres_has_the_course_function() {
        assert!(has_course_function(DbBackend::Postgres));
        assert!(!has_course_function(DbBackend::Sqlite));
        assert!(!has_course_function(DbBackend::MySql));
    }

    #[tokio::test]
    async fn updates_in_place() {
        let store = store(migrated_db().await);
        let id = store.save_course(None, &course_form()).await.unwrap();
        let mut form = course_form();
        form.par = 71;
        assert_eq!(store.save_course(Some(id), &form).await.unwrap(), id);
        assert_eq!(store.fetch_course(id).await.unwrap().unwrap().par, 71);

        let missing = store.save_course(Some(id + 100), &form).await;
        assert!(matches!(missing, Err(StoreError::CourseNotFound(_))));
    }

    #[tokio::test]
    async fn tee_set_replacement_is_exact_and_idempotent() {
        let store = store(migrated_db().await);
        let id = store.save_course(None, &course_form()).await.unwrap();
        let list = vec![tee("Championship", "Black"), tee("Member", "White")];

        store.save_tee_sets(id, &list).await.unwrap();
        store.save_tee_sets(id, &list).await.unwrap();
        let fetched = store.fetch_tee_sets(id).await.unwrap();
        let names: Vec<_> = fetched.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Championship", "Member"]);

        store.save_tee_sets(id, &list[..1]).await.unwrap();
        assert_eq!(store.fetch_tee_sets(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scorecard_round_trips_with_distances() {
        let store = store(migrated_db().await);
        let id = store.save_course(None, &course_form()).await.unwrap();
        store
            .save_tee_sets(id, &[tee("Championship", "Black")])
            .await
            .unwrap();
        let mut holes = HoleForm::defaults(18);
        holes[0].distances.insert("Championship".to_string(), 410);
        holes[1].notes = Some("Dogleg left".to_string());

        let saved = store.save_scorecard(id, &holes).await.unwrap();
        assert_eq!(saved.len(), 18);

        let sheet = load_course_sheet(&store, id).await.unwrap();
        assert_eq!(sheet.holes, holes);
    }

    #[tokio::test]
    async fn unknown_tee_set_rolls_back_the_scorecard() {
        let store = store(migrated_db().await);
        let id = store.save_course(None, &course_form()).await.unwrap();
        store.save_tee_sets(id, &[tee("Blue", "Blue")]).await.unwrap();
        store.save_scorecard(id, &HoleForm::defaults(9)).await.unwrap();

        let mut holes = HoleForm::defaults(18);
        holes[3].distances.insert("Gold".to_string(), 380);
        let result = store.save_scorecard(id, &holes).await;
        assert!(matches!(result, Err(StoreError::UnknownTeeSet(name)) if name == "Gold"));

        assert_eq!(store.fetch_holes(id).await.unwrap().len(), 9);
    }

    #[tokio::test]
    async fn saving_children_of_a_missing_course_fails() {
        let store = store(migrated_db().await);
        let result = store.save_tee_sets(42, &[tee("Blue", "Blue")]).await;
        assert!(matches!(result, Err(StoreError::CourseNotFound(42))));
        assert!(store.fetch_distances(&[]).await.unwrap().is_empty());
    }
}
