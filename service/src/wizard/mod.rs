//! Three-step course entry: course information, tee boxes, scorecard.
//! Each step is saved before the next one is shown.

pub mod scorecard;
mod tee_boxes;

use std::time::Duration;

use log::{debug, info};
use rocket_okapi::okapi::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dto::{
    validate_holes, validate_tee_sets, CourseFormData, ExtractedData, HoleForm, TeeSetForm,
};
use crate::error::ValidationError;
use crate::store::{load_course_sheet, CourseStore, StoreError};
use scorecard::ScorecardTotals;

pub const COURSE_LIST_PATH: &str = "/admin/courses";

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    CourseInfo,
    TeeBoxes,
    Scorecard,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [Self::CourseInfo, Self::TeeBoxes, Self::Scorecard];

    pub fn index(self) -> usize {
        match self {
            Self::CourseInfo => 0,
            Self::TeeBoxes => 1,
            Self::Scorecard => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSettings {
    /// Pause between the final save and the redirect to the course list.
    pub redirect_delay: Duration,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            redirect_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} can only be saved after the course information")]
    MissingCourse(&'static str),
    #[error("Course {0} not found")]
    CourseNotFound(i32),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for WizardError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::CourseNotFound(id) => Self::CourseNotFound(id),
            e => Self::Store(e),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Advanced {
        step: WizardStep,
        course_id: i32,
        notice: String,
    },
    Finished {
        course_id: i32,
        notice: String,
        redirect_to: String,
        redirect_after_ms: u64,
    },
}

/// Everything the client holds between requests.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct WizardSubmission {
    #[serde(default)]
    pub step: WizardStep,
    #[serde(default, alias = "courseId")]
    pub course_id: Option<i32>,
    #[serde(default, alias = "formData")]
    pub course: CourseFormData,
    #[serde(default, alias = "teeSets", alias = "teeBoxes")]
    pub tee_sets: Vec<TeeSetForm>,
    #[serde(default)]
    pub holes: Vec<HoleForm>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    pub step_index: usize,
    pub course_id: Option<i32>,
    pub course: CourseFormData,
    pub tee_sets: Vec<TeeSetForm>,
    pub holes: Vec<HoleForm>,
    pub totals: ScorecardTotals,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct WizardResponse {
    pub outcome: SubmitOutcome,
    pub state: WizardState,
}

/// Body of `POST /api/courses/wizard/extraction`.
#[derive(Deserialize, JsonSchema, Debug, Clone)]
pub struct ExtractionMerge {
    pub state: WizardSubmission,
    pub data: ExtractedData,
}

pub struct CourseWizard<'a, S: CourseStore + ?Sized> {
    store: &'a S,
    settings: WizardSettings,
    step: WizardStep,
    course_id: Option<i32>,
    pub course: CourseFormData,
    pub tee_sets: Vec<TeeSetForm>,
    pub holes: Vec<HoleForm>,
}

impl<'a, S: CourseStore + ?Sized> CourseWizard<'a, S> {
    pub fn new(store: &'a S, settings: WizardSettings) -> Self {
        Self {
            store,
            settings,
            step: WizardStep::CourseInfo,
            course_id: None,
            course: CourseFormData::default(),
            tee_sets: vec![],
            holes: vec![],
        }
    }

    /// Edit mode: everything stored for `course_id`, starting at `initial_step`.
    pub async fn open(
        store: &'a S,
        settings: WizardSettings,
        course_id: i32,
        initial_step: WizardStep,
    ) -> Result<Self, WizardError> {
        let sheet = load_course_sheet(store, course_id).await?;
        Ok(Self {
            store,
            settings,
            step: initial_step,
            course_id: Some(course_id),
            course: CourseFormData::from(&sheet.course),
            tee_sets: sheet.tee_sets.into_iter().map(Into::into).collect(),
            holes: sheet.holes,
        })
    }

    pub fn from_submission(
        store: &'a S,
        settings: WizardSettings,
        submission: WizardSubmission,
    ) -> Self {
        Self {
            store,
            settings,
            step: submission.step,
            course_id: submission.course_id,
            course: submission.course,
            tee_sets: submission.tee_sets,
            holes: submission.holes,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn course_id(&self) -> Option<i32> {
        self.course_id
    }

    /// Saves the current step and moves on. Nothing advances on error.
    pub async fn handle_submit(&mut self) -> Result<SubmitOutcome, WizardError> {
        match self.step {
            WizardStep::CourseInfo => {
                let course_id = self.save_course_info().await?;
                self.advance(course_id, "Course information saved")
            }
            WizardStep::TeeBoxes => {
                let course_id = self.course_id.ok_or(WizardError::MissingCourse("Tee boxes"))?;
                self.save_tee_boxes(course_id).await?;
                self.advance(course_id, "Tee boxes saved")
            }
            WizardStep::Scorecard => {
                let course_id = self.course_id.ok_or(WizardError::MissingCourse("Scorecard"))?;
                self.save_scorecard(course_id).await?;
                info!("Course {course_id} saved through the wizard");
                Ok(SubmitOutcome::Finished {
                    course_id,
                    notice: "Scorecard saved".to_string(),
                    redirect_to: COURSE_LIST_PATH.to_string(),
                    redirect_after_ms: u64::try_from(self.settings.redirect_delay.as_millis())
                        .unwrap_or(u64::MAX),
                })
            }
        }
    }

    /// One step back; stays put on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Course info is merged key by key, tee sets and holes are replaced
    /// wholesale. Returns whether anything was applied.
    pub fn apply_extraction(&mut self, data: ExtractedData) -> bool {
        if data.is_empty() {
            return false;
        }
        if let Some(patch) = data.course_info {
            patch.merge_into(&mut self.course);
        }
        if let Some(tee_sets) = data.tee_sets.filter(|t| !t.is_empty()) {
            self.tee_sets = tee_sets;
        }
        if let Some(holes) = data.holes.filter(|h| !h.is_empty()) {
            self.holes = holes;
        }
        true
    }

    pub fn tee_names(&self) -> Vec<String> {
        self.tee_sets.iter().map(|t| t.name.clone()).collect()
    }

    pub fn snapshot(&self) -> WizardState {
        WizardState {
            step: self.step,
            step_index: self.step.index(),
            course_id: self.course_id,
            course: self.course.clone(),
            tee_sets: self.tee_sets.clone(),
            holes: self.holes.clone(),
            totals: ScorecardTotals::compute(&self.holes, &self.tee_names()),
        }
    }

    async fn save_course_info(&mut self) -> Result<i32, WizardError> {
        self.course.validate()?;
        let course_id = self.store.save_course(self.course_id, &self.course).await?;
        self.course_id = Some(course_id);
        if self.tee_sets.is_empty() && self.holes.is_empty() {
            self.prefetch(course_id).await?;
        }
        Ok(course_id)
    }

    async fn prefetch(&mut self, course_id: i32) -> Result<(), WizardError> {
        let tee_sets = self.store.fetch_tee_sets(course_id).await?;
        let holes = self.store.fetch_holes(course_id).await?;
        let hole_ids: Vec<i32> = holes.iter().map(|h| h.id).collect();
        let distances = self.store.fetch_distances(&hole_ids).await?;
        debug!(
            "Prefetched {} tee sets and {} holes for course {course_id}",
            tee_sets.len(),
            holes.len()
        );
        self.holes = HoleForm::assemble(holes, &tee_sets, &distances);
        self.tee_sets = tee_sets.into_iter().map(Into::into).collect();
        Ok(())
    }

    async fn save_tee_boxes(&mut self, course_id: i32) -> Result<(), WizardError> {
        validate_tee_sets(&self.tee_sets)?;
        let saved = self.store.save_tee_sets(course_id, &self.tee_sets).await?;
        self.tee_sets = saved.into_iter().map(Into::into).collect();

        let known: Vec<String> = self.tee_sets.iter().map(|t| t.name.to_lowercase()).collect();
        for hole in &mut self.holes {
            hole.distances.retain(|name, _| known.contains(&name.to_lowercase()));
        }
        let count = self.hole_count(course_id).await?;
        HoleForm::fit_to(&mut self.holes, count);
        Ok(())
    }

    async fn save_scorecard(&mut self, course_id: i32) -> Result<(), WizardError> {
        let count = self.hole_count(course_id).await?;
        validate_holes(&self.holes, count, &self.tee_names())?;
        self.store.save_scorecard(course_id, &self.holes).await?;
        Ok(())
    }

    /// The stored hole count, which the scorecard must match.
    async fn hole_count(&self, course_id: i32) -> Result<i32, WizardError> {
        self.store
            .fetch_course(course_id)
            .await?
            .map(|course| course.holes)
            .ok_or(WizardError::CourseNotFound(course_id))
    }

    fn advance(&mut self, course_id: i32, notice: &str) -> Result<SubmitOutcome, WizardError> {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(SubmitOutcome::Advanced {
            step: self.step,
            course_id,
            notice: notice.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::CourseInfoPatch;
    use crate::error::GenericError;
    use crate::store::{DbCourseStore, SchemaRefreshPolicy};
    use crate::test_support::migrated_db;
    use async_trait::async_trait;
    use entity::{course, hole, tee_set, tee_set_distance};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        inner: DbCourseStore,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl CourseStore for CountingStore {
        async fn fetch_course(&self, id: i32) -> Result<Option<course::Model>, StoreError> {
            self.inner.fetch_course(id).await
        }
        async fn fetch_tee_sets(&self, course_id: i32) -> Result<Vec<tee_set::Model>, StoreError> {
            self.inner.fetch_tee_sets(course_id).await
        }
        async fn fetch_holes(&self, course_id: i32) -> Result<Vec<hole::Model>, StoreError> {
            self.inner.fetch_holes(course_id).await
        }
        async fn fetch_distances(
            &self,
            hole_ids: &[i32],
        ) -> Result<Vec<tee_set_distance::Model>, StoreError> {
            self.inner.fetch_distances(hole_ids).await
        }
        async fn save_course(
            &self,
            id: Option<i32>,
            form: &CourseFormData,
        ) -> Result<i32, StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_course(id, form).await
        }
        async fn save_tee_sets(
            &self,
            course_id: i32,
            tee_sets: &[TeeSetForm],
        ) -> Result<Vec<tee_set::Model>, StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_tee_sets(course_id, tee_sets).await
        }
        async fn save_holes(
            &self,
            course_id: i32,
            holes: &[HoleForm],
        ) -> Result<Vec<hole::Model>, StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_holes(course_id, holes).await
        }
        async fn save_distances(
            &self,
            course_id: i32,
            holes: &[HoleForm],
        ) -> Result<usize, StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_distances(course_id, holes).await
        }
        async fn save_scorecard(
            &self,
            course_id: i32,
            holes: &[HoleForm],
        ) -> Result<Vec<hole::Model>, StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_scorecard(course_id, holes).await
        }
    }

    async fn counting_store() -> CountingStore {
        CountingStore {
            inner: DbCourseStore::new(migrated_db().await, SchemaRefreshPolicy::default()),
            saves: AtomicUsize::new(0),
        }
    }

    fn championship() -> TeeSetForm {
        TeeSetForm {
            id: None,
            name: "Championship".to_string(),
            color: "Black".to_string(),
            rating: 74.2,
            slope: 142,
            par: None,
            distance: None,
        }
    }

    #[test]
    fn steps_move_by_index() {
        assert_eq!(WizardStep::CourseInfo.next(), Some(WizardStep::TeeBoxes));
        assert_eq!(WizardStep::Scorecard.next(), None);
        assert_eq!(WizardStep::CourseInfo.previous(), None);
        assert_eq!(WizardStep::from_index(2), Some(WizardStep::Scorecard));
    }

    #[tokio::test]
    async fn full_wizard_run() {
        let store = counting_store().await;
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.course.name = "Test Course".to_string();
        wizard.course.location = "Test City".to_string();

        let outcome = wizard.handle_submit().await.unwrap();
        let SubmitOutcome::Advanced { step, course_id, .. } = outcome else {
            panic!("expected to advance, got {outcome:?}");
        };
        assert_eq!(step, WizardStep::TeeBoxes);
        assert_eq!(wizard.course_id(), Some(course_id));

        wizard.add_tee_set(championship()).unwrap();
        wizard.handle_submit().await.unwrap();
        assert_eq!(wizard.step(), WizardStep::Scorecard);
        assert_eq!(store.fetch_tee_sets(course_id).await.unwrap().len(), 1);
        assert!(wizard.tee_sets[0].id.is_some());
        assert_eq!(wizard.holes.len(), 18);

        let outcome = wizard.handle_submit().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Finished {
                course_id,
                notice: "Scorecard saved".to_string(),
                redirect_to: "/admin/courses".to_string(),
                redirect_after_ms: 1500,
            }
        );
        let holes = store.fetch_holes(course_id).await.unwrap();
        assert_eq!(holes.len(), 18);
        assert_eq!(
            holes.iter().map(|h| h.handicap_index).collect::<Vec<_>>(),
            (1..=18).map(Some).collect::<Vec<_>>()
        );
        assert_eq!(wizard.snapshot().totals.par_total, 72);
    }

    #[tokio::test]
    async fn empty_name_never_reaches_the_store() {
        let store = counting_store().await;
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.course.location = "Test City".to_string();

        let err = wizard.handle_submit().await.unwrap_err();
        assert!(matches!(err, WizardError::Validation(ref v) if v.field == "name"));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
        assert_eq!(wizard.step(), WizardStep::CourseInfo);
        assert_eq!(wizard.course_id(), None);
    }

    #[tokio::test]
    async fn tee_boxes_need_a_course() {
        let store = counting_store().await;
        let mut wizard = CourseWizard::from_submission(
            &store,
            WizardSettings::default(),
            WizardSubmission {
                step: WizardStep::TeeBoxes,
                tee_sets: vec![championship()],
                ..Default::default()
            },
        );
        let err = wizard.handle_submit().await.unwrap_err();
        assert!(matches!(err, WizardError::MissingCourse(_)));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn edit_mode_loads_saved_course() {
        let store = counting_store().await;
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.course.name = "Test Course".to_string();
        wizard.course.location = "Test City".to_string();
        wizard.handle_submit().await.unwrap();
        wizard.add_tee_set(championship()).unwrap();
        wizard.handle_submit().await.unwrap();
        wizard.holes[0].distances.insert("Championship".to_string(), 402);
        wizard.handle_submit().await.unwrap();
        let course_id = wizard.course_id().unwrap();

        let mut reopened =
            CourseWizard::open(&store, WizardSettings::default(), course_id, WizardStep::Scorecard)
                .await
                .unwrap();
        assert_eq!(reopened.step(), WizardStep::Scorecard);
        assert_eq!(reopened.course.name, "Test Course");
        assert_eq!(reopened.holes[0].distances.get("Championship"), Some(&402));
        assert_eq!(reopened.back(), WizardStep::TeeBoxes);
        assert_eq!(reopened.back(), WizardStep::CourseInfo);
        assert_eq!(reopened.back(), WizardStep::CourseInfo);

        let missing =
            CourseWizard::open(&store, WizardSettings::default(), 999, WizardStep::CourseInfo).await;
        assert!(matches!(missing, Err(WizardError::CourseNotFound(999))));
    }

    #[tokio::test]
    async fn extraction_merges_course_info_and_replaces_lists() {
        let store = counting_store().await;
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.course.name = "Old Name".to_string();
        wizard.course.website = Some("x.com".to_string());
        wizard.tee_sets = vec![championship()];

        assert!(!wizard.apply_extraction(ExtractedData::default()));
        assert_eq!(wizard.tee_sets.len(), 1);

        let applied = wizard.apply_extraction(ExtractedData {
            course_info: Some(CourseInfoPatch {
                name: Some("Pebble Creek".to_string()),
                par: Some(71),
                ..Default::default()
            }),
            holes: Some(HoleForm::defaults(9)),
            ..Default::default()
        });
        assert!(applied);
        assert_eq!(wizard.course.name, "Pebble Creek");
        assert_eq!(wizard.course.par, 71);
        assert_eq!(wizard.course.website.as_deref(), Some("x.com"));
        assert_eq!(wizard.tee_sets.len(), 1);
        assert_eq!(wizard.holes.len(), 9);
    }

    #[tokio::test]
    async fn scorecard_follows_the_course_hole_count() {
        let store = counting_store().await;
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.course.name = "Nine Holer".to_string();
        wizard.course.location = "Test City".to_string();
        wizard.course.holes = 9;
        wizard.course.par = 36;
        wizard.handle_submit().await.unwrap();

        wizard.holes = HoleForm::defaults(18);
        wizard.add_tee_set(championship()).unwrap();
        wizard.handle_submit().await.unwrap();
        assert_eq!(wizard.holes.len(), 9);

        wizard.apply_extraction(ExtractedData {
            holes: Some(HoleForm::defaults(18)),
            ..Default::default()
        });
        let err = wizard.handle_submit().await.unwrap_err();
        assert!(matches!(err, WizardError::Validation(ref v) if v.field == "holes"));
        assert_eq!(wizard.step(), WizardStep::Scorecard);
        let course_id = wizard.course_id().unwrap();
        assert!(store.fetch_holes(course_id).await.unwrap().is_empty());

        HoleForm::fit_to(&mut wizard.holes, 9);
        wizard.handle_submit().await.unwrap();
        assert_eq!(store.fetch_holes(course_id).await.unwrap().len(), 9);
        assert_eq!(wizard.snapshot().totals.par_total, 36);
    }

    #[tokio::test]
    async fn failed_scorecard_save_stays_on_the_step() {
        let store = counting_store().await;
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.course.name = "Test Course".to_string();
        wizard.course.location = "Test City".to_string();
        wizard.handle_submit().await.unwrap();
        wizard.add_tee_set(championship()).unwrap();
        wizard.handle_submit().await.unwrap();
        wizard.handle_submit().await.unwrap();
        let course_id = wizard.course_id().unwrap();

        tee_set::Entity::delete_many()
            .filter(tee_set::Column::CourseId.eq(course_id))
            .exec(store.inner.connection())
            .await
            .unwrap();

        wizard.holes[0].par = 3;
        wizard.holes[0].distances.insert("Championship".to_string(), 180);
        let err = wizard.handle_submit().await.unwrap_err();
        assert!(matches!(err, WizardError::Store(StoreError::UnknownTeeSet(ref name)) if name == "Championship"));
        assert_eq!(GenericError::from(err).status_code(), 422);
        assert_eq!(wizard.step(), WizardStep::Scorecard);

        let holes = store.fetch_holes(course_id).await.unwrap();
        assert_eq!(holes.len(), 18);
        assert_eq!(holes[0].par, 4);
    }
}
