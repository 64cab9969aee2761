//! In-memory edits of the tee box list. Nothing here touches the store;
//! the list is saved as a whole when the step is submitted.

use super::CourseWizard;
use crate::dto::{validate_tee_sets, TeeSetForm};
use crate::error::ValidationError;
use crate::store::CourseStore;

fn no_tee_set(index: usize) -> ValidationError {
    ValidationError::new("tee_sets", format!("No tee set at position {index}"))
}

impl<S: CourseStore + ?Sized> CourseWizard<'_, S> {
    /// Appends a tee set and returns its position.
    pub fn add_tee_set(&mut self, tee: TeeSetForm) -> Result<usize, ValidationError> {
        let mut candidate = self.tee_sets.clone();
        candidate.push(tee);
        validate_tee_sets(&candidate)?;
        self.tee_sets = candidate;
        Ok(self.tee_sets.len() - 1)
    }

    /// Replaces the tee set at `index`. A rename carries the hole distances
    /// over to the new name.
    pub fn update_tee_set(&mut self, index: usize, tee: TeeSetForm) -> Result<(), ValidationError> {
        let mut candidate = self.tee_sets.clone();
        let slot = candidate.get_mut(index).ok_or_else(|| no_tee_set(index))?;
        let old_name = std::mem::replace(slot, tee).name;
        validate_tee_sets(&candidate)?;

        let new_name = candidate[index].name.clone();
        if old_name != new_name {
            for hole in &mut self.holes {
                if let Some(length) = hole.take_distance(&old_name) {
                    hole.set_distance(&new_name, length);
                }
            }
        }
        self.tee_sets = candidate;
        Ok(())
    }

    /// Drops the tee set at `index` together with its hole distances.
    pub fn remove_tee_set(&mut self, index: usize) -> Result<TeeSetForm, ValidationError> {
        if index >= self.tee_sets.len() {
            return Err(no_tee_set(index));
        }
        let removed = self.tee_sets.remove(index);
        for hole in &mut self.holes {
            hole.take_distance(&removed.name);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::dto::{HoleForm, TeeSetForm};
    use crate::store::{DbCourseStore, SchemaRefreshPolicy};
    use crate::test_support::migrated_db;
    use crate::wizard::{CourseWizard, WizardSettings};

    fn tee(name: &str) -> TeeSetForm {
        TeeSetForm {
            id: None,
            name: name.to_string(),
            color: name.to_string(),
            rating: 70.1,
            slope: 125,
            par: None,
            distance: None,
        }
    }

    #[tokio::test]
    async fn edits_keep_distances_in_step() {
        let store = DbCourseStore::new(migrated_db().await, SchemaRefreshPolicy::default());
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.add_tee_set(tee("Blue")).unwrap();
        wizard.add_tee_set(tee("White")).unwrap();
        assert!(wizard.add_tee_set(tee("blue")).is_err());
        assert_eq!(wizard.tee_sets.len(), 2);

        wizard.holes = HoleForm::defaults(2);
        wizard.holes[0].distances.insert("Blue".to_string(), 380);
        wizard.holes[0].distances.insert("White".to_string(), 350);

        wizard.update_tee_set(0, tee("Navy")).unwrap();
        assert_eq!(wizard.holes[0].distances.get("Navy"), Some(&380));
        assert!(wizard.holes[0].distances.get("Blue").is_none());

        let removed = wizard.remove_tee_set(1).unwrap();
        assert_eq!(removed.name, "White");
        assert_eq!(wizard.holes[0].distances.len(), 1);
        assert!(wizard.remove_tee_set(5).is_err());
    }

    #[tokio::test]
    async fn distances_follow_tee_sets_whatever_their_case() {
        let store = DbCourseStore::new(migrated_db().await, SchemaRefreshPolicy::default());
        let mut wizard = CourseWizard::new(&store, WizardSettings::default());
        wizard.add_tee_set(tee("Blue")).unwrap();
        wizard.add_tee_set(tee("Red")).unwrap();
        wizard.holes = HoleForm::defaults(1);
        wizard.holes[0].distances.insert("blue".to_string(), 380);
        wizard.holes[0].distances.insert("RED".to_string(), 300);

        wizard.update_tee_set(0, tee("Navy")).unwrap();
        assert_eq!(wizard.holes[0].distances.get("Navy"), Some(&380));
        assert!(wizard.holes[0].distance("blue").is_none());

        wizard.remove_tee_set(1).unwrap();
        assert_eq!(wizard.holes[0].distances.len(), 1);
        assert!(wizard.holes[0].distance("Red").is_none());
    }
}
