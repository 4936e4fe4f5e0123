use super::reported;
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{Medication, MedicationDetails};
use crate::notify::Notifier;
use crate::repositories::MedicationRepository;
use crate::validation::{optional_text, required_text, validate_amount};
use clinic_types::{MedicationId, NonEmptyText};
use std::sync::Arc;

/// The medication formulary. Names are unique, compared exactly.
pub struct MedicationService {
    repo: MedicationRepository,
    notifier: Arc<dyn Notifier>,
}

impl MedicationService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo: MedicationRepository::new(),
            notifier,
        }
    }

    pub fn repository(&self) -> &MedicationRepository {
        &self.repo
    }

    /// Adds a medication and returns the new id.
    ///
    /// # Errors
    ///
    /// - `ClinicError::DuplicateName` if another medication already has this name
    /// - `ClinicError::InvalidInput` if the name is empty or the price negative
    pub fn add(&mut self, details: MedicationDetails) -> ClinicResult<MedicationId> {
        let result = self.insert(details);
        reported(self.notifier.as_ref(), "add medication", result)
    }

    fn insert(&mut self, details: MedicationDetails) -> ClinicResult<MedicationId> {
        let (name, details) = checked(details)?;
        if self.repo.name_taken(name.as_str(), None) {
            return Err(ClinicError::DuplicateName(name.into_inner()));
        }

        let id = self.repo.allocate_id()?;
        self.repo.add(Medication::new(id, name, details));

        self.notifier
            .info(&format!("Medication added successfully with ID: {id}"));
        Ok(id)
    }

    /// Replaces every field of an existing medication.
    ///
    /// # Errors
    ///
    /// - `ClinicError::NotFound` if `id` is unknown
    /// - `ClinicError::DuplicateName` if the new name belongs to a different medication
    pub fn update(&mut self, id: MedicationId, details: MedicationDetails) -> ClinicResult<()> {
        let result = self.replace(id, details);
        reported(self.notifier.as_ref(), "update medication", result)
    }

    fn replace(&mut self, id: MedicationId, details: MedicationDetails) -> ClinicResult<()> {
        let (name, details) = checked(details)?;
        if !self.repo.contains(id) {
            return Err(ClinicError::not_found(EntityKind::Medication, id));
        }
        if self.repo.name_taken(name.as_str(), Some(id)) {
            return Err(ClinicError::DuplicateName(name.into_inner()));
        }

        if let Some(medication) = self.repo.get_by_id_mut(id) {
            medication.replace_details(name, details);
        }

        self.notifier
            .info(&format!("Medication {id} updated successfully"));
        Ok(())
    }

    /// Deletes a medication and returns it.
    ///
    /// Patients holding it and prescriptions listing it are untouched; see
    /// [`crate::Clinic::remove_medication`].
    pub fn remove(&mut self, id: MedicationId) -> ClinicResult<Medication> {
        let result = self
            .repo
            .take(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Medication, id));
        if result.is_ok() {
            self.notifier
                .info(&format!("Medication {id} removed successfully"));
        }
        reported(self.notifier.as_ref(), "remove medication", result)
    }

    pub fn get(&self, id: MedicationId) -> Option<&Medication> {
        self.repo.get_by_id(id)
    }

    /// Checks that every id in `ids` exists, naming the first one that does not.
    pub(crate) fn resolve_all(&self, ids: &[MedicationId]) -> ClinicResult<()> {
        match ids.iter().find(|id| !self.repo.contains(**id)) {
            Some(missing) => Err(ClinicError::invalid_reference(
                EntityKind::Medication,
                *missing,
            )),
            None => Ok(()),
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Medication> {
        self.repo.find_by_name(name)
    }

    pub fn list_all(&self) -> Vec<Medication> {
        self.repo.get_all()
    }
}

fn checked(details: MedicationDetails) -> ClinicResult<(NonEmptyText, MedicationDetails)> {
    let name = required_text("medication name", &details.name)?;
    validate_amount("price", details.price)?;

    Ok((
        name,
        MedicationDetails {
            manufacturer: optional_text(details.manufacturer),
            description: optional_text(details.description),
            ..details
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    fn service() -> MedicationService {
        MedicationService::new(Arc::new(RecordingNotifier::new()))
    }

    #[test]
    fn test_duplicate_name_rejected_on_add() {
        let mut meds = service();
        meds.add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();

        let result = meds.add(MedicationDetails::new("Aspirin", "300mg", 4.0));
        assert_eq!(result, Err(ClinicError::DuplicateName("Aspirin".into())));
        assert_eq!(meds.list_all().len(), 1);
    }

    #[test]
    fn test_name_match_is_case_sensitive() {
        let mut meds = service();
        meds.add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();
        assert!(meds
            .add(MedicationDetails::new("aspirin", "100mg", 2.5))
            .is_ok());
    }

    #[test]
    fn test_rename_into_existing_name_rejected() {
        let mut meds = service();
        meds.add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();
        let ibu = meds
            .add(MedicationDetails::new("Ibuprofen", "200mg", 3.0))
            .unwrap();

        let result = meds.update(ibu, MedicationDetails::new("Aspirin", "200mg", 3.0));
        assert!(matches!(result, Err(ClinicError::DuplicateName(_))));
        assert_eq!(meds.get(ibu).unwrap().name.as_str(), "Ibuprofen");
    }

    #[test]
    fn test_update_keeping_own_name_allowed() {
        let mut meds = service();
        let id = meds
            .add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();

        meds.update(
            id,
            MedicationDetails::new("Aspirin", "300mg", 3.5).with_manufacturer("Bayer"),
        )
        .unwrap();

        let med = meds.get(id).unwrap();
        assert_eq!(med.dosage, "300mg");
        assert_eq!(med.manufacturer.as_deref(), Some("Bayer"));
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let mut meds = service();
        assert!(matches!(
            meds.update(MedicationId::new(5), MedicationDetails::new("X", "1mg", 1.0)),
            Err(ClinicError::NotFound { .. })
        ));
    }

    #[test]
    fn test_removed_name_can_be_reused() {
        let mut meds = service();
        let id = meds
            .add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();
        meds.remove(id).unwrap();

        let again = meds
            .add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();
        assert_ne!(id, again);
    }

    #[test]
    fn test_resolve_all_names_first_missing_id() {
        let mut meds = service();
        let id = meds
            .add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();

        assert!(meds.resolve_all(&[id, id]).is_ok());
        assert_eq!(
            meds.resolve_all(&[id, MedicationId::new(7), MedicationId::new(8)]),
            Err(ClinicError::InvalidReference {
                entity: EntityKind::Medication,
                id: 7
            })
        );
    }
}
