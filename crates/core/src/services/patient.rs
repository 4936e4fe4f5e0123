use super::reported;
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{Patient, PatientDetails};
use crate::notify::Notifier;
use crate::repositories::PatientRepository;
use crate::validation::{optional_text, required_text};
use clinic_types::{MedicationId, PatientId};
use std::sync::Arc;

/// Patient registration and demographic upkeep.
pub struct PatientService {
    repo: PatientRepository,
    notifier: Arc<dyn Notifier>,
}

impl PatientService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo: PatientRepository::new(),
            notifier,
        }
    }

    pub fn repository(&self) -> &PatientRepository {
        &self.repo
    }

    /// Registers a patient and returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidInput` if the name is empty.
    pub fn add(&mut self, details: PatientDetails) -> ClinicResult<PatientId> {
        let result = self.insert(details);
        reported(self.notifier.as_ref(), "add patient", result)
    }

    fn insert(&mut self, details: PatientDetails) -> ClinicResult<PatientId> {
        let name = required_text("patient name", &details.name)?;
        let details = normalise(details);

        let id = self.repo.allocate_id()?;
        self.repo.add(Patient::new(id, name, details));

        self.notifier
            .info(&format!("Patient added successfully with ID: {id}"));
        Ok(id)
    }

    /// Replaces every demographic field of an existing patient.
    ///
    /// Medication holdings are not part of the replace; they follow prescriptions.
    ///
    /// # Errors
    ///
    /// - `ClinicError::NotFound` if `id` is unknown
    /// - `ClinicError::InvalidInput` if the name is empty
    pub fn update(&mut self, id: PatientId, details: PatientDetails) -> ClinicResult<()> {
        let result = self.replace(id, details);
        reported(self.notifier.as_ref(), "update patient", result)
    }

    fn replace(&mut self, id: PatientId, details: PatientDetails) -> ClinicResult<()> {
        let name = required_text("patient name", &details.name)?;
        let patient = self
            .repo
            .get_by_id_mut(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Patient, id))?;

        patient.replace_details(name, normalise(details));

        self.notifier
            .info(&format!("Patient {id} updated successfully"));
        Ok(())
    }

    /// Overwrites the patient's diagnosis, leaving every other field as it is.
    ///
    /// # Errors
    ///
    /// - `ClinicError::NotFound` if `id` is unknown
    /// - `ClinicError::InvalidInput` if the diagnosis is empty
    pub fn record_diagnosis(&mut self, id: PatientId, diagnosis: &str) -> ClinicResult<()> {
        let result = self.overwrite_disease(id, diagnosis);
        reported(self.notifier.as_ref(), "record diagnosis", result)
    }

    fn overwrite_disease(&mut self, id: PatientId, diagnosis: &str) -> ClinicResult<()> {
        let diagnosis = required_text("diagnosis", diagnosis)?;
        let patient = self
            .repo
            .get_by_id_mut(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Patient, id))?;

        patient.disease = diagnosis.into_inner();

        self.notifier
            .info(&format!("Patient {id} diagnosed with {}", patient.disease));
        Ok(())
    }

    /// Deletes a patient record and returns it.
    ///
    /// This does not look at appointments, prescriptions or bills; use
    /// [`crate::Clinic::remove_patient`] for policy-aware removal.
    pub fn remove(&mut self, id: PatientId) -> ClinicResult<Patient> {
        let result = self
            .repo
            .take(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Patient, id));
        if result.is_ok() {
            self.notifier
                .info(&format!("Patient {id} removed successfully"));
        }
        reported(self.notifier.as_ref(), "remove patient", result)
    }

    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.repo.get_by_id(id)
    }

    /// Resolves a patient referenced from another record.
    pub(crate) fn resolve(&self, id: PatientId) -> ClinicResult<&Patient> {
        self.repo
            .get_by_id(id)
            .ok_or_else(|| ClinicError::invalid_reference(EntityKind::Patient, id))
    }

    pub fn list_all(&self) -> Vec<Patient> {
        self.repo.get_all()
    }

    pub fn find_by_disease(&self, disease: &str) -> Vec<Patient> {
        self.repo.find_by_disease(disease)
    }

    pub fn find_by_age_range(&self, min: u32, max: u32) -> Vec<Patient> {
        self.repo.find_by_age_range(min, max)
    }

    pub fn find_by_name(&self, fragment: &str) -> Vec<Patient> {
        self.repo.find_by_name(fragment)
    }

    /// Records one more reference to `medication_id` on the patient.
    ///
    /// Returns `false` if the patient no longer exists.
    pub(crate) fn add_medication(
        &mut self,
        patient_id: PatientId,
        medication_id: MedicationId,
    ) -> bool {
        match self.repo.get_by_id_mut(patient_id) {
            Some(patient) => {
                patient.medications.add(medication_id);
                true
            }
            None => false,
        }
    }

    /// Drops one reference to `medication_id` from the patient.
    pub(crate) fn retract_medication(
        &mut self,
        patient_id: PatientId,
        medication_id: MedicationId,
    ) -> bool {
        self.repo
            .get_by_id_mut(patient_id)
            .is_some_and(|patient| patient.medications.retract(medication_id))
    }

    /// Drops `medication_id` from every patient. Returns how many patients held it.
    pub(crate) fn purge_medication(&mut self, medication_id: MedicationId) -> usize {
        self.repo
            .iter_mut()
            .map(|patient| patient.medications.purge(medication_id))
            .filter(|removed| *removed > 0)
            .count()
    }
}

fn normalise(details: PatientDetails) -> PatientDetails {
    PatientDetails {
        contact: optional_text(details.contact),
        address: optional_text(details.address),
        blood_group: optional_text(details.blood_group),
        ..details
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{RecordingNotifier, Severity};

    fn service() -> (Arc<RecordingNotifier>, PatientService) {
        let notifier = Arc::new(RecordingNotifier::new());
        (notifier.clone(), PatientService::new(notifier))
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let (_, mut patients) = service();
        let first = patients.add(PatientDetails::new("Ann Lee", 34, "Flu")).unwrap();
        let second = patients.add(PatientDetails::new("Bob Ray", 61, "Asthma")).unwrap();

        assert_eq!(first, PatientId::new(1));
        assert_eq!(second, PatientId::new(2));
    }

    #[test]
    fn test_add_reports_success() {
        let (notifier, mut patients) = service();
        patients.add(PatientDetails::new("Ann Lee", 34, "Flu")).unwrap();

        assert_eq!(
            notifier.messages(Severity::Info),
            vec!["Patient added successfully with ID: 1".to_string()]
        );
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let (notifier, mut patients) = service();
        let result = patients.add(PatientDetails::new("  ", 34, "Flu"));

        assert!(matches!(result, Err(ClinicError::InvalidInput(_))));
        assert!(patients.list_all().is_empty());
        assert_eq!(notifier.messages(Severity::Warning).len(), 1);
    }

    #[test]
    fn test_fetched_fields_match_last_update() {
        let (_, mut patients) = service();
        let id = patients
            .add(
                PatientDetails::new("Ann Lee", 34, "Flu")
                    .with_contact("555-0100")
                    .with_blood_group("O+"),
            )
            .unwrap();

        let fetched = patients.get(id).unwrap();
        assert_eq!(fetched.name.as_str(), "Ann Lee");
        assert_eq!(fetched.contact.as_deref(), Some("555-0100"));

        patients
            .update(
                id,
                PatientDetails::new("Ann Lee-Park", 35, "Bronchitis").with_address("1 Elm St"),
            )
            .unwrap();

        let fetched = patients.get(id).unwrap();
        assert_eq!(fetched.name.as_str(), "Ann Lee-Park");
        assert_eq!(fetched.age, 35);
        assert_eq!(fetched.disease, "Bronchitis");
        assert_eq!(fetched.address.as_deref(), Some("1 Elm St"));
        // full replace: fields left out of the update are cleared
        assert_eq!(fetched.contact, None);
        assert_eq!(fetched.blood_group, None);
    }

    #[test]
    fn test_update_keeps_medication_holdings() {
        let (_, mut patients) = service();
        let id = patients.add(PatientDetails::new("Ann Lee", 34, "Flu")).unwrap();
        assert!(patients.add_medication(id, MedicationId::new(4)));

        patients
            .update(id, PatientDetails::new("Ann Lee", 34, "Cold"))
            .unwrap();
        assert!(patients.get(id).unwrap().medications.contains(MedicationId::new(4)));
    }

    #[test]
    fn test_update_unknown_patient_is_not_found() {
        let (_, mut patients) = service();
        let result = patients.update(PatientId::new(9), PatientDetails::new("X", 1, "Y"));
        assert_eq!(
            result,
            Err(ClinicError::NotFound {
                entity: EntityKind::Patient,
                id: 9
            })
        );
    }

    #[test]
    fn test_remove_then_get_is_none() {
        let (_, mut patients) = service();
        let id = patients.add(PatientDetails::new("Ann Lee", 34, "Flu")).unwrap();

        let removed = patients.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(patients.get(id).is_none());
        assert!(matches!(
            patients.remove(id),
            Err(ClinicError::NotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_reports_invalid_reference() {
        let (_, patients) = service();
        assert!(matches!(
            patients.resolve(PatientId::new(1)),
            Err(ClinicError::InvalidReference {
                entity: EntityKind::Patient,
                id: 1
            })
        ));
    }

    #[test]
    fn test_record_diagnosis_touches_disease_only() {
        let (notifier, mut patients) = service();
        let id = patients
            .add(PatientDetails::new("Ann Lee", 34, "Flu").with_contact("555-0100"))
            .unwrap();
        patients.add_medication(id, MedicationId::new(1));

        patients.record_diagnosis(id, "  Pneumonia ").unwrap();

        let patient = patients.get(id).unwrap();
        assert_eq!(patient.disease, "Pneumonia");
        assert_eq!(patient.age, 34);
        assert_eq!(patient.contact.as_deref(), Some("555-0100"));
        assert!(patient.medications.contains(MedicationId::new(1)));
        assert!(notifier
            .messages(Severity::Info)
            .contains(&format!("Patient {id} diagnosed with Pneumonia")));
    }

    #[test]
    fn test_record_diagnosis_rejects_unknown_and_empty() {
        let (_, mut patients) = service();
        let id = patients.add(PatientDetails::new("Ann Lee", 34, "Flu")).unwrap();

        assert!(matches!(
            patients.record_diagnosis(PatientId::new(9), "Flu"),
            Err(ClinicError::NotFound {
                entity: EntityKind::Patient,
                id: 9
            })
        ));
        assert!(matches!(
            patients.record_diagnosis(id, "   "),
            Err(ClinicError::InvalidInput(_))
        ));
        assert_eq!(patients.get(id).unwrap().disease, "Flu");
    }

    #[test]
    fn test_purge_medication_counts_holders() {
        let (_, mut patients) = service();
        let a = patients.add(PatientDetails::new("A", 1, "x")).unwrap();
        let b = patients.add(PatientDetails::new("B", 2, "x")).unwrap();
        let med = MedicationId::new(1);
        patients.add_medication(a, med);
        patients.add_medication(a, med);
        patients.add_medication(b, MedicationId::new(2));

        assert_eq!(patients.purge_medication(med), 1);
        assert!(!patients.get(a).unwrap().medications.contains(med));
    }
}
