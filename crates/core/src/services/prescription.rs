//! Prescriptions and the patient medication holdings they drive.
//!
//! Creating a prescription adds one holding per listed medication to the patient;
//! removing it retracts the same. An update retracts the old list in full and adds the
//! new one, so the holdings always equal the sum over the patient's prescriptions.

use super::doctor::DoctorService;
use super::medication::MedicationService;
use super::patient::PatientService;
use super::reported;
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::Prescription;
use crate::notify::Notifier;
use crate::repositories::PrescriptionRepository;
use crate::validation::{optional_text, validate_date};
use clinic_types::{DoctorId, MedicationId, PatientId, PrescriptionId};
use std::sync::Arc;

/// Input for [`PrescriptionService::create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPrescription {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub date: String,
    pub medication_ids: Vec<MedicationId>,
    pub instructions: Option<String>,
}

impl NewPrescription {
    pub fn new(
        patient_id: PatientId,
        doctor_id: DoctorId,
        date: impl Into<String>,
        medication_ids: Vec<MedicationId>,
    ) -> Self {
        Self {
            patient_id,
            doctor_id,
            date: date.into(),
            medication_ids,
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }
}

pub struct PrescriptionService {
    repo: PrescriptionRepository,
    notifier: Arc<dyn Notifier>,
}

impl PrescriptionService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo: PrescriptionRepository::new(),
            notifier,
        }
    }

    pub fn repository(&self) -> &PrescriptionRepository {
        &self.repo
    }

    /// Stores a prescription and grants its medications to the patient.
    ///
    /// # Errors
    ///
    /// - `ClinicError::InvalidInput` for a malformed date
    /// - `ClinicError::InvalidReference` for an unknown patient, doctor or medication
    ///   (the first unknown medication id is named)
    pub fn create(
        &mut self,
        patients: &mut PatientService,
        doctors: &DoctorService,
        medications: &MedicationService,
        new: NewPrescription,
    ) -> ClinicResult<PrescriptionId> {
        let result = self.try_create(patients, doctors, medications, new);
        reported(self.notifier.as_ref(), "create prescription", result)
    }

    fn try_create(
        &mut self,
        patients: &mut PatientService,
        doctors: &DoctorService,
        medications: &MedicationService,
        new: NewPrescription,
    ) -> ClinicResult<PrescriptionId> {
        validate_date(&new.date)?;
        patients.resolve(new.patient_id)?;
        doctors.resolve(new.doctor_id)?;
        medications.resolve_all(&new.medication_ids)?;

        let id = self.repo.allocate_id()?;
        for medication_id in &new.medication_ids {
            patients.add_medication(new.patient_id, *medication_id);
        }
        self.repo.add(Prescription {
            id,
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            date: new.date.trim().to_string(),
            medication_ids: new.medication_ids,
            instructions: optional_text(new.instructions),
        });

        self.notifier
            .info(&format!("Prescription created successfully with ID: {id}"));
        Ok(id)
    }

    /// Replaces the medication list and instructions.
    ///
    /// The old list is retracted from the patient and the new one granted before the
    /// prescription itself is overwritten.
    ///
    /// # Errors
    ///
    /// - `ClinicError::NotFound` if `id` is unknown
    /// - `ClinicError::InvalidReference` naming the first unknown medication id
    pub fn update(
        &mut self,
        patients: &mut PatientService,
        medications: &MedicationService,
        id: PrescriptionId,
        medication_ids: Vec<MedicationId>,
        instructions: Option<String>,
    ) -> ClinicResult<()> {
        let result = self.try_update(patients, medications, id, medication_ids, instructions);
        reported(self.notifier.as_ref(), "update prescription", result)
    }

    fn try_update(
        &mut self,
        patients: &mut PatientService,
        medications: &MedicationService,
        id: PrescriptionId,
        medication_ids: Vec<MedicationId>,
        instructions: Option<String>,
    ) -> ClinicResult<()> {
        let prescription = self
            .repo
            .get_by_id_mut(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Prescription, id))?;
        medications.resolve_all(&medication_ids)?;

        for old in &prescription.medication_ids {
            patients.retract_medication(prescription.patient_id, *old);
        }
        for new in &medication_ids {
            patients.add_medication(prescription.patient_id, *new);
        }
        prescription.medication_ids = medication_ids;
        prescription.instructions = optional_text(instructions);

        self.notifier
            .info(&format!("Prescription {id} updated successfully"));
        Ok(())
    }

    /// Deletes a prescription after retracting its medications from the patient.
    pub fn remove(
        &mut self,
        patients: &mut PatientService,
        id: PrescriptionId,
    ) -> ClinicResult<Prescription> {
        let result = self
            .repo
            .take(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Prescription, id));
        if let Ok(prescription) = &result {
            retract_all(patients, prescription);
            self.notifier
                .info(&format!("Prescription {id} removed successfully"));
        }
        reported(self.notifier.as_ref(), "remove prescription", result)
    }

    pub fn get(&self, id: PrescriptionId) -> Option<&Prescription> {
        self.repo.get_by_id(id)
    }

    pub fn list_all(&self) -> Vec<Prescription> {
        self.repo.get_all()
    }

    pub fn by_patient(&self, patient_id: PatientId) -> Vec<Prescription> {
        self.repo.find_by_patient(patient_id)
    }

    pub fn by_doctor(&self, doctor_id: DoctorId) -> Vec<Prescription> {
        self.repo.find_by_doctor(doctor_id)
    }

    pub fn by_medication(&self, medication_id: MedicationId) -> Vec<Prescription> {
        self.repo.find_by_medication(medication_id)
    }

    /// Deletes every prescription matching `predicate`, retracting medications from
    /// patients that still exist. Returns how many went.
    pub(crate) fn purge(
        &mut self,
        patients: &mut PatientService,
        predicate: impl Fn(&Prescription) -> bool,
    ) -> usize {
        let ids = self.repo.find_ids(predicate);
        for id in &ids {
            if let Some(prescription) = self.repo.take(*id) {
                retract_all(patients, &prescription);
            }
        }
        ids.len()
    }

    /// Drops every occurrence of `medication_id` from every prescription. Returns how
    /// many prescriptions changed.
    pub(crate) fn strip_medication(&mut self, medication_id: MedicationId) -> usize {
        let mut changed = 0;
        for prescription in self.repo.iter_mut() {
            if prescription.lists(medication_id) {
                prescription.medication_ids.retain(|m| *m != medication_id);
                changed += 1;
            }
        }
        changed
    }
}

fn retract_all(patients: &mut PatientService, prescription: &Prescription) {
    for medication_id in &prescription.medication_ids {
        patients.retract_medication(prescription.patient_id, *medication_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoctorDetails, MedicationDetails, PatientDetails};
    use crate::notify::RecordingNotifier;

    struct Fixture {
        patients: PatientService,
        doctors: DoctorService,
        medications: MedicationService,
        prescriptions: PrescriptionService,
        p1: PatientId,
        d1: DoctorId,
        aspirin: MedicationId,
        ibuprofen: MedicationId,
    }

    fn fixture() -> Fixture {
        let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::new());
        let mut patients = PatientService::new(notifier.clone());
        let mut doctors = DoctorService::new(notifier.clone());
        let mut medications = MedicationService::new(notifier.clone());
        let prescriptions = PrescriptionService::new(notifier);

        let p1 = patients.add(PatientDetails::new("Ann Lee", 34, "Flu")).unwrap();
        let d1 = doctors
            .add(DoctorDetails::new("Dr. Grey", "General", 80.0))
            .unwrap();
        let aspirin = medications
            .add(MedicationDetails::new("Aspirin", "100mg", 2.5))
            .unwrap();
        let ibuprofen = medications
            .add(MedicationDetails::new("Ibuprofen", "200mg", 3.0))
            .unwrap();

        Fixture {
            patients,
            doctors,
            medications,
            prescriptions,
            p1,
            d1,
            aspirin,
            ibuprofen,
        }
    }

    impl Fixture {
        fn create(&mut self, medication_ids: Vec<MedicationId>) -> ClinicResult<PrescriptionId> {
            self.prescriptions.create(
                &mut self.patients,
                &self.doctors,
                &self.medications,
                NewPrescription::new(self.p1, self.d1, "2024-05-01", medication_ids),
            )
        }

        fn holds(&self, medication_id: MedicationId) -> u32 {
            self.patients
                .get(self.p1)
                .unwrap()
                .medications
                .count(medication_id)
        }
    }

    #[test]
    fn test_create_grants_medications() {
        let mut f = fixture();
        f.create(vec![f.aspirin]).unwrap();
        assert_eq!(f.holds(f.aspirin), 1);
    }

    #[test]
    fn test_remove_retracts_medications() {
        let mut f = fixture();
        let id = f.create(vec![f.aspirin]).unwrap();

        f.prescriptions.remove(&mut f.patients, id).unwrap();
        assert_eq!(f.holds(f.aspirin), 0);
        assert!(f.prescriptions.get(id).is_none());
    }

    #[test]
    fn test_remove_keeps_medication_granted_by_surviving_prescription() {
        let mut f = fixture();
        let first = f.create(vec![f.aspirin]).unwrap();
        f.create(vec![f.aspirin, f.ibuprofen]).unwrap();
        assert_eq!(f.holds(f.aspirin), 2);

        f.prescriptions.remove(&mut f.patients, first).unwrap();
        assert_eq!(f.holds(f.aspirin), 1);
        assert_eq!(f.holds(f.ibuprofen), 1);
    }

    #[test]
    fn test_duplicates_in_one_prescription_counted_per_occurrence() {
        let mut f = fixture();
        let id = f.create(vec![f.aspirin, f.aspirin]).unwrap();
        f.create(vec![f.aspirin]).unwrap();
        assert_eq!(f.holds(f.aspirin), 3);

        f.prescriptions.remove(&mut f.patients, id).unwrap();
        assert_eq!(f.holds(f.aspirin), 1);
    }

    #[test]
    fn test_unknown_medication_named_and_nothing_written() {
        let mut f = fixture();
        let result = f.create(vec![f.aspirin, MedicationId::new(77)]);

        assert_eq!(
            result,
            Err(ClinicError::InvalidReference {
                entity: EntityKind::Medication,
                id: 77
            })
        );
        assert!(f.prescriptions.list_all().is_empty());
        assert_eq!(f.holds(f.aspirin), 0);
    }

    #[test]
    fn test_unknown_patient_or_doctor_rejected() {
        let mut f = fixture();
        let result = f.prescriptions.create(
            &mut f.patients,
            &f.doctors,
            &f.medications,
            NewPrescription::new(PatientId::new(9), f.d1, "2024-05-01", vec![]),
        );
        assert!(matches!(
            result,
            Err(ClinicError::InvalidReference {
                entity: EntityKind::Patient,
                ..
            })
        ));

        let result = f.prescriptions.create(
            &mut f.patients,
            &f.doctors,
            &f.medications,
            NewPrescription::new(f.p1, DoctorId::new(9), "2024-05-01", vec![]),
        );
        assert!(matches!(
            result,
            Err(ClinicError::InvalidReference {
                entity: EntityKind::Doctor,
                ..
            })
        ));
    }

    #[test]
    fn test_update_replaces_holdings() {
        let mut f = fixture();
        let id = f.create(vec![f.aspirin]).unwrap();

        f.prescriptions
            .update(
                &mut f.patients,
                &f.medications,
                id,
                vec![f.ibuprofen],
                Some("twice daily".into()),
            )
            .unwrap();

        assert_eq!(f.holds(f.aspirin), 0);
        assert_eq!(f.holds(f.ibuprofen), 1);
        let stored = f.prescriptions.get(id).unwrap();
        assert_eq!(stored.medication_ids, vec![f.ibuprofen]);
        assert_eq!(stored.instructions.as_deref(), Some("twice daily"));
    }

    #[test]
    fn test_update_with_unknown_medication_changes_nothing() {
        let mut f = fixture();
        let id = f.create(vec![f.aspirin]).unwrap();

        let result = f.prescriptions.update(
            &mut f.patients,
            &f.medications,
            id,
            vec![MedicationId::new(55)],
            None,
        );
        assert!(matches!(result, Err(ClinicError::InvalidReference { .. })));
        assert_eq!(f.holds(f.aspirin), 1);
        assert_eq!(f.prescriptions.get(id).unwrap().medication_ids, vec![f.aspirin]);
    }

    #[test]
    fn test_update_unknown_prescription_is_not_found() {
        let mut f = fixture();
        let result = f.prescriptions.update(
            &mut f.patients,
            &f.medications,
            PrescriptionId::new(4),
            vec![],
            None,
        );
        assert!(matches!(
            result,
            Err(ClinicError::NotFound {
                entity: EntityKind::Prescription,
                id: 4
            })
        ));
    }

    #[test]
    fn test_strip_medication_edits_lists() {
        let mut f = fixture();
        let id = f.create(vec![f.aspirin, f.ibuprofen, f.aspirin]).unwrap();

        assert_eq!(f.prescriptions.strip_medication(f.aspirin), 1);
        assert_eq!(f.prescriptions.get(id).unwrap().medication_ids, vec![f.ibuprofen]);
        assert_eq!(f.prescriptions.by_medication(f.aspirin).len(), 0);
    }

    #[test]
    fn test_projections_by_patient_and_doctor() {
        let mut f = fixture();
        f.create(vec![f.aspirin]).unwrap();
        f.create(vec![]).unwrap();

        assert_eq!(f.prescriptions.by_patient(f.p1).len(), 2);
        assert_eq!(f.prescriptions.by_doctor(f.d1).len(), 2);
        assert!(f.prescriptions.by_doctor(DoctorId::new(2)).is_empty());
    }
}
