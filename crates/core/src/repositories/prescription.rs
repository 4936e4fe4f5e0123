use super::PrescriptionRepository;
use crate::models::Prescription;
use clinic_types::{DoctorId, MedicationId, PatientId};

impl PrescriptionRepository {
    pub fn find_by_patient(&self, patient_id: PatientId) -> Vec<Prescription> {
        self.find(|p| p.patient_id == patient_id)
    }

    pub fn find_by_doctor(&self, doctor_id: DoctorId) -> Vec<Prescription> {
        self.find(|p| p.doctor_id == doctor_id)
    }

    pub fn find_by_medication(&self, medication_id: MedicationId) -> Vec<Prescription> {
        self.find(|p| p.lists(medication_id))
    }
}
