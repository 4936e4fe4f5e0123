use clinic_types::{DoctorId, MedicationId, PatientId, PrescriptionId};
use serde::{Deserialize, Serialize};

/// A prescription lists medications in order; the same id may appear more than once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub medication_ids: Vec<MedicationId>,
    pub instructions: Option<String>,
}

impl Prescription {
    pub fn lists(&self, medication_id: MedicationId) -> bool {
        self.medication_ids.contains(&medication_id)
    }
}
