use super::MedicationRepository;
use crate::models::Medication;
use clinic_types::MedicationId;

impl MedicationRepository {
    /// Exact, case-sensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Medication> {
        let name = name.trim();
        self.iter().find(|m| m.name.as_str() == name)
    }

    /// Whether `name` is held by a medication other than `except`.
    pub fn name_taken(&self, name: &str, except: Option<MedicationId>) -> bool {
        self.find_by_name(name)
            .is_some_and(|m| Some(m.id) != except)
    }
}
