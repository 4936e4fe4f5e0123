use super::PatientRepository;
use crate::models::Patient;
use clinic_types::MedicationId;

impl PatientRepository {
    /// Patients whose disease matches exactly (ignoring ASCII case).
    pub fn find_by_disease(&self, disease: &str) -> Vec<Patient> {
        let disease = disease.trim();
        self.find(|p| p.disease.eq_ignore_ascii_case(disease))
    }

    /// Patients aged `min..=max`.
    pub fn find_by_age_range(&self, min: u32, max: u32) -> Vec<Patient> {
        self.find(|p| (min..=max).contains(&p.age))
    }

    pub fn find_by_name(&self, fragment: &str) -> Vec<Patient> {
        self.find(|p| p.name.contains_ignore_case(fragment))
    }

    pub fn find_holding(&self, medication_id: MedicationId) -> Vec<Patient> {
        self.find(|p| p.medications.contains(medication_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientDetails;
    use clinic_types::NonEmptyText;

    fn seeded() -> PatientRepository {
        let mut repo = PatientRepository::new();
        for (name, age, disease) in [
            ("Ann Lee", 34, "Flu"),
            ("Bob Ray", 61, "Diabetes"),
            ("Cal Moss", 45, "flu"),
        ] {
            let id = repo.allocate_id().unwrap();
            repo.add(Patient::new(
                id,
                NonEmptyText::new(name).unwrap(),
                PatientDetails::new(name, age, disease),
            ));
        }
        repo
    }

    #[test]
    fn test_find_by_disease_ignores_case() {
        let repo = seeded();
        let names: Vec<_> = repo
            .find_by_disease("FLU")
            .into_iter()
            .map(|p| p.name.into_inner())
            .collect();
        assert_eq!(names, vec!["Ann Lee", "Cal Moss"]);
    }

    #[test]
    fn test_find_by_age_range_is_inclusive() {
        let repo = seeded();
        assert_eq!(repo.find_by_age_range(34, 45).len(), 2);
        assert_eq!(repo.find_by_age_range(62, 90).len(), 0);
        assert_eq!(repo.find_by_age_range(50, 40).len(), 0);
    }

    #[test]
    fn test_find_by_name_fragment() {
        let repo = seeded();
        assert_eq!(repo.find_by_name("ray").len(), 1);
    }
}
