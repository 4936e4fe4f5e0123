use super::DoctorRepository;
use crate::models::Doctor;

impl DoctorRepository {
    pub fn find_by_specialization(&self, specialization: &str) -> Vec<Doctor> {
        let specialization = specialization.trim();
        self.find(|d| d.specialization.eq_ignore_ascii_case(specialization))
    }

    pub fn find_available(&self) -> Vec<Doctor> {
        self.find(|d| d.available)
    }
}
