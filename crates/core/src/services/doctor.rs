use super::reported;
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{Doctor, DoctorDetails};
use crate::notify::Notifier;
use crate::repositories::DoctorRepository;
use crate::validation::{optional_text, required_text, validate_amount};
use clinic_types::{DoctorId, NonEmptyText};
use std::sync::Arc;

/// Doctor roster and availability.
pub struct DoctorService {
    repo: DoctorRepository,
    notifier: Arc<dyn Notifier>,
}

impl DoctorService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo: DoctorRepository::new(),
            notifier,
        }
    }

    pub fn repository(&self) -> &DoctorRepository {
        &self.repo
    }

    /// Adds a doctor and returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::InvalidInput` if the name is empty or the fee is negative.
    pub fn add(&mut self, details: DoctorDetails) -> ClinicResult<DoctorId> {
        let result = self.insert(details);
        reported(self.notifier.as_ref(), "add doctor", result)
    }

    fn insert(&mut self, details: DoctorDetails) -> ClinicResult<DoctorId> {
        let (name, details) = checked(details)?;

        let id = self.repo.allocate_id()?;
        self.repo.add(Doctor::new(id, name, details));

        self.notifier
            .info(&format!("Doctor added successfully with ID: {id}"));
        Ok(id)
    }

    /// Replaces every field of an existing doctor, availability included.
    pub fn update(&mut self, id: DoctorId, details: DoctorDetails) -> ClinicResult<()> {
        let result = self.replace(id, details);
        reported(self.notifier.as_ref(), "update doctor", result)
    }

    fn replace(&mut self, id: DoctorId, details: DoctorDetails) -> ClinicResult<()> {
        let (name, details) = checked(details)?;
        let doctor = self
            .repo
            .get_by_id_mut(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Doctor, id))?;

        doctor.replace_details(name, details);

        self.notifier.info(&format!("Doctor {id} updated successfully"));
        Ok(())
    }

    /// Deletes a doctor record and returns it. Appointments and prescriptions are
    /// untouched; see [`crate::Clinic::remove_doctor`].
    pub fn remove(&mut self, id: DoctorId) -> ClinicResult<Doctor> {
        let result = self
            .repo
            .take(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Doctor, id));
        if result.is_ok() {
            self.notifier.info(&format!("Doctor {id} removed successfully"));
        }
        reported(self.notifier.as_ref(), "remove doctor", result)
    }

    pub fn set_availability(&mut self, id: DoctorId, available: bool) -> ClinicResult<()> {
        let result = match self.repo.get_by_id_mut(id) {
            Some(doctor) => {
                doctor.available = available;
                let state = if available { "available" } else { "unavailable" };
                self.notifier.info(&format!("Doctor {id} marked {state}"));
                Ok(())
            }
            None => Err(ClinicError::not_found(EntityKind::Doctor, id)),
        };
        reported(self.notifier.as_ref(), "set doctor availability", result)
    }

    pub fn get(&self, id: DoctorId) -> Option<&Doctor> {
        self.repo.get_by_id(id)
    }

    pub(crate) fn resolve(&self, id: DoctorId) -> ClinicResult<&Doctor> {
        self.repo
            .get_by_id(id)
            .ok_or_else(|| ClinicError::invalid_reference(EntityKind::Doctor, id))
    }

    pub fn list_all(&self) -> Vec<Doctor> {
        self.repo.get_all()
    }

    pub fn find_by_specialization(&self, specialization: &str) -> Vec<Doctor> {
        self.repo.find_by_specialization(specialization)
    }

    pub fn find_available_doctors(&self) -> Vec<Doctor> {
        self.repo.find_available()
    }
}

fn checked(details: DoctorDetails) -> ClinicResult<(NonEmptyText, DoctorDetails)> {
    let name = required_text("doctor name", &details.name)?;
    validate_amount("consultation fee", details.consultation_fee)?;

    Ok((
        name,
        DoctorDetails {
            contact: optional_text(details.contact),
            email: optional_text(details.email),
            ..details
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    fn service() -> DoctorService {
        DoctorService::new(Arc::new(RecordingNotifier::new()))
    }

    #[test]
    fn test_add_and_find_by_specialization() {
        let mut doctors = service();
        doctors
            .add(DoctorDetails::new("Dr. Grey", "Cardiology", 120.0))
            .unwrap();
        doctors
            .add(DoctorDetails::new("Dr. Shep", "Neurology", 150.0))
            .unwrap();

        let cardio = doctors.find_by_specialization("cardiology");
        assert_eq!(cardio.len(), 1);
        assert_eq!(cardio[0].name.as_str(), "Dr. Grey");
    }

    #[test]
    fn test_set_availability_filters_available() {
        let mut doctors = service();
        let grey = doctors
            .add(DoctorDetails::new("Dr. Grey", "Cardiology", 120.0))
            .unwrap();
        let shep = doctors
            .add(DoctorDetails::new("Dr. Shep", "Neurology", 150.0))
            .unwrap();

        doctors.set_availability(grey, false).unwrap();

        let available: Vec<_> = doctors
            .find_available_doctors()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(available, vec![shep]);
    }

    #[test]
    fn test_set_availability_unknown_doctor() {
        let mut doctors = service();
        assert!(matches!(
            doctors.set_availability(DoctorId::new(3), true),
            Err(ClinicError::NotFound {
                entity: EntityKind::Doctor,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut doctors = service();
        let result = doctors.add(DoctorDetails::new("Dr. Grey", "Cardiology", -1.0));
        assert!(matches!(result, Err(ClinicError::InvalidInput(_))));
        assert!(doctors.list_all().is_empty());
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let mut doctors = service();
        let id = doctors
            .add(DoctorDetails::new("Dr. Grey", "Cardiology", 120.0).with_email("g@clinic.test"))
            .unwrap();

        doctors
            .update(id, DoctorDetails::new("Dr. Grey", "Surgery", 200.0).unavailable())
            .unwrap();

        let doctor = doctors.get(id).unwrap();
        assert_eq!(doctor.specialization, "Surgery");
        assert_eq!(doctor.consultation_fee, 200.0);
        assert!(!doctor.available);
        assert_eq!(doctor.email, None);
    }

    #[test]
    fn test_remove_unknown_doctor() {
        let mut doctors = service();
        assert!(doctors.remove(DoctorId::new(1)).is_err());
    }
}
