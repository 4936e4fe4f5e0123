use super::AppointmentRepository;
use crate::models::{Appointment, AppointmentStatus};
use clinic_types::{DoctorId, PatientId};

impl AppointmentRepository {
    pub fn find_by_date(&self, date: &str) -> Vec<Appointment> {
        self.find(|a| a.date == date)
    }

    pub fn find_by_doctor(&self, doctor_id: DoctorId) -> Vec<Appointment> {
        self.find(|a| a.doctor_id == doctor_id)
    }

    pub fn find_by_patient(&self, patient_id: PatientId) -> Vec<Appointment> {
        self.find(|a| a.patient_id == patient_id)
    }

    pub fn find_by_status(&self, status: AppointmentStatus) -> Vec<Appointment> {
        self.find(|a| a.status == status)
    }

    pub fn find_by_doctor_on(&self, doctor_id: DoctorId, date: &str) -> Vec<Appointment> {
        self.find(|a| a.doctor_id == doctor_id && a.date == date)
    }
}
