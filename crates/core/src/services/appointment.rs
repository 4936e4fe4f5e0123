//! Appointment booking.
//!
//! A booking is rejected when another appointment already holds the same doctor, date
//! and time slot. Whether a cancelled appointment still holds its slot is decided by
//! [`CoreConfig::cancelled_slots_block_booking`]; by default cancelling releases it.

use super::doctor::DoctorService;
use super::patient::PatientService;
use super::reported;
use crate::config::CoreConfig;
use crate::constants::STANDARD_TIME_SLOTS;
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{Appointment, AppointmentStatus};
use crate::notify::Notifier;
use crate::repositories::AppointmentRepository;
use crate::validation::{required_text, validate_date};
use clinic_types::{AppointmentId, DoctorId, PatientId};
use std::sync::Arc;

pub struct AppointmentService {
    cfg: Arc<CoreConfig>,
    repo: AppointmentRepository,
    notifier: Arc<dyn Notifier>,
}

impl AppointmentService {
    pub fn new(cfg: Arc<CoreConfig>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            cfg,
            repo: AppointmentRepository::new(),
            notifier,
        }
    }

    pub fn repository(&self) -> &AppointmentRepository {
        &self.repo
    }

    /// Books `patient_id` with `doctor_id` on `date` in `time_slot`.
    ///
    /// Checks run in order and the first failure wins:
    /// 1. the patient must exist
    /// 2. the doctor must exist
    /// 3. the doctor must be available
    /// 4. no blocking appointment may hold the same (doctor, date, slot)
    ///
    /// The new appointment starts as [`AppointmentStatus::Scheduled`] with empty notes.
    ///
    /// # Errors
    ///
    /// - `ClinicError::InvalidInput` if the date is malformed or the slot is empty
    /// - `ClinicError::InvalidReference` for an unknown patient or doctor
    /// - `ClinicError::DoctorUnavailable` if the doctor is flagged unavailable
    /// - `ClinicError::SlotConflict` if the slot is already taken
    pub fn book(
        &mut self,
        patients: &PatientService,
        doctors: &DoctorService,
        patient_id: PatientId,
        doctor_id: DoctorId,
        date: &str,
        time_slot: &str,
    ) -> ClinicResult<AppointmentId> {
        let result = self.try_book(patients, doctors, patient_id, doctor_id, date, time_slot);
        reported(self.notifier.as_ref(), "book appointment", result)
    }

    fn try_book(
        &mut self,
        patients: &PatientService,
        doctors: &DoctorService,
        patient_id: PatientId,
        doctor_id: DoctorId,
        date: &str,
        time_slot: &str,
    ) -> ClinicResult<AppointmentId> {
        validate_date(date)?;
        let date = date.trim();
        let time_slot = required_text("time slot", time_slot)?;

        patients.resolve(patient_id)?;
        let doctor = doctors.resolve(doctor_id)?;
        if !doctor.available {
            return Err(ClinicError::DoctorUnavailable(doctor_id));
        }

        if self.slot_taken(doctor_id, date, time_slot.as_str()) {
            return Err(ClinicError::SlotConflict {
                doctor_id,
                date: date.to_string(),
                time_slot: time_slot.into_inner(),
            });
        }

        let id = self.repo.allocate_id()?;
        self.repo.add(Appointment {
            id,
            patient_id,
            doctor_id,
            date: date.to_string(),
            time_slot: time_slot.into_inner(),
            status: AppointmentStatus::Scheduled,
            notes: String::new(),
        });

        self.notifier
            .info(&format!("Appointment booked successfully with ID: {id}"));
        Ok(id)
    }

    /// Whether a blocking appointment holds `(doctor_id, date, time_slot)`.
    pub fn slot_taken(&self, doctor_id: DoctorId, date: &str, time_slot: &str) -> bool {
        let (date, time_slot) = (date.trim(), time_slot.trim());
        self.repo
            .iter()
            .any(|a| self.blocks(a) && a.occupies(doctor_id, date, time_slot))
    }

    fn blocks(&self, appointment: &Appointment) -> bool {
        self.cfg.cancelled_slots_block_booking()
            || appointment.status != AppointmentStatus::Cancelled
    }

    /// Whether an appointment other than `appointment` blocks its slot.
    fn slot_held_elsewhere(&self, appointment: &Appointment) -> bool {
        self.repo.iter().any(|a| {
            a.id != appointment.id
                && self.blocks(a)
                && a.occupies(appointment.doctor_id, &appointment.date, &appointment.time_slot)
        })
    }

    /// Standard slots still bookable for the doctor on `date`.
    pub fn free_slots(&self, doctor_id: DoctorId, date: &str) -> Vec<&'static str> {
        let date = date.trim();
        STANDARD_TIME_SLOTS
            .iter()
            .copied()
            .filter(|slot| !self.slot_taken(doctor_id, date, slot))
            .collect()
    }

    /// Overwrites date, slot, status and notes.
    ///
    /// Slot conflicts are not re-checked here; moving an appointment onto an occupied
    /// slot is the caller's responsibility.
    pub fn update_details(
        &mut self,
        id: AppointmentId,
        date: &str,
        time_slot: &str,
        status: AppointmentStatus,
        notes: &str,
    ) -> ClinicResult<()> {
        let result = self.replace_details(id, date, time_slot, status, notes);
        reported(self.notifier.as_ref(), "update appointment", result)
    }

    fn replace_details(
        &mut self,
        id: AppointmentId,
        date: &str,
        time_slot: &str,
        status: AppointmentStatus,
        notes: &str,
    ) -> ClinicResult<()> {
        validate_date(date)?;
        let time_slot = required_text("time slot", time_slot)?;
        let appointment = self.lookup_mut(id)?;

        appointment.date = date.trim().to_string();
        appointment.time_slot = time_slot.into_inner();
        appointment.status = status;
        appointment.notes = notes.trim().to_string();

        self.notifier
            .info(&format!("Appointment {id} updated successfully"));
        Ok(())
    }

    /// Sets the status of an appointment.
    ///
    /// # Errors
    ///
    /// - `ClinicError::NotFound` if `id` is unknown
    /// - `ClinicError::SlotConflict` when reviving a cancelled appointment whose slot
    ///   has since been booked by another
    pub fn update_status(
        &mut self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> ClinicResult<()> {
        let result = self.set_status(id, status);
        reported(self.notifier.as_ref(), "update appointment status", result)
    }

    fn set_status(&mut self, id: AppointmentId, status: AppointmentStatus) -> ClinicResult<()> {
        let current = self
            .repo
            .get_by_id(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Appointment, id))?;
        let reviving = current.status == AppointmentStatus::Cancelled
            && status != AppointmentStatus::Cancelled;
        if reviving && self.slot_held_elsewhere(current) {
            return Err(ClinicError::SlotConflict {
                doctor_id: current.doctor_id,
                date: current.date.clone(),
                time_slot: current.time_slot.clone(),
            });
        }

        self.lookup_mut(id)?.status = status;
        self.notifier
            .info(&format!("Appointment {id} status set to {status}"));
        Ok(())
    }

    /// Marks the appointment cancelled. The record stays in the store.
    pub fn cancel(&mut self, id: AppointmentId) -> ClinicResult<()> {
        let result = self
            .lookup_mut(id)
            .map(|a| a.status = AppointmentStatus::Cancelled);
        if result.is_ok() {
            self.notifier
                .info(&format!("Appointment {id} cancelled successfully"));
        }
        reported(self.notifier.as_ref(), "cancel appointment", result)
    }

    /// Deletes the appointment record outright.
    pub fn remove(&mut self, id: AppointmentId) -> ClinicResult<Appointment> {
        let result = self
            .repo
            .take(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Appointment, id));
        if result.is_ok() {
            self.notifier
                .info(&format!("Appointment {id} removed successfully"));
        }
        reported(self.notifier.as_ref(), "remove appointment", result)
    }

    fn lookup_mut(&mut self, id: AppointmentId) -> ClinicResult<&mut Appointment> {
        self.repo
            .get_by_id_mut(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Appointment, id))
    }

    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.repo.get_by_id(id)
    }

    pub fn list_all(&self) -> Vec<Appointment> {
        self.repo.get_all()
    }

    pub fn by_patient(&self, patient_id: PatientId) -> Vec<Appointment> {
        self.repo.find_by_patient(patient_id)
    }

    pub fn by_doctor(&self, doctor_id: DoctorId) -> Vec<Appointment> {
        self.repo.find_by_doctor(doctor_id)
    }

    pub fn by_date(&self, date: &str) -> Vec<Appointment> {
        self.repo.find_by_date(date.trim())
    }

    pub fn by_status(&self, status: AppointmentStatus) -> Vec<Appointment> {
        self.repo.find_by_status(status)
    }

    pub fn by_doctor_on(&self, doctor_id: DoctorId, date: &str) -> Vec<Appointment> {
        self.repo.find_by_doctor_on(doctor_id, date.trim())
    }

    pub(crate) fn count_for_patient(&self, patient_id: PatientId) -> usize {
        self.repo.iter().filter(|a| a.patient_id == patient_id).count()
    }

    pub(crate) fn count_for_doctor(&self, doctor_id: DoctorId) -> usize {
        self.repo.iter().filter(|a| a.doctor_id == doctor_id).count()
    }

    /// Deletes every appointment matching `predicate`, returning how many went.
    pub(crate) fn purge(&mut self, predicate: impl Fn(&Appointment) -> bool) -> usize {
        let ids = self.repo.find_ids(predicate);
        for id in &ids {
            self.repo.remove(*id);
        }
        ids.len()
    }
}
