//! The clinic facade.
//!
//! [`Clinic`] owns one service per entity and wires the composite operations that
//! need more than one of them. The services stay public so read projections and
//! single-entity updates can be called directly.

use crate::config::{CoreConfig, DeletePolicy};
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{BillCharges, Doctor, Medication, Patient, Prescription};
use crate::notify::{Notifier, TracingNotifier};
use crate::services::appointment::AppointmentService;
use crate::services::auth::AuthenticationService;
use crate::services::billing::BillingService;
use crate::services::doctor::DoctorService;
use crate::services::medication::MedicationService;
use crate::services::patient::PatientService;
use crate::services::prescription::{NewPrescription, PrescriptionService};
use crate::services::reported;
use clinic_types::{
    AppointmentId, BillId, DoctorId, MedicationId, PatientId, PrescriptionId,
};
use std::sync::Arc;

pub struct Clinic {
    cfg: Arc<CoreConfig>,
    notifier: Arc<dyn Notifier>,
    pub patients: PatientService,
    pub doctors: DoctorService,
    pub appointments: AppointmentService,
    pub medications: MedicationService,
    pub prescriptions: PrescriptionService,
    pub billing: BillingService,
    pub auth: AuthenticationService,
}

impl Clinic {
    /// Builds an empty clinic reporting outcomes to `notifier`.
    pub fn new(cfg: Arc<CoreConfig>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            patients: PatientService::new(notifier.clone()),
            doctors: DoctorService::new(notifier.clone()),
            appointments: AppointmentService::new(cfg.clone(), notifier.clone()),
            medications: MedicationService::new(notifier.clone()),
            prescriptions: PrescriptionService::new(notifier.clone()),
            billing: BillingService::new(notifier.clone()),
            auth: AuthenticationService::new(notifier.clone()),
            cfg,
            notifier,
        }
    }

    /// Builds an empty clinic that reports through `tracing`.
    pub fn with_tracing(cfg: Arc<CoreConfig>) -> Self {
        Self::new(cfg, Arc::new(TracingNotifier))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// See [`AppointmentService::book`].
    pub fn book_appointment(
        &mut self,
        patient_id: PatientId,
        doctor_id: DoctorId,
        date: &str,
        time_slot: &str,
    ) -> ClinicResult<AppointmentId> {
        self.appointments
            .book(&self.patients, &self.doctors, patient_id, doctor_id, date, time_slot)
    }

    /// See [`PrescriptionService::create`].
    pub fn create_prescription(&mut self, new: NewPrescription) -> ClinicResult<PrescriptionId> {
        self.prescriptions
            .create(&mut self.patients, &self.doctors, &self.medications, new)
    }

    /// See [`PrescriptionService::update`].
    pub fn update_prescription(
        &mut self,
        id: PrescriptionId,
        medication_ids: Vec<MedicationId>,
        instructions: Option<String>,
    ) -> ClinicResult<()> {
        self.prescriptions.update(
            &mut self.patients,
            &self.medications,
            id,
            medication_ids,
            instructions,
        )
    }

    /// See [`PrescriptionService::remove`].
    pub fn remove_prescription(&mut self, id: PrescriptionId) -> ClinicResult<Prescription> {
        self.prescriptions.remove(&mut self.patients, id)
    }

    /// See [`BillingService::generate`].
    pub fn generate_bill(
        &mut self,
        patient_id: PatientId,
        date: &str,
        charges: BillCharges,
    ) -> ClinicResult<BillId> {
        self.billing
            .generate(&self.patients, patient_id, date, charges)
    }

    /// Records a doctor's diagnosis on a patient, replacing the disease field only.
    ///
    /// # Errors
    ///
    /// - `ClinicError::InvalidReference` if the doctor does not exist
    /// - `ClinicError::NotFound` if the patient does not exist
    /// - `ClinicError::InvalidInput` if the diagnosis is empty
    pub fn diagnose(
        &mut self,
        doctor_id: DoctorId,
        patient_id: PatientId,
        diagnosis: &str,
    ) -> ClinicResult<()> {
        let doctor = self.doctors.resolve(doctor_id).map(|d| d.name.to_string());
        let doctor = reported(self.notifier.as_ref(), "diagnose patient", doctor)?;

        self.patients.record_diagnosis(patient_id, diagnosis)?;
        self.notifier
            .info(&format!("{doctor} diagnosed patient {patient_id}"));
        Ok(())
    }

    /// Appointments, prescriptions and bills that reference the patient.
    pub fn patient_dependents(&self, id: PatientId) -> usize {
        self.appointments.count_for_patient(id)
            + self.prescriptions.by_patient(id).len()
            + self.billing.count_for_patient(id)
    }

    /// Appointments and prescriptions that reference the doctor.
    pub fn doctor_dependents(&self, id: DoctorId) -> usize {
        self.appointments.count_for_doctor(id) + self.prescriptions.by_doctor(id).len()
    }

    /// Prescriptions that list the medication.
    pub fn medication_dependents(&self, id: MedicationId) -> usize {
        self.prescriptions.by_medication(id).len()
    }

    /// Removes a patient according to the configured [`DeletePolicy`].
    ///
    /// Under `Cascade` the patient's appointments, prescriptions and bills go first.
    ///
    /// # Errors
    ///
    /// - `ClinicError::NotFound` if the patient does not exist
    /// - `ClinicError::HasDependents` under `Restrict` while anything references it
    pub fn remove_patient(&mut self, id: PatientId) -> ClinicResult<Patient> {
        if self.patients.get(id).is_none() {
            return self.patients.remove(id);
        }
        let dependents = self.patient_dependents(id);
        self.restrict(EntityKind::Patient, id.get(), dependents)?;

        if self.cfg.delete_policy() == DeletePolicy::Cascade && dependents > 0 {
            let appointments = self.appointments.purge(|a| a.patient_id == id);
            let prescriptions = self
                .prescriptions
                .purge(&mut self.patients, |p| p.patient_id == id);
            let bills = self.billing.purge_for_patient(id);
            self.notifier.info(&format!(
                "Removed {appointments} appointment(s), {prescriptions} prescription(s) and {bills} bill(s) of patient {id}"
            ));
        }

        self.patients.remove(id)
    }

    /// Removes a doctor according to the configured [`DeletePolicy`].
    ///
    /// Under `Cascade` the doctor's appointments are deleted and their prescriptions
    /// removed, retracting the medications from the patients.
    pub fn remove_doctor(&mut self, id: DoctorId) -> ClinicResult<Doctor> {
        if self.doctors.get(id).is_none() {
            return self.doctors.remove(id);
        }
        let dependents = self.doctor_dependents(id);
        self.restrict(EntityKind::Doctor, id.get(), dependents)?;

        if self.cfg.delete_policy() == DeletePolicy::Cascade && dependents > 0 {
            let appointments = self.appointments.purge(|a| a.doctor_id == id);
            let prescriptions = self
                .prescriptions
                .purge(&mut self.patients, |p| p.doctor_id == id);
            self.notifier.info(&format!(
                "Removed {appointments} appointment(s) and {prescriptions} prescription(s) of doctor {id}"
            ));
        }

        self.doctors.remove(id)
    }

    /// Removes a medication according to the configured [`DeletePolicy`].
    ///
    /// Under `Cascade` the medication is struck from every prescription and every
    /// patient holding; under `Ignore` both are left as they are.
    pub fn remove_medication(&mut self, id: MedicationId) -> ClinicResult<Medication> {
        if self.medications.get(id).is_none() {
            return self.medications.remove(id);
        }
        let dependents = self.medication_dependents(id);
        self.restrict(EntityKind::Medication, id.get(), dependents)?;

        if self.cfg.delete_policy() == DeletePolicy::Cascade {
            let prescriptions = self.prescriptions.strip_medication(id);
            let holders = self.patients.purge_medication(id);
            if prescriptions > 0 || holders > 0 {
                self.notifier.info(&format!(
                    "Struck medication {id} from {prescriptions} prescription(s) and {holders} patient(s)"
                ));
            }
        }

        self.medications.remove(id)
    }

    fn restrict(&self, entity: EntityKind, id: u32, dependents: usize) -> ClinicResult<()> {
        let result = if self.cfg.delete_policy() == DeletePolicy::Restrict && dependents > 0 {
            Err(ClinicError::HasDependents {
                entity,
                id,
                dependents,
            })
        } else {
            Ok(())
        };
        reported(self.notifier.as_ref(), &format!("remove {entity}"), result)
    }
}
