//! # Clinic Core
//!
//! In-memory clinical records with referential integrity:
//! - Patients, doctors, medications, appointments, prescriptions, bills and users
//! - One repository per entity, owned by that entity's service
//! - Cross-entity validation (no appointment or prescription may point at a missing
//!   patient, doctor or medication)
//! - Prescription cascades that keep each patient's medication holdings in sync
//! - Appointment booking with per-doctor, per-day slot conflict detection
//!
//! **No presentation concerns**: menus, prompts and console output belong to the
//! caller. Outcomes are returned as [`ClinicResult`] values and reported to a
//! [`notify::Notifier`].

pub mod clinic;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod notify;
pub mod repositories;
pub mod services;
pub mod validation;

pub use clinic::Clinic;
pub use config::{CoreConfig, DeletePolicy};
pub use error::{ClinicError, ClinicResult, EntityKind};
pub use models::{
    Appointment, AppointmentStatus, Bill, BillCharges, Doctor, DoctorDetails, Medication,
    MedicationDetails, MedicationHoldings, Patient, PatientDetails, PaymentStatus, Prescription,
    Role, Session, User,
};
pub use services::appointment::AppointmentService;
pub use services::auth::AuthenticationService;
pub use services::billing::BillingService;
pub use services::doctor::DoctorService;
pub use services::medication::MedicationService;
pub use services::patient::PatientService;
pub use services::prescription::{NewPrescription, PrescriptionService};

pub use clinic_types::{
    AppointmentId, BillId, DoctorId, MedicationId, NonEmptyText, PatientId, PrescriptionId,
    UserId,
};
