//! Entity records.
//!
//! Entities are plain data: identity plus mutable fields. Cross-entity links are ids,
//! never embedded records, so a repository can move or drop an entry without leaving
//! dangling references behind.

pub mod appointment;
pub mod bill;
pub mod doctor;
pub mod medication;
pub mod patient;
pub mod prescription;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus};
pub use bill::{Bill, BillCharges, PaymentStatus};
pub use doctor::{Doctor, DoctorDetails};
pub use medication::{Medication, MedicationDetails};
pub use patient::{MedicationHoldings, Patient, PatientDetails};
pub use prescription::Prescription;
pub use user::{Role, Session, User};
