use crate::{ClinicError, ClinicResult};
use clinic_types::{AppointmentId, DoctorId, PatientId};
use serde::{Deserialize, Serialize};

/// Appointment lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> ClinicResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ClinicError::InvalidInput(format!(
                "unknown appointment status '{s}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM-HH:MM`.
    pub time_slot: String,
    pub status: AppointmentStatus,
    pub notes: String,
}

impl Appointment {
    /// Whether this appointment holds `(doctor, date, slot)` against new bookings.
    pub fn occupies(&self, doctor_id: DoctorId, date: &str, time_slot: &str) -> bool {
        self.doctor_id == doctor_id && self.date == date && self.time_slot == time_slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!(
            "cancelled".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Cancelled
        );
        assert_eq!(
            " COMPLETED ".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Completed
        );
        assert!("Postponed".parse::<AppointmentStatus>().is_err());
    }
}
