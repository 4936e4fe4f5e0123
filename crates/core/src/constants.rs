//! Constants used throughout the clinic core crate.

/// The ten bookable 30-minute windows offered by the front desk.
///
/// Booking accepts any slot text; this list drives [`crate::AppointmentService::free_slots`]
/// and the presentation layer's slot picker.
pub const STANDARD_TIME_SLOTS: [&str; 10] = [
    "09:00-09:30",
    "09:30-10:00",
    "10:00-10:30",
    "10:30-11:00",
    "11:00-11:30",
    "11:30-12:00",
    "14:00-14:30",
    "14:30-15:00",
    "15:00-15:30",
    "15:30-16:00",
];

/// Calendar date format for appointments, prescriptions and bills.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Clock format for each half of a time slot.
pub const TIME_FORMAT: &str = "%H:%M";

/// Name used in log lines when none is configured.
pub const DEFAULT_CLINIC_NAME: &str = "clinic";

/// Environment variable selecting the delete policy (`ignore`, `restrict`, `cascade`).
pub const DELETE_POLICY_ENV: &str = "CLINIC_DELETE_POLICY";

/// Environment variable controlling whether cancelled appointments keep their slot.
pub const CANCELLED_SLOTS_BLOCK_ENV: &str = "CLINIC_CANCELLED_SLOTS_BLOCK";

/// Environment variable naming the clinic.
pub const CLINIC_NAME_ENV: &str = "CLINIC_NAME";
