//! Entity identifiers.
//!
//! Every store hands out its own sequence starting at 1. Ids are plain values, so an
//! appointment or prescription refers to a patient by number rather than by holding the
//! patient itself.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// The id handed out to the first entity of this kind.
            pub const FIRST: Self = Self(1);

            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }

            /// The id following this one, or `None` past `u32::MAX`.
            pub const fn next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(raw) => Some(Self(raw)),
                    None => None,
                }
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u32>().map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a patient record.
    PatientId
);
entity_id!(
    /// Identifier of a doctor record.
    DoctorId
);
entity_id!(
    /// Identifier of an appointment.
    AppointmentId
);
entity_id!(
    /// Identifier of a medication in the formulary.
    MedicationId
);
entity_id!(
    /// Identifier of a prescription.
    PrescriptionId
);
entity_id!(
    /// Identifier of a bill.
    BillId
);
entity_id!(
    /// Identifier of a user account.
    UserId
);
