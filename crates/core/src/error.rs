use clinic_types::DoctorId;

/// The store an identifier belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Patient,
    Doctor,
    Appointment,
    Medication,
    Prescription,
    Bill,
    User,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Patient => "patient",
            EntityKind::Doctor => "doctor",
            EntityKind::Appointment => "appointment",
            EntityKind::Medication => "medication",
            EntityKind::Prescription => "prescription",
            EntityKind::Bill => "bill",
            EntityKind::User => "user",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ClinicError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: u32 },
    #[error("referenced {entity} {id} does not exist")]
    InvalidReference { entity: EntityKind, id: u32 },
    #[error("a medication named '{0}' already exists")]
    DuplicateName(String),
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("doctor {0} is not available")]
    DoctorUnavailable(DoctorId),
    #[error("doctor {doctor_id} already has an appointment on {date} at {time_slot}")]
    SlotConflict {
        doctor_id: DoctorId,
        date: String,
        time_slot: String,
    },
    #[error("{entity} {id} is still referenced by {dependents} record(s)")]
    HasDependents {
        entity: EntityKind,
        id: u32,
        dependents: usize,
    },
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("user '{0}' is deactivated")]
    InactiveUser(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no {0} ids left to allocate")]
    IdsExhausted(EntityKind),
}

impl ClinicError {
    pub(crate) fn not_found(entity: EntityKind, id: impl Into<u32>) -> Self {
        ClinicError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn invalid_reference(entity: EntityKind, id: impl Into<u32>) -> Self {
        ClinicError::InvalidReference {
            entity,
            id: id.into(),
        }
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
