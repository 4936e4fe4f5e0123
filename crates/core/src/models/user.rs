use crate::{ClinicError, ClinicResult};
use clinic_types::{NonEmptyText, UserId};
use serde::{Deserialize, Serialize};

/// Closed set of roles used for menu gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Doctor,
    Reception,
    Pharmacist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Doctor => "Doctor",
            Role::Reception => "Reception",
            Role::Pharmacist => "Pharmacist",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ClinicError;

    fn from_str(s: &str) -> ClinicResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "reception" | "receptionist" => Ok(Role::Reception),
            "pharmacist" => Ok(Role::Pharmacist),
            _ => Err(ClinicError::InvalidInput(format!("unknown role '{s}'"))),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: NonEmptyText,
    #[serde(skip_serializing)]
    pub(crate) password_secret: String,
    pub role: Role,
    pub active: bool,
}

impl User {
    pub(crate) fn secret_matches(&self, secret: &str) -> bool {
        self.password_secret == secret
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_secret", &"<redacted>")
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

/// The logged-in user, as seen by the menu layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}
