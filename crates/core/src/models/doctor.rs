use clinic_types::{DoctorId, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Fields supplied on add and on (full replace) update.
#[derive(Clone, Debug, PartialEq)]
pub struct DoctorDetails {
    pub name: String,
    pub specialization: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub consultation_fee: f64,
    pub available: bool,
}

impl DoctorDetails {
    /// A doctor who is available for booking.
    pub fn new(
        name: impl Into<String>,
        specialization: impl Into<String>,
        consultation_fee: f64,
    ) -> Self {
        Self {
            name: name.into(),
            specialization: specialization.into(),
            contact: None,
            email: None,
            consultation_fee,
            available: true,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: NonEmptyText,
    pub specialization: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub consultation_fee: f64,
    pub available: bool,
}

impl Doctor {
    pub(crate) fn new(id: DoctorId, name: NonEmptyText, details: DoctorDetails) -> Self {
        Self {
            id,
            name,
            specialization: details.specialization.trim().to_string(),
            contact: details.contact,
            email: details.email,
            consultation_fee: details.consultation_fee,
            available: details.available,
        }
    }

    pub(crate) fn replace_details(&mut self, name: NonEmptyText, details: DoctorDetails) {
        self.name = name;
        self.specialization = details.specialization.trim().to_string();
        self.contact = details.contact;
        self.email = details.email;
        self.consultation_fee = details.consultation_fee;
        self.available = details.available;
    }
}
