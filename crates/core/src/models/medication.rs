use clinic_types::{MedicationId, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Fields supplied on add and on (full replace) update.
#[derive(Clone, Debug, PartialEq)]
pub struct MedicationDetails {
    pub name: String,
    pub dosage: String,
    pub price: f64,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
}

impl MedicationDetails {
    pub fn new(name: impl Into<String>, dosage: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            price,
            manufacturer: None,
            description: None,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A formulary entry. Names are unique (exact, case-sensitive) across the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    pub name: NonEmptyText,
    pub dosage: String,
    pub price: f64,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
}

impl Medication {
    pub(crate) fn new(id: MedicationId, name: NonEmptyText, details: MedicationDetails) -> Self {
        Self {
            id,
            name,
            dosage: details.dosage.trim().to_string(),
            price: details.price,
            manufacturer: details.manufacturer,
            description: details.description,
        }
    }

    pub(crate) fn replace_details(&mut self, name: NonEmptyText, details: MedicationDetails) {
        self.name = name;
        self.dosage = details.dosage.trim().to_string();
        self.price = details.price;
        self.manufacturer = details.manufacturer;
        self.description = details.description;
    }
}
