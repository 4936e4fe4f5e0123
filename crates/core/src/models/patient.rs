use clinic_types::{MedicationId, NonEmptyText, PatientId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Demographic fields supplied on add and on (full replace) update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientDetails {
    pub name: String,
    pub age: u32,
    pub disease: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
}

impl PatientDetails {
    pub fn new(name: impl Into<String>, age: u32, disease: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            disease: disease.into(),
            contact: None,
            address: None,
            blood_group: None,
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_blood_group(mut self, blood_group: impl Into<String>) -> Self {
        self.blood_group = Some(blood_group.into());
        self
    }
}

/// Medications a patient currently holds, counted per prescription that granted them.
///
/// Two prescriptions listing the same medication give a count of two; removing one of
/// them leaves the medication held once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationHoldings(BTreeMap<MedicationId, u32>);

impl MedicationHoldings {
    pub fn add(&mut self, id: MedicationId) {
        *self.0.entry(id).or_insert(0) += 1;
    }

    /// Drops one reference to `id`. Returns `false` if the medication was not held.
    pub fn retract(&mut self, id: MedicationId) -> bool {
        let Some(count) = self.0.get_mut(&id) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.0.remove(&id);
        }
        true
    }

    /// Drops every reference to `id`, returning how many there were.
    pub fn purge(&mut self, id: MedicationId) -> u32 {
        self.0.remove(&id).unwrap_or(0)
    }

    pub fn contains(&self, id: MedicationId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn count(&self, id: MedicationId) -> u32 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    /// Distinct medication ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = MedicationId> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub age: u32,
    pub disease: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub medications: MedicationHoldings,
}

impl Patient {
    pub(crate) fn new(id: PatientId, name: NonEmptyText, details: PatientDetails) -> Self {
        Self {
            id,
            name,
            age: details.age,
            disease: details.disease.trim().to_string(),
            contact: details.contact,
            address: details.address,
            blood_group: details.blood_group,
            medications: MedicationHoldings::default(),
        }
    }

    /// Overwrites every demographic field. Medication holdings are left alone.
    pub(crate) fn replace_details(&mut self, name: NonEmptyText, details: PatientDetails) {
        self.name = name;
        self.age = details.age;
        self.disease = details.disease.trim().to_string();
        self.contact = details.contact;
        self.address = details.address;
        self.blood_group = details.blood_group;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holdings_count_references() {
        let mut holdings = MedicationHoldings::default();
        let aspirin = MedicationId::new(1);

        holdings.add(aspirin);
        holdings.add(aspirin);
        assert_eq!(holdings.count(aspirin), 2);

        assert!(holdings.retract(aspirin));
        assert!(holdings.contains(aspirin));
        assert!(holdings.retract(aspirin));
        assert!(!holdings.contains(aspirin));
        assert!(holdings.is_empty());
    }

    #[test]
    fn test_holdings_retract_missing_is_noop() {
        let mut holdings = MedicationHoldings::default();
        assert!(!holdings.retract(MedicationId::new(9)));
        assert_eq!(holdings.count(MedicationId::new(9)), 0);
    }

    #[test]
    fn test_holdings_purge_drops_all_references() {
        let mut holdings = MedicationHoldings::default();
        let id = MedicationId::new(3);
        holdings.add(id);
        holdings.add(id);
        holdings.add(MedicationId::new(4));

        assert_eq!(holdings.purge(id), 2);
        assert_eq!(holdings.ids().collect::<Vec<_>>(), vec![MedicationId::new(4)]);
    }
}
