//! Entity stores.
//!
//! Each store exclusively owns its collection and its id counter. Stores know nothing
//! about other entity kinds; cross-entity rules live in the services.
//!
//! Entries are kept in a `BTreeMap` keyed by id. Ids are handed out in increasing
//! order and never reused, so iteration order is insertion order.

pub mod appointment;
pub mod bill;
pub mod doctor;
pub mod medication;
pub mod patient;
pub mod prescription;
pub mod user;

use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{Appointment, Bill, Doctor, Medication, Patient, Prescription, User};
use clinic_types::{
    AppointmentId, BillId, DoctorId, MedicationId, PatientId, PrescriptionId, UserId,
};
use std::collections::BTreeMap;

/// A record that can live in a [`Repository`].
pub trait Entity: Clone {
    type Id: Copy + Ord + std::fmt::Debug + From<u32> + Into<u32>;

    /// The store this entity belongs to, used in error reporting.
    const KIND: EntityKind;

    fn id(&self) -> Self::Id;
}

macro_rules! impl_entity {
    ($ty:ty, $id:ty, $kind:expr) => {
        impl Entity for $ty {
            type Id = $id;
            const KIND: EntityKind = $kind;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

impl_entity!(Patient, PatientId, EntityKind::Patient);
impl_entity!(Doctor, DoctorId, EntityKind::Doctor);
impl_entity!(Appointment, AppointmentId, EntityKind::Appointment);
impl_entity!(Medication, MedicationId, EntityKind::Medication);
impl_entity!(Prescription, PrescriptionId, EntityKind::Prescription);
impl_entity!(Bill, BillId, EntityKind::Bill);
impl_entity!(User, UserId, EntityKind::User);

pub type PatientRepository = Repository<Patient>;
pub type DoctorRepository = Repository<Doctor>;
pub type AppointmentRepository = Repository<Appointment>;
pub type MedicationRepository = Repository<Medication>;
pub type PrescriptionRepository = Repository<Prescription>;
pub type BillRepository = Repository<Bill>;
pub type UserRepository = Repository<User>;

/// In-memory store for one entity kind.
#[derive(Clone, Debug)]
pub struct Repository<T: Entity> {
    items: BTreeMap<T::Id, T>,
    next_id: u64,
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next id. Ids are never reused within a run, even after removal.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError::IdsExhausted` once every `u32` id has been handed out.
    pub fn allocate_id(&mut self) -> ClinicResult<T::Id> {
        let id = u32::try_from(self.next_id).map_err(|_| ClinicError::IdsExhausted(T::KIND))?;
        self.next_id += 1;
        Ok(<T::Id as From<u32>>::from(id))
    }

    /// Stores `item` under its own id.
    ///
    /// Items are normally built with an id from [`Repository::allocate_id`]; an item
    /// carrying a higher id moves the counter past it so later allocations stay unique.
    pub fn add(&mut self, item: T) {
        let raw: u32 = item.id().into();
        self.next_id = self.next_id.max(u64::from(raw) + 1);
        self.items.insert(item.id(), item);
    }

    /// Deletes the entry with `id`. Returns whether it was present.
    pub fn remove(&mut self, id: T::Id) -> bool {
        self.items.remove(&id).is_some()
    }

    /// Deletes and returns the entry with `id`.
    pub fn take(&mut self, id: T::Id) -> Option<T> {
        self.items.remove(&id)
    }

    pub fn get_by_id(&self, id: T::Id) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn get_by_id_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.items.contains_key(&id)
    }

    /// Owned snapshot of every entry in insertion order.
    pub fn get_all(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    /// Owned snapshot of every entry matching `predicate`, in insertion order.
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.items
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Ids of every entry matching `predicate`, in insertion order.
    pub fn find_ids(&self, predicate: impl Fn(&T) -> bool) -> Vec<T::Id> {
        self.items
            .values()
            .filter(|item| predicate(item))
            .map(Entity::id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
