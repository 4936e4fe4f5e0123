//! Services enforce the cross-entity rules.
//!
//! Each service owns the repository for its entity. Operations that need another
//! entity's data take the other service as an explicit argument (shared for lookups,
//! exclusive when a cascade has to write), so no service keeps a long-lived handle into
//! another's store. The [`crate::Clinic`] facade wires the calls together.
//!
//! Every mutating operation validates completely before touching a store and reports
//! its outcome to the configured [`Notifier`].

pub mod appointment;
pub mod auth;
pub mod billing;
pub mod doctor;
pub mod medication;
pub mod patient;
pub mod prescription;

use crate::notify::Notifier;
use crate::ClinicResult;

/// Reports a rejected operation and hands the result back unchanged.
pub(crate) fn reported<T>(
    notifier: &dyn Notifier,
    action: &str,
    result: ClinicResult<T>,
) -> ClinicResult<T> {
    if let Err(err) = &result {
        notifier.warning(&format!("{action} rejected: {err}"));
    }
    result
}
