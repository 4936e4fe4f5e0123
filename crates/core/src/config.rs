//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! [`crate::Clinic`] facade. The core never reads environment variables itself; the
//! binary hands the raw values to the parsing helpers below.

use crate::constants::DEFAULT_CLINIC_NAME;
use crate::{ClinicError, ClinicResult};

/// What happens to dependent records when a patient, doctor or medication is removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Remove the record and leave dependents pointing at a missing id.
    #[default]
    Ignore,
    /// Refuse the removal while any dependent exists.
    Restrict,
    /// Remove or rewrite dependents before removing the record.
    Cascade,
}

impl std::str::FromStr for DeletePolicy {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(DeletePolicy::Ignore),
            "restrict" => Ok(DeletePolicy::Restrict),
            "cascade" => Ok(DeletePolicy::Cascade),
            other => Err(ClinicError::InvalidInput(format!(
                "unknown delete policy '{other}' (expected ignore, restrict or cascade)"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    clinic_name: String,
    delete_policy: DeletePolicy,
    cancelled_slots_block_booking: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            clinic_name: DEFAULT_CLINIC_NAME.to_string(),
            delete_policy: DeletePolicy::default(),
            cancelled_slots_block_booking: false,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        clinic_name: String,
        delete_policy: DeletePolicy,
        cancelled_slots_block_booking: bool,
    ) -> ClinicResult<Self> {
        if clinic_name.trim().is_empty() {
            return Err(ClinicError::InvalidInput(
                "clinic_name cannot be empty".into(),
            ));
        }

        Ok(Self {
            clinic_name,
            delete_policy,
            cancelled_slots_block_booking,
        })
    }

    pub fn with_delete_policy(mut self, delete_policy: DeletePolicy) -> Self {
        self.delete_policy = delete_policy;
        self
    }

    pub fn with_cancelled_slots_block_booking(mut self, block: bool) -> Self {
        self.cancelled_slots_block_booking = block;
        self
    }

    pub fn clinic_name(&self) -> &str {
        &self.clinic_name
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Whether a cancelled appointment still occupies its (doctor, date, slot).
    pub fn cancelled_slots_block_booking(&self) -> bool {
        self.cancelled_slots_block_booking
    }
}

/// Parse the delete policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DeletePolicy::Ignore`].
pub fn delete_policy_from_env_value(value: Option<String>) -> ClinicResult<DeletePolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<DeletePolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Parse a boolean flag from an optional string value, falling back to `default`.
pub fn bool_from_env_value(value: Option<String>, default: bool) -> ClinicResult<bool> {
    let Some(value) = value.map(|v| v.trim().to_ascii_lowercase()) else {
        return Ok(default);
    };

    match value.as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ClinicError::InvalidInput(format!(
            "expected a boolean flag, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_empty_name() {
        let result = CoreConfig::new("  ".into(), DeletePolicy::Ignore, false);
        assert!(matches!(result, Err(ClinicError::InvalidInput(_))));
    }

    #[test]
    fn test_default_config_releases_cancelled_slots() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.delete_policy(), DeletePolicy::Ignore);
        assert!(!cfg.cancelled_slots_block_booking());
    }

    #[test]
    fn test_delete_policy_from_env_value() {
        assert_eq!(
            delete_policy_from_env_value(None).unwrap(),
            DeletePolicy::Ignore
        );
        assert_eq!(
            delete_policy_from_env_value(Some(" Cascade ".into())).unwrap(),
            DeletePolicy::Cascade
        );
        assert_eq!(
            delete_policy_from_env_value(Some("".into())).unwrap(),
            DeletePolicy::Ignore
        );
        assert!(delete_policy_from_env_value(Some("purge".into())).is_err());
    }

    #[test]
    fn test_bool_from_env_value() {
        assert!(bool_from_env_value(Some("yes".into()), false).unwrap());
        assert!(!bool_from_env_value(Some("0".into()), true).unwrap());
        assert!(bool_from_env_value(None, true).unwrap());
        assert!(bool_from_env_value(Some("maybe".into()), false).is_err());
    }
}
