use crate::{ClinicError, ClinicResult};
use clinic_types::{BillId, PatientId};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Overdue => "Overdue",
        }
    }

    /// Pending and overdue bills still count towards the amount owed.
    pub fn is_outstanding(&self) -> bool {
        !matches!(self, PaymentStatus::Paid)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> ClinicResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "overdue" => Ok(PaymentStatus::Overdue),
            _ => Err(ClinicError::InvalidInput(format!(
                "unknown payment status '{s}'"
            ))),
        }
    }
}

/// The three charge lines of a bill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BillCharges {
    pub consultation_fee: f64,
    pub medication_charges: f64,
    pub other_charges: f64,
}

impl BillCharges {
    pub fn consultation(consultation_fee: f64) -> Self {
        Self {
            consultation_fee,
            ..Self::default()
        }
    }

    pub fn with_medication_charges(mut self, amount: f64) -> Self {
        self.medication_charges = amount;
        self
    }

    pub fn with_other_charges(mut self, amount: f64) -> Self {
        self.other_charges = amount;
        self
    }

    pub fn total(&self) -> f64 {
        self.consultation_fee + self.medication_charges + self.other_charges
    }
}

/// A bill. The total is always derived from the charge lines and never stored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub patient_id: PatientId,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub charges: BillCharges,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
}

impl Bill {
    pub fn total_amount(&self) -> f64 {
        self.charges.total()
    }
}

impl Serialize for Bill {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Bill", 7)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("patient_id", &self.patient_id)?;
        state.serialize_field("date", &self.date)?;
        state.serialize_field("charges", &self.charges)?;
        state.serialize_field("total_amount", &self.total_amount())?;
        state.serialize_field("payment_status", &self.payment_status)?;
        state.serialize_field("payment_method", &self.payment_method)?;
        state.end()
    }
}
