use super::patient::PatientService;
use super::reported;
use crate::error::{ClinicError, ClinicResult, EntityKind};
use crate::models::{Bill, BillCharges, PaymentStatus};
use crate::notify::Notifier;
use crate::repositories::BillRepository;
use crate::validation::{optional_text, validate_amount, validate_date};
use clinic_types::{BillId, PatientId};
use std::sync::Arc;

/// Billing. Totals are computed from the charge lines on every read.
pub struct BillingService {
    repo: BillRepository,
    notifier: Arc<dyn Notifier>,
}

impl BillingService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            repo: BillRepository::new(),
            notifier,
        }
    }

    pub fn repository(&self) -> &BillRepository {
        &self.repo
    }

    /// Issues a pending bill for `patient_id`.
    ///
    /// # Errors
    ///
    /// - `ClinicError::InvalidReference` if the patient does not exist
    /// - `ClinicError::InvalidInput` for a malformed date or a negative charge
    pub fn generate(
        &mut self,
        patients: &PatientService,
        patient_id: PatientId,
        date: &str,
        charges: BillCharges,
    ) -> ClinicResult<BillId> {
        let result = self.try_generate(patients, patient_id, date, charges);
        reported(self.notifier.as_ref(), "generate bill", result)
    }

    fn try_generate(
        &mut self,
        patients: &PatientService,
        patient_id: PatientId,
        date: &str,
        charges: BillCharges,
    ) -> ClinicResult<BillId> {
        validate_date(date)?;
        validate_charges(&charges)?;
        patients.resolve(patient_id)?;

        let id = self.repo.allocate_id()?;
        let bill = Bill {
            id,
            patient_id,
            date: date.trim().to_string(),
            charges,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
        };
        let total = bill.total_amount();
        self.repo.add(bill);

        self.notifier.info(&format!(
            "Bill generated successfully with ID: {id}, total amount: {total:.2}"
        ));
        Ok(id)
    }

    /// Sets the payment status, and the method when a non-empty one is supplied.
    pub fn update_payment_status(
        &mut self,
        id: BillId,
        status: PaymentStatus,
        method: Option<String>,
    ) -> ClinicResult<()> {
        let result = match self.repo.get_by_id_mut(id) {
            Some(bill) => {
                bill.payment_status = status;
                if let Some(method) = optional_text(method) {
                    bill.payment_method = Some(method);
                }
                self.notifier
                    .info(&format!("Bill {id} payment status set to {status}"));
                Ok(())
            }
            None => Err(ClinicError::not_found(EntityKind::Bill, id)),
        };
        reported(self.notifier.as_ref(), "update payment status", result)
    }

    /// Replaces the charge lines. The total follows automatically.
    pub fn update_charges(&mut self, id: BillId, charges: BillCharges) -> ClinicResult<()> {
        let result = self.replace_charges(id, charges);
        reported(self.notifier.as_ref(), "update bill charges", result)
    }

    fn replace_charges(&mut self, id: BillId, charges: BillCharges) -> ClinicResult<()> {
        validate_charges(&charges)?;
        let bill = self
            .repo
            .get_by_id_mut(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Bill, id))?;

        bill.charges = charges;
        let total = bill.total_amount();

        self.notifier
            .info(&format!("Bill {id} charges updated, total amount: {total:.2}"));
        Ok(())
    }

    pub fn remove(&mut self, id: BillId) -> ClinicResult<Bill> {
        let result = self
            .repo
            .take(id)
            .ok_or_else(|| ClinicError::not_found(EntityKind::Bill, id));
        if result.is_ok() {
            self.notifier.info(&format!("Bill {id} removed successfully"));
        }
        reported(self.notifier.as_ref(), "remove bill", result)
    }

    pub fn get(&self, id: BillId) -> Option<&Bill> {
        self.repo.get_by_id(id)
    }

    pub fn list_all(&self) -> Vec<Bill> {
        self.repo.get_all()
    }

    pub fn by_patient(&self, patient_id: PatientId) -> Vec<Bill> {
        self.repo.find_by_patient(patient_id)
    }

    pub fn by_status(&self, status: PaymentStatus) -> Vec<Bill> {
        self.repo.find_by_payment_status(status)
    }

    /// Sum of every bill's total, paid or not.
    pub fn total_revenue(&self) -> f64 {
        self.repo.iter().map(Bill::total_amount).sum()
    }

    /// Sum of totals still owed (pending or overdue).
    pub fn outstanding_total(&self) -> f64 {
        self.repo
            .iter()
            .filter(|b| b.payment_status.is_outstanding())
            .map(Bill::total_amount)
            .sum()
    }

    pub(crate) fn count_for_patient(&self, patient_id: PatientId) -> usize {
        self.repo.iter().filter(|b| b.patient_id == patient_id).count()
    }

    pub(crate) fn purge_for_patient(&mut self, patient_id: PatientId) -> usize {
        let ids = self.repo.find_ids(|b| b.patient_id == patient_id);
        for id in &ids {
            self.repo.remove(*id);
        }
        ids.len()
    }
}

fn validate_charges(charges: &BillCharges) -> ClinicResult<()> {
    validate_amount("consultation fee", charges.consultation_fee)?;
    validate_amount("medication charges", charges.medication_charges)?;
    validate_amount("other charges", charges.other_charges)?;
    Ok(())
}
