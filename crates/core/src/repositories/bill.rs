use super::BillRepository;
use crate::models::{Bill, PaymentStatus};
use clinic_types::PatientId;

impl BillRepository {
    pub fn find_by_patient(&self, patient_id: PatientId) -> Vec<Bill> {
        self.find(|b| b.patient_id == patient_id)
    }

    pub fn find_by_payment_status(&self, status: PaymentStatus) -> Vec<Bill> {
        self.find(|b| b.payment_status == status)
    }
}
