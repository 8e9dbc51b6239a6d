//! Single-payment detail projection.

use serde::Serialize;

use crate::errors::StoreError;
use crate::store::PaymentStore;
use crate::types::{Payment, PaymentStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetail {
    #[serde(flatten)]
    pub payment: Payment,
    pub status_label: &'static str,
    pub processing_secs: Option<f64>,
    pub can_retry: bool,
    /// Text placed on the clipboard by the copy-id action.
    pub copy_text: String,
}

impl From<Payment> for PaymentDetail {
    fn from(payment: Payment) -> Self {
        Self {
            status_label: payment.status.label(),
            processing_secs: payment.processing_time.map(|ms| ms as f64 / 1000.0),
            can_retry: payment.status == PaymentStatus::Failed,
            copy_text: payment.id.clone(),
            payment,
        }
    }
}

pub fn payment_detail(store: &PaymentStore, id: &str) -> Option<PaymentDetail> {
    store.get(id).map(PaymentDetail::from)
}

/// Retry action of the detail panel; returns the refreshed projection.
pub fn retry_from_detail(
    store: &PaymentStore,
    id: &str,
) -> Result<Option<PaymentDetail>, StoreError> {
    Ok(store.retry(id)?.map(PaymentDetail::from))
}
