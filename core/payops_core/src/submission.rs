//! Payment submission form: field validation and hand-off to the store.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{FieldError, SubmitError};
use crate::store::PaymentStore;
use crate::types::{Currency, Payment, PaymentDraft, PaymentStatus};

/// Smallest amount the form accepts.
pub const MIN_AMOUNT: f64 = 0.01;

/// Raw form input as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentForm {
    pub payment_id: String,
    pub amount: Option<f64>,
    /// Currency code or selector label.
    pub currency: String,
    pub recipient_name: String,
    pub recipient_account: String,
    pub description: String,
}

impl PaymentForm {
    /// Checks every field and reports all failures together.
    pub fn validate(&self) -> Result<PaymentDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.payment_id.trim().is_empty() {
            errors.push(FieldError {
                field: "paymentId",
                message: "Payment ID is required",
            });
        }

        let amount = self.amount.filter(|a| a.is_finite() && *a >= MIN_AMOUNT);
        if amount.is_none() {
            errors.push(FieldError {
                field: "amount",
                message: "Amount must be greater than 0",
            });
        }

        let currency = self.currency.parse::<Currency>().ok();
        if currency.is_none() {
            errors.push(FieldError {
                field: "currency",
                message: "Please select a currency",
            });
        }

        if self.recipient_name.trim().is_empty() {
            errors.push(FieldError {
                field: "recipientName",
                message: "Recipient name is required",
            });
        }
        if self.recipient_account.trim().is_empty() {
            errors.push(FieldError {
                field: "recipientAccount",
                message: "Recipient account is required",
            });
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError {
                field: "description",
                message: "Description is required",
            });
        }

        match (amount, currency) {
            (Some(amount), Some(currency)) if errors.is_empty() => Ok(PaymentDraft {
                id: Some(self.payment_id.trim().to_string()),
                amount,
                currency,
                recipient: format!(
                    "{} ({})",
                    self.recipient_name.trim(),
                    self.recipient_account.trim()
                ),
                description: self.description.trim().to_string(),
                status: PaymentStatus::Processing,
            }),
            _ => Err(errors),
        }
    }

    /// Validates and enqueues the payment for processing.
    pub fn submit(&self, store: &PaymentStore) -> Result<Payment, SubmitError> {
        let draft = self.validate().map_err(|errors| {
            debug!("Submission rejected: {} invalid field(s)", errors.len());
            SubmitError::Invalid(errors)
        })?;
        Ok(store.add(draft)?)
    }
}
