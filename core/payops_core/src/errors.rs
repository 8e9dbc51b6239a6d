//! Error types for the payment store, the session store and value parsing.

use serde::Serialize;
use thiserror::Error;

use crate::types::PaymentStatus;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("payment {0} already exists")]
    DuplicateId(String),

    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("a new payment must start as pending or processing, got {0}")]
    InvalidInitialStatus(PaymentStatus),

    #[error("payment {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("payment {id} is {status}; only failed payments can be retried")]
    NotRetryable { id: String, status: PaymentStatus },

    #[error("throughput must be a non-negative number, got {0}")]
    InvalidThroughput(f64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown payment status: {0}")]
    UnknownStatus(String),

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}

/// One rejected field of the submission form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Store(#[from] StoreError),
}
