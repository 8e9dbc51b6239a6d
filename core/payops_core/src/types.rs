//! # Types
//!
//! Shared data structures used across the store and the dashboard views.
//!
//! ## Design decisions
//!
//! ### Draft / Payment split
//!
//! Callers never build a [`Payment`] directly. They hand the store a
//! [`PaymentDraft`], and the store stamps the timestamps and the attempt
//! counter. The seed generator is the only other producer of full records.
//!
//! ### Status as a Finite-State Machine
//!
//! [`PaymentStatus`] follows a forward-only lifecycle:
//!
//! ```text
//! Pending ──► Processing ──► Success
//!                 │  ▲
//!                 ▼  │ retry
//!               Failed
//! ```
//!
//! `Success` is terminal. `Failed` is terminal until an explicit retry puts the
//! record back into `Processing`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Lifecycle status of a payment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Accepted but not yet handed to the processor.
    Pending,
    /// Waiting for the processor's verdict.
    Processing,
    /// Settled.
    Success,
    /// Declined; may be retried.
    Failed,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Processing,
        PaymentStatus::Success,
        PaymentStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// Capitalized form shown on status badges.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    ///
    /// `Failed -> Processing` is the retry edge; everything else moves forward.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Success)
                | (Self::Processing, Self::Failed)
                | (Self::Failed, Self::Processing)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(ParseError::UnknownStatus(other.to_string())),
        }
    }
}

/// Settlement currencies accepted by the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Etb,
    Kes,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Etb,
        Currency::Kes,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Etb => "ETB",
            Self::Kes => "KES",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Etb => "Ethiopian Birr",
            Self::Kes => "Kenyan Shilling",
            Self::Usd => "US Dollar",
            Self::Eur => "Euro",
            Self::Gbp => "British Pound",
        }
    }

    /// Option text of the currency selector, e.g. `ETB - Ethiopian Birr`.
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.code(), self.name())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Accepts either the bare code (`"usd"`, `"USD"`) or the selector label
/// (`"USD - US Dollar"`).
impl FromStr for Currency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.split(" - ").next().unwrap_or_default().trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ParseError::UnknownCurrency(s.to_string()))
    }
}

/// One payment order as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique, immutable identifier.
    pub id: String,
    pub amount: f64,
    pub currency: Currency,
    /// Display string, usually `Name (account)`.
    pub recipient: String,
    pub description: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Milliseconds spent by the processor; present only on `Success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<u64>,
    /// Processor decline message; present only on `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Processing attempts started so far. Scheduled resolutions capture this
    /// value and are discarded if it has moved on by the time they fire.
    pub attempts: u32,
}

/// A payment before the store assigns timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    /// Synthesized from the current time when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub amount: f64,
    pub currency: Currency,
    pub recipient: String,
    pub description: String,
    pub status: PaymentStatus,
}

/// Partial update merged into an existing record by `update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPatch {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
}

/// Current vs. allowed transactions per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    pub current: f64,
    pub limit: f64,
}

/// The authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// The single active dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub token: String,
    pub logged_in_at: DateTime<Utc>,
}
