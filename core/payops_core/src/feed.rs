//! Live payment feed: text search plus status filter over a store snapshot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;
use crate::types::{Payment, PaymentStatus};

/// `all`, or one concrete status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PaymentStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: PaymentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub text: String,
    pub status: StatusFilter,
}

impl FeedQuery {
    /// Case-insensitive substring match on id, recipient or description,
    /// combined with the status filter.
    pub fn matches(&self, payment: &Payment) -> bool {
        if !self.status.matches(payment.status) {
            return false;
        }
        let needle = self.text.trim().to_lowercase();
        needle.is_empty()
            || payment.id.to_lowercase().contains(&needle)
            || payment.recipient.to_lowercase().contains(&needle)
            || payment.description.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub count: usize,
    pub payments: Vec<Payment>,
}

/// Matching payments, newest `created_at` first. Ties keep snapshot order.
pub fn filter_feed(payments: &[Payment], query: &FeedQuery) -> Feed {
    let mut matched: Vec<Payment> = payments
        .iter()
        .filter(|p| query.matches(p))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Feed {
        count: matched.len(),
        payments: matched,
    }
}
