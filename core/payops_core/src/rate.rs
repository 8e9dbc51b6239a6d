//! Rate-limit indicator. Display only: nothing here throttles the store.

use serde::{Deserialize, Serialize};

use crate::types::RateLimit;

pub const WARNING_PERCENT: f64 = 90.0;
pub const CRITICAL_PERCENT: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateTier {
    Normal,
    Warning,
    Critical,
}

impl RateTier {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= CRITICAL_PERCENT {
            Self::Critical
        } else if percentage >= WARNING_PERCENT {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Normal => "System operating normally",
            Self::Warning => "Warning: Approaching rate limit",
            Self::Critical => "Critical: Consider throttling new payments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateIndicator {
    pub current: f64,
    pub limit: f64,
    pub percentage: f64,
    pub tier: RateTier,
    pub advisory: String,
}

impl RateIndicator {
    pub fn evaluate(current: f64, limit: f64) -> Self {
        let percentage = if limit > 0.0 {
            current / limit * 100.0
        } else {
            0.0
        };
        let tier = RateTier::from_percentage(percentage);
        Self {
            current,
            limit,
            percentage,
            tier,
            advisory: tier.advisory().to_string(),
        }
    }
}

impl From<RateLimit> for RateIndicator {
    fn from(rate: RateLimit) -> Self {
        Self::evaluate(rate.current, rate.limit)
    }
}
