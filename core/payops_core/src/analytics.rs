//! Aggregate metrics, recomputed in full from a snapshot on every read.

use serde::{Deserialize, Serialize};

use crate::types::{Payment, PaymentStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub success: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: PaymentStatus) -> usize {
        match status {
            PaymentStatus::Pending => self.pending,
            PaymentStatus::Processing => self.processing,
            PaymentStatus::Success => self.success,
            PaymentStatus::Failed => self.failed,
        }
    }

    fn bump(&mut self, status: PaymentStatus) {
        match status {
            PaymentStatus::Pending => self.pending += 1,
            PaymentStatus::Processing => self.processing += 1,
            PaymentStatus::Success => self.success += 1,
            PaymentStatus::Failed => self.failed += 1,
        }
    }
}

/// One slice of the status chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total: usize,
    pub by_status: StatusCounts,
    /// Percentage, `0.0` for an empty collection.
    pub success_rate: f64,
    /// Sum of successful amounts. Currencies are not converted.
    pub successful_volume: f64,
    /// Mean processing time in seconds over records that report one.
    pub avg_processing_secs: f64,
    /// Non-empty statuses in chart order.
    pub distribution: Vec<StatusSlice>,
    /// Throughput reading at the time of the summary.
    pub current_tps: f64,
}

pub fn summarize(payments: &[Payment], current_tps: f64) -> Analytics {
    let mut by_status = StatusCounts::default();
    let mut successful_volume = 0.0;
    let mut processing_total_ms = 0u64;
    let mut timed = 0u64;

    for payment in payments {
        by_status.bump(payment.status);
        if payment.status == PaymentStatus::Success {
            successful_volume += payment.amount;
        }
        if let Some(ms) = payment.processing_time {
            processing_total_ms += ms;
            timed += 1;
        }
    }

    let total = payments.len();
    let success_rate = if total > 0 {
        by_status.success as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let avg_processing_secs = if timed > 0 {
        processing_total_ms as f64 / timed as f64 / 1000.0
    } else {
        0.0
    };

    let distribution = [
        PaymentStatus::Success,
        PaymentStatus::Failed,
        PaymentStatus::Processing,
        PaymentStatus::Pending,
    ]
    .into_iter()
    .map(|status| StatusSlice {
        name: status.label(),
        value: by_status.get(status),
    })
    .filter(|slice| slice.value > 0)
    .collect();

    Analytics {
        total,
        by_status,
        success_rate,
        successful_volume,
        avg_processing_secs,
        distribution,
        current_tps,
    }
}
