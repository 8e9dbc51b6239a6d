//! Synthetic payments loaded into the store at startup.

use chrono::{DateTime, Duration, Utc};

use crate::runtime::RandomSource;
use crate::types::{Currency, Payment, PaymentStatus};

pub const DEFAULT_SEED_COUNT: usize = 20;

const RECIPIENTS: [&str; 10] = [
    "Abebe Kebede",
    "Tigist Mekonen",
    "Dawit Haile",
    "Hanan Trading PLC",
    "Addis Construction Ltd",
    "Meron Bekele",
    "Yonas Tesfaye",
    "Ethio Telecom",
    "Commercial Bank of Ethiopia",
    "Dashen Bank",
];

const SEEDED_FAILURE: &str = "Insufficient funds";

const WEEK_MS: u64 = 7 * 24 * 60 * 60 * 1000;
const HOUR_MS: u64 = 60 * 60 * 1000;

/// `count` random payments created within the week before `now`.
///
/// Records are returned in id order (`payment-1` first), not by creation time.
pub fn mock_payments(
    random: &mut dyn RandomSource,
    now: DateTime<Utc>,
    count: usize,
) -> Vec<Payment> {
    (1..=count)
        .map(|n| {
            let status = PaymentStatus::ALL[random.pick_index(PaymentStatus::ALL.len())];
            let created_at = now - Duration::milliseconds(random.pick_u64(0..WEEK_MS) as i64);
            let updated_at = (created_at
                + Duration::milliseconds(random.pick_u64(0..HOUR_MS) as i64))
            .min(now);

            Payment {
                id: format!("payment-{n}"),
                amount: random.pick_u64(100..10_100) as f64,
                currency: Currency::ALL[random.pick_index(Currency::ALL.len())],
                recipient: RECIPIENTS[random.pick_index(RECIPIENTS.len())].to_string(),
                description: format!("Payment for services #{n}"),
                status,
                created_at,
                updated_at,
                processing_time: (status == PaymentStatus::Success)
                    .then(|| random.pick_u64(1000..6000)),
                failure_reason: (status == PaymentStatus::Failed)
                    .then(|| SEEDED_FAILURE.to_string()),
                attempts: u32::from(status != PaymentStatus::Pending),
            }
        })
        .collect()
}
