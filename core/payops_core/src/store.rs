//! # Payment Store
//!
//! The single owner of every payment order, the current throughput reading
//! and the rate-limit ceiling. Every view reads a snapshot from here and every
//! action goes through one of the mutation methods.
//!
//! ## Simulated processing
//!
//! Whenever a record enters `Processing` the store asks its [`Scheduler`] for
//! one deferred resolution. The delay, the success odds, the processing time
//! and the decline message come from a [`ResolutionProfile`]:
//!
//! | Profile        | Delay (ms)    | P(success) | Processing (ms) | Decline message                  |
//! |----------------|---------------|------------|-----------------|----------------------------------|
//! | [`SUBMISSION`] | 2000 .. 5000  | 0.9        | 500 .. 3500     | `Payment declined`               |
//! | [`RETRY`]      | 1000 .. 3000  | 0.7        | 500 .. 2500     | `Retry failed - contact support` |
//!
//! The delay is drawn when the resolution is scheduled; the outcome and the
//! processing time are drawn when it fires.
//!
//! ## Stale resolutions
//!
//! A resolution carries the `attempts` value the record had when it was
//! scheduled. It applies only if the record still exists, is still
//! `Processing`, and has not started another attempt since. Anything else is
//! dropped, so the most recent attempt always owns the outcome.

use std::ops::Range;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::runtime::{lock, Clock, RandomSource, Scheduler};
use crate::types::{Payment, PaymentDraft, PaymentPatch, PaymentStatus, RateLimit};

/// Ceiling of the rate-limit display, in transactions per second.
pub const RATE_LIMIT_TPS: f64 = 2.0;

/// Throughput reading before the first tick.
pub const INITIAL_TPS: f64 = 1.2;

/// Timing and odds of one simulated processor round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionProfile {
    pub delay_ms: Range<u64>,
    pub success_probability: f64,
    pub processing_ms: Range<u64>,
    pub failure_reason: &'static str,
}

pub static SUBMISSION: ResolutionProfile = ResolutionProfile {
    delay_ms: 2000..5000,
    success_probability: 0.9,
    processing_ms: 500..3500,
    failure_reason: "Payment declined",
};

pub static RETRY: ResolutionProfile = ResolutionProfile {
    delay_ms: 1000..3000,
    success_probability: 0.7,
    processing_ms: 500..2500,
    failure_reason: "Retry failed - contact support",
};

struct Ledger {
    /// Most recent insertion first.
    payments: Vec<Payment>,
    current_tps: f64,
    rate_limit: RateLimit,
}

impl Ledger {
    fn find_mut(&mut self, id: &str) -> Option<&mut Payment> {
        self.payments.iter_mut().find(|p| p.id == id)
    }

    fn contains(&self, id: &str) -> bool {
        self.payments.iter().any(|p| p.id == id)
    }
}

struct Shared {
    ledger: Mutex<Ledger>,
    random: Mutex<Box<dyn RandomSource>>,
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
}

impl Shared {
    /// Current time, never earlier than `floor`.
    fn stamp(&self, floor: DateTime<Utc>) -> DateTime<Utc> {
        self.clock.now().max(floor)
    }
}

/// Cloneable handle to the shared payment state.
#[derive(Clone)]
pub struct PaymentStore {
    shared: Arc<Shared>,
}

impl PaymentStore {
    pub fn new(
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                ledger: Mutex::new(Ledger {
                    payments: Vec::new(),
                    current_tps: INITIAL_TPS,
                    rate_limit: RateLimit {
                        current: INITIAL_TPS,
                        limit: RATE_LIMIT_TPS,
                    },
                }),
                random: Mutex::new(random),
                clock,
                scheduler,
            }),
        }
    }

    /// Replaces the whole collection. Seeded records get no timers.
    pub fn seed(&self, payments: Vec<Payment>) {
        let count = payments.len();
        lock(&self.shared.ledger).payments = payments;
        info!("Payment store seeded with {count} records");
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Full collection, most recent insertion first.
    pub fn snapshot(&self) -> Vec<Payment> {
        lock(&self.shared.ledger).payments.clone()
    }

    pub fn get(&self, id: &str) -> Option<Payment> {
        lock(&self.shared.ledger)
            .payments
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn current_tps(&self) -> f64 {
        lock(&self.shared.ledger).current_tps
    }

    pub fn rate_limit(&self) -> RateLimit {
        lock(&self.shared.ledger).rate_limit
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Stamps and enqueues a new payment at the front of the collection.
    pub fn add(&self, draft: PaymentDraft) -> Result<Payment, StoreError> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(StoreError::InvalidAmount(draft.amount));
        }
        if draft.status.is_terminal() {
            return Err(StoreError::InvalidInitialStatus(draft.status));
        }

        let now = self.shared.clock.now();
        let payment = {
            let mut ledger = lock(&self.shared.ledger);
            let id = match draft.id.filter(|id| !id.trim().is_empty()) {
                Some(id) if ledger.contains(&id) => return Err(StoreError::DuplicateId(id)),
                Some(id) => id,
                None => synthesize_id(&ledger, now),
            };
            let payment = Payment {
                id,
                amount: draft.amount,
                currency: draft.currency,
                recipient: draft.recipient,
                description: draft.description,
                status: draft.status,
                created_at: now,
                updated_at: now,
                processing_time: None,
                failure_reason: None,
                attempts: u32::from(draft.status == PaymentStatus::Processing),
            };
            ledger.payments.insert(0, payment.clone());
            payment
        };

        info!(
            "Payment {} queued: {} {} to {}",
            payment.id, payment.amount, payment.currency, payment.recipient
        );
        if payment.status == PaymentStatus::Processing {
            self.schedule_resolution(&payment.id, payment.attempts, &SUBMISSION);
        }
        Ok(payment)
    }

    /// Merges `patch` into the record. Returns `Ok(None)` for an unknown id.
    ///
    /// The only status change accepted here is `Pending -> Processing`, which
    /// starts an attempt exactly like a submission does.
    pub fn update(&self, id: &str, patch: PaymentPatch) -> Result<Option<Payment>, StoreError> {
        if let Some(amount) = patch.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(StoreError::InvalidAmount(amount));
            }
        }

        let updated = {
            let mut ledger = lock(&self.shared.ledger);
            let Some(payment) = ledger.find_mut(id) else {
                debug!("update ignored: no payment {id}");
                return Ok(None);
            };

            let started = match patch.status {
                Some(next) if next != payment.status => {
                    if payment.status != PaymentStatus::Pending
                        || next != PaymentStatus::Processing
                    {
                        return Err(StoreError::InvalidTransition {
                            id: id.to_string(),
                            from: payment.status,
                            to: next,
                        });
                    }
                    payment.status = next;
                    payment.attempts += 1;
                    true
                }
                _ => false,
            };

            if let Some(amount) = patch.amount {
                payment.amount = amount;
            }
            if let Some(currency) = patch.currency {
                payment.currency = currency;
            }
            if let Some(recipient) = patch.recipient {
                payment.recipient = recipient;
            }
            if let Some(description) = patch.description {
                payment.description = description;
            }
            payment.updated_at = self.shared.stamp(payment.created_at);
            (payment.clone(), started)
        };

        let (payment, started) = updated;
        if started {
            info!("Payment {} moved to processing", payment.id);
            self.schedule_resolution(&payment.id, payment.attempts, &SUBMISSION);
        }
        Ok(Some(payment))
    }

    /// Puts a failed payment back into processing. Returns `Ok(None)` for an
    /// unknown id.
    pub fn retry(&self, id: &str) -> Result<Option<Payment>, StoreError> {
        let payment = {
            let mut ledger = lock(&self.shared.ledger);
            let Some(payment) = ledger.find_mut(id) else {
                debug!("retry ignored: no payment {id}");
                return Ok(None);
            };
            if payment.status != PaymentStatus::Failed {
                return Err(StoreError::NotRetryable {
                    id: id.to_string(),
                    status: payment.status,
                });
            }
            payment.status = PaymentStatus::Processing;
            payment.failure_reason = None;
            payment.processing_time = None;
            payment.attempts += 1;
            payment.updated_at = self.shared.stamp(payment.created_at);
            payment.clone()
        };

        info!("Payment {} retry #{}", payment.id, payment.attempts - 1);
        self.schedule_resolution(&payment.id, payment.attempts, &RETRY);
        Ok(Some(payment))
    }

    /// Overwrites the throughput reading and its rate-limit mirror.
    pub fn set_throughput(&self, tps: f64) -> Result<(), StoreError> {
        if !tps.is_finite() || tps < 0.0 {
            return Err(StoreError::InvalidThroughput(tps));
        }
        let mut ledger = lock(&self.shared.ledger);
        ledger.current_tps = tps;
        ledger.rate_limit = RateLimit {
            current: tps,
            limit: RATE_LIMIT_TPS,
        };
        debug!("Throughput set to {tps:.2} TPS");
        Ok(())
    }

    fn schedule_resolution(&self, id: &str, attempt: u32, profile: &'static ResolutionProfile) {
        let delay_ms = lock(&self.shared.random).pick_u64(profile.delay_ms.clone());
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let id = id.to_string();
        debug!("Payment {id} attempt {attempt} resolves in {delay_ms} ms");
        self.shared.scheduler.schedule(
            Duration::from_millis(delay_ms),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    resolve(&shared, &id, attempt, profile);
                }
            }),
        );
    }
}

/// Applies a fired resolution to the record it was scheduled for.
fn resolve(shared: &Shared, id: &str, attempt: u32, profile: &ResolutionProfile) {
    let mut ledger = lock(&shared.ledger);
    let Some(payment) = ledger.find_mut(id) else {
        debug!("Resolution for {id} dropped: payment no longer exists");
        return;
    };
    if payment.status != PaymentStatus::Processing || payment.attempts != attempt {
        debug!(
            "Resolution for {id} attempt {attempt} dropped: record is {} at attempt {}",
            payment.status, payment.attempts
        );
        return;
    }

    let mut random = lock(&shared.random);
    if random.chance(profile.success_probability) {
        payment.status = PaymentStatus::Success;
        payment.processing_time = Some(random.pick_u64(profile.processing_ms.clone()));
        payment.failure_reason = None;
        info!("Payment {id} settled");
    } else {
        payment.status = PaymentStatus::Failed;
        payment.processing_time = None;
        payment.failure_reason = Some(profile.failure_reason.to_string());
        info!("Payment {id} failed: {}", profile.failure_reason);
    }
    payment.updated_at = shared.stamp(payment.created_at);
}

/// `payment-<unix millis>`, suffixed when two submissions share a millisecond.
fn synthesize_id(ledger: &Ledger, now: DateTime<Utc>) -> String {
    let base = format!("payment-{}", now.timestamp_millis());
    let mut candidate = base.clone();
    let mut n = 2;
    while ledger.contains(&candidate) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    candidate
}
