//! # Payment Operations Core
//!
//! State and view logic behind the payment operations dashboard. The crate
//! owns the payment order lifecycle and derives every panel the dashboard
//! shows from a snapshot of it.
//!
//! | Panel / concern   | Entry point(s)                                        |
//! |-------------------|-------------------------------------------------------|
//! | Sign-in           | [`SessionStore::login`], [`SessionStore::logout`]     |
//! | Lifecycle         | [`PaymentStore::add`], `update`, `retry`              |
//! | Throughput        | [`PaymentStore::set_throughput`]                      |
//! | Submission form   | [`PaymentForm::validate`], [`PaymentForm::submit`]    |
//! | Live feed         | [`filter_feed`]                                       |
//! | Detail panel      | [`payment_detail`], [`retry_from_detail`]             |
//! | Rate indicator    | [`RateIndicator::evaluate`]                           |
//! | Analytics         | [`summarize`]                                         |
//! | Startup data      | [`mock_payments`]                                     |
//!
//! ## Architecture
//!
//! Time, delays and randomness are injected through the traits in
//! [`runtime`]. The store never sleeps; it hands deferred resolutions to a
//! [`Scheduler`]. Views are pure functions of a snapshot and keep no state.

pub mod analytics;
pub mod detail;
pub mod errors;
pub mod feed;
pub mod rate;
pub mod runtime;
pub mod seed;
pub mod session;
pub mod store;
pub mod submission;
pub mod types;

#[cfg(test)]
mod test_views;

pub use analytics::{summarize, Analytics, StatusCounts};
pub use detail::{payment_detail, retry_from_detail, PaymentDetail};
pub use errors::{AuthError, FieldError, ParseError, StoreError, SubmitError};
pub use feed::{filter_feed, Feed, FeedQuery, StatusFilter};
pub use rate::{RateIndicator, RateTier};
pub use runtime::{Clock, RandomSource, Scheduler, StdRandom, SystemClock, TokioScheduler};
pub use seed::{mock_payments, DEFAULT_SEED_COUNT};
pub use session::{Credentials, SessionStore};
pub use store::{PaymentStore, RATE_LIMIT_TPS};
pub use submission::PaymentForm;
pub use types::{Currency, Payment, PaymentDraft, PaymentPatch, PaymentStatus, RateLimit, Session, User};

#[cfg(any(test, feature = "testutils"))]
pub use runtime::{ManualScheduler, ScriptedRandom};
