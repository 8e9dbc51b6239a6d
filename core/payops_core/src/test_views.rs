use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::analytics::{summarize, StatusCounts};
use crate::detail::{payment_detail, retry_from_detail};
use crate::errors::SubmitError;
use crate::feed::{filter_feed, FeedQuery, StatusFilter};
use crate::runtime::{ManualScheduler, ScriptedRandom};
use crate::store::PaymentStore;
use crate::submission::PaymentForm;
use crate::types::{Currency, Payment, PaymentStatus};

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, minute, 0).unwrap()
}

fn payment(id: &str, recipient: &str, status: PaymentStatus, minute: u32) -> Payment {
    Payment {
        id: id.to_string(),
        amount: 100.0,
        currency: Currency::Usd,
        recipient: recipient.to_string(),
        description: format!("Order {id}"),
        status,
        created_at: at(minute),
        updated_at: at(minute),
        processing_time: (status == PaymentStatus::Success).then_some(1000),
        failure_reason: (status == PaymentStatus::Failed).then(|| "Payment declined".to_string()),
        attempts: u32::from(status != PaymentStatus::Pending),
    }
}

fn text(q: &str) -> FeedQuery {
    FeedQuery {
        text: q.to_string(),
        status: StatusFilter::All,
    }
}

// ── Feed ─────────────────────────────────────────────────────────────

#[test]
fn test_feed_text_search_is_case_insensitive() {
    let payments = vec![
        payment("a", "Bob", PaymentStatus::Success, 1),
        payment("b", "Alice", PaymentStatus::Success, 2),
    ];

    let feed = filter_feed(&payments, &text("bob"));

    assert_eq!(feed.count, 1);
    assert_eq!(feed.payments[0].id, "a");
}

#[test]
fn test_feed_searches_id_and_description() {
    let payments = vec![
        payment("INV-42", "Dashen Bank", PaymentStatus::Pending, 1),
        payment("x", "Ethio Telecom", PaymentStatus::Pending, 2),
    ];

    assert_eq!(filter_feed(&payments, &text("inv-4")).payments[0].id, "INV-42");
    assert_eq!(filter_feed(&payments, &text("ORDER X")).payments[0].id, "x");
    assert_eq!(filter_feed(&payments, &text("")).count, 2);
    assert_eq!(filter_feed(&payments, &text("nobody")).count, 0);
}

#[test]
fn test_feed_status_filter_orders_newest_first() {
    let payments = vec![
        payment("s", "A", PaymentStatus::Success, 5),
        payment("f-old", "B", PaymentStatus::Failed, 1),
        payment("f-new", "C", PaymentStatus::Failed, 9),
        payment("p", "D", PaymentStatus::Pending, 7),
    ];
    let query = FeedQuery {
        text: String::new(),
        status: StatusFilter::Only(PaymentStatus::Failed),
    };

    let feed = filter_feed(&payments, &query);
    let ids: Vec<_> = feed.payments.iter().map(|p| p.id.as_str()).collect();

    assert_eq!(ids, vec!["f-new", "f-old"]);
}

#[test]
fn test_feed_combines_text_and_status() {
    let payments = vec![
        payment("1", "Bob", PaymentStatus::Failed, 1),
        payment("2", "Bob", PaymentStatus::Success, 2),
        payment("3", "Alice", PaymentStatus::Failed, 3),
    ];
    let query = FeedQuery {
        text: "BOB".to_string(),
        status: "failed".parse().unwrap(),
    };

    let feed = filter_feed(&payments, &query);
    assert_eq!(feed.count, 1);
    assert_eq!(feed.payments[0].id, "1");
}

#[test]
fn test_status_filter_parsing() {
    assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
    assert_eq!("".parse::<StatusFilter>(), Ok(StatusFilter::All));
    assert_eq!(
        "Processing".parse::<StatusFilter>(),
        Ok(StatusFilter::Only(PaymentStatus::Processing))
    );
    assert!("settled".parse::<StatusFilter>().is_err());
}

// ── Analytics ────────────────────────────────────────────────────────

#[test]
fn test_analytics_success_rate() {
    let payments = vec![
        payment("1", "A", PaymentStatus::Success, 1),
        payment("2", "B", PaymentStatus::Success, 2),
        payment("3", "C", PaymentStatus::Failed, 3),
        payment("4", "D", PaymentStatus::Pending, 4),
    ];

    let stats = summarize(&payments, 1.2);

    assert_eq!(stats.total, 4);
    assert_eq!(stats.success_rate, 50.0);
    assert_eq!(stats.current_tps, 1.2);
    assert_eq!(
        stats.by_status,
        StatusCounts {
            pending: 1,
            processing: 0,
            success: 2,
            failed: 1,
        }
    );
}

#[test]
fn test_analytics_volume_and_processing_time() {
    let mut big = payment("1", "A", PaymentStatus::Success, 1);
    big.amount = 2500.0;
    big.processing_time = Some(3000);
    let mut small = payment("2", "B", PaymentStatus::Success, 2);
    small.amount = 500.0;
    small.processing_time = Some(1000);
    let mut declined = payment("3", "C", PaymentStatus::Failed, 3);
    declined.amount = 9999.0;

    let stats = summarize(&[big, small, declined], 0.0);

    assert_eq!(stats.successful_volume, 3000.0);
    assert_eq!(stats.avg_processing_secs, 2.0);
    let slices: Vec<_> = stats
        .distribution
        .iter()
        .map(|s| (s.name, s.value))
        .collect();
    assert_eq!(slices, vec![("Success", 2), ("Failed", 1)]);
}

#[test]
fn test_analytics_empty_collection() {
    let stats = summarize(&[], 0.0);

    assert_eq!(stats.total, 0);
    assert_eq!(stats.success_rate, 0.0);
    assert_eq!(stats.avg_processing_secs, 0.0);
    assert!(stats.distribution.is_empty());
}

// ── Detail and submission through the store ─────────────────────────

fn store_with(samples: Vec<f64>) -> (Arc<ManualScheduler>, PaymentStore) {
    let scheduler = Arc::new(ManualScheduler::at_epoch());
    let store = PaymentStore::new(
        scheduler.clone(),
        scheduler.clone(),
        Box::new(ScriptedRandom::new(samples)),
    );
    (scheduler, store)
}

fn form(id: &str) -> PaymentForm {
    PaymentForm {
        payment_id: id.to_string(),
        amount: Some(75.0),
        currency: "EUR".to_string(),
        recipient_name: "Yonas Tesfaye".to_string(),
        recipient_account: "ET-884".to_string(),
        description: "Consulting".to_string(),
    }
}

#[test]
fn test_submitted_form_lands_on_top_of_feed() {
    let (_scheduler, store) = store_with(vec![]);
    store.seed(vec![payment("old", "A", PaymentStatus::Success, 1)]);

    let submitted = form("PAY-9").submit(&store).unwrap();

    assert_eq!(submitted.status, PaymentStatus::Processing);
    assert_eq!(submitted.recipient, "Yonas Tesfaye (ET-884)");
    assert_eq!(store.snapshot()[0].id, "PAY-9");
}

#[test]
fn test_submit_reports_duplicate_id() {
    let (_scheduler, store) = store_with(vec![]);
    form("PAY-9").submit(&store).unwrap();

    assert!(matches!(
        form("PAY-9").submit(&store),
        Err(SubmitError::Store(_))
    ));
    assert!(matches!(
        PaymentForm::default().submit(&store),
        Err(SubmitError::Invalid(errors)) if errors.len() == 6
    ));
}

#[test]
fn test_detail_projection_and_retry() {
    // delay 2000, decline; retry delay 1000
    let (scheduler, store) = store_with(vec![0.0, 0.95, 0.0]);
    form("PAY-1").submit(&store).unwrap();
    scheduler.advance(Duration::from_millis(2000));

    let detail = payment_detail(&store, "PAY-1").unwrap();
    assert_eq!(detail.status_label, "Failed");
    assert!(detail.can_retry);
    assert_eq!(detail.copy_text, "PAY-1");
    assert_eq!(detail.processing_secs, None);

    let retried = retry_from_detail(&store, "PAY-1").unwrap().unwrap();
    assert_eq!(retried.status_label, "Processing");
    assert!(!retried.can_retry);

    assert!(payment_detail(&store, "missing").is_none());
    assert_eq!(retry_from_detail(&store, "missing"), Ok(None));
}

#[test]
fn test_detail_serializes_flat_camel_case() {
    let detail = crate::detail::PaymentDetail::from(payment(
        "p",
        "A",
        PaymentStatus::Success,
        1,
    ));
    let json = serde_json::to_value(&detail).unwrap();

    assert_eq!(json["id"], "p");
    assert_eq!(json["status"], "success");
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["processingTime"], 1000);
    assert_eq!(json["processingSecs"], 1.0);
    assert_eq!(json["canRetry"], false);
    assert!(json.get("failureReason").is_none());
}
