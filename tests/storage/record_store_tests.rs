//! RecordStore interface tests.
//!
//! These tests verify the contract of the RecordStore trait.
//! Each storage implementation should run these tests, handing every test
//! a fresh, empty store.

use chrono::{Duration, TimeZone, Utc};

use cost_tracker::record::{sort_newest_first, Record};
use cost_tracker::storage::RecordStore;

/// Create a record `offset_secs` after a fixed base instant.
pub fn make_record(offset_secs: i64, message: &str) -> Record {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    Record::new_at(base + Duration::seconds(offset_secs), message)
}

/// Scan and sort, so assertions don't depend on backend order.
async fn scan_sorted<S: RecordStore>(store: &S, limit_hint: usize) -> Vec<Record> {
    let mut records = store
        .scan(limit_hint)
        .await
        .expect("scan should succeed")
        .records;
    sort_newest_first(&mut records);
    records
}

// =============================================================================
// RecordStore::scan tests
// =============================================================================

pub async fn test_scan_empty_store<S: RecordStore>(store: &S) {
    let output = store.scan(10).await.expect("scan should succeed");
    assert!(output.records.is_empty(), "empty store should scan empty");
    assert!(output.malformed.is_empty());
}

pub async fn test_scan_ignores_limit_hint<S: RecordStore>(store: &S) {
    for i in 0..12 {
        store
            .put(&make_record(i, &format!("alert {}", i)))
            .await
            .expect("put should succeed");
    }

    let records = scan_sorted(store, 1).await;
    assert_eq!(records.len(), 12, "limit hint must not truncate the scan");
}

// =============================================================================
// RecordStore::put tests
// =============================================================================

pub async fn test_put_single_record<S: RecordStore>(store: &S) {
    let record = make_record(0, "Test SNS Billing Alert");
    store.put(&record).await.expect("put should succeed");

    let records = scan_sorted(store, 10).await;
    assert_eq!(records, vec![record]);
}

pub async fn test_put_multiple_records<S: RecordStore>(store: &S) {
    let records: Vec<Record> = (0..5).map(|i| make_record(i, "same text")).collect();
    for record in &records {
        store.put(record).await.expect("put should succeed");
    }

    let mut expected = records.clone();
    sort_newest_first(&mut expected);
    assert_eq!(scan_sorted(store, 10).await, expected);
}

pub async fn test_put_same_id_overwrites<S: RecordStore>(store: &S) {
    store
        .put(&make_record(0, "first"))
        .await
        .expect("put should succeed");
    store
        .put(&make_record(0, "second"))
        .await
        .expect("put should succeed");

    let records = scan_sorted(store, 10).await;
    assert_eq!(records.len(), 1, "same id should collapse to one record");
    assert_eq!(records[0].message, "second", "last write should win");
}

pub async fn test_put_preserves_message_text<S: RecordStore>(store: &S) {
    let message = "Budget \"monthly\" exceeded: 103%, café ☕\nline two";
    store
        .put(&make_record(0, message))
        .await
        .expect("put should succeed");

    let records = scan_sorted(store, 10).await;
    assert_eq!(records[0].message, message);
}

pub async fn test_concurrent_puts<S: RecordStore>(store: &S) {
    let a = make_record(0, "a");
    let b = make_record(1, "b");
    let c = make_record(2, "c");

    let (ra, rb, rc) = tokio::join!(store.put(&a), store.put(&b), store.put(&c));
    ra.expect("put a should succeed");
    rb.expect("put b should succeed");
    rc.expect("put c should succeed");

    assert_eq!(scan_sorted(store, 10).await, vec![c, b, a]);
}

/// Run all RecordStore tests, building a fresh store for each.
#[macro_export]
macro_rules! run_record_store_tests {
    ($make_store:expr) => {
        use $crate::storage::record_store_tests::*;

        // scan tests
        test_scan_empty_store(&$make_store).await;
        println!("  test_scan_empty_store: PASSED");

        test_scan_ignores_limit_hint(&$make_store).await;
        println!("  test_scan_ignores_limit_hint: PASSED");

        // put tests
        test_put_single_record(&$make_store).await;
        println!("  test_put_single_record: PASSED");

        test_put_multiple_records(&$make_store).await;
        println!("  test_put_multiple_records: PASSED");

        test_put_same_id_overwrites(&$make_store).await;
        println!("  test_put_same_id_overwrites: PASSED");

        test_put_preserves_message_text(&$make_store).await;
        println!("  test_put_preserves_message_text: PASSED");

        test_concurrent_puts(&$make_store).await;
        println!("  test_concurrent_puts: PASSED");
    };
}
