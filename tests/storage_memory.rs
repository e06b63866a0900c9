//! In-process storage integration tests.
//!
//! Run with: cargo test --test storage_memory

mod storage;

use cost_tracker::storage::MemoryRecordStore;

#[tokio::test]
async fn test_memory_record_store() {
    println!("=== Memory RecordStore Tests ===");

    run_record_store_tests!(MemoryRecordStore::new());

    println!("=== All Memory RecordStore tests PASSED ===");
}
