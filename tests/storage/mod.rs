//! Shared storage integration tests.
//!
//! Tests the RecordStore interface against all implementations.
//! Each implementation module imports these test functions and runs them.

pub mod record_store_tests;
