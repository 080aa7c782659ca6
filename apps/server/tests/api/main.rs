//! API integration test suite.
//!
//! Runs the HTTP routes against the in-memory store with a temporary upload
//! directory and the offline AI gateway; the SQLite tests use an in-process
//! database. No network access is needed.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_ai;
mod test_calendar;
mod test_partners;
mod test_projects;
mod test_reports;
mod test_sqlite_store;
mod test_stats;
