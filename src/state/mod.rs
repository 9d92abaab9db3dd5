//! Crawl lifecycle state
//!
//! Holds the summary counters and the stop-reason state machine that records
//! why and how a crawl ended.

mod summary;

pub use summary::{CrawlSummary, StopReason};
