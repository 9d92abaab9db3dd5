//! Crawl summary and stop-reason state machine
//!
//! A crawl is implicitly *running* until exactly one terminal state is
//! recorded. The first `mark_*` call wins; later calls are no-ops so the
//! stop reason is authoritative for how the crawl ended.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Terminal disposition of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    MaxPagesReached,
    Interrupted,
    Error,
}

/// Accumulated counters and terminal state for one crawl
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    /// Successfully fetched (2xx) pages
    pub total_pages: u64,
    pub total_forms: u64,
    pub total_buttons: u64,
    pub total_input_fields: u64,
    /// Fetch failures, HTTP >= 400 responses, and detected redirect loops
    pub errors: u64,
    /// Filtered, robots-disallowed, and duplicate-via-redirect URLs
    pub skipped: u64,
    pub interrupted: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Whole seconds between start and end, floored
    pub duration_seconds: Option<i64>,
    pub stop_reason: Option<StopReason>,
    /// Configured limits, echoed for display
    pub max_pages_limit: Option<u64>,
    pub max_depth_limit: Option<u32>,
}

impl CrawlSummary {
    /// Creates a running summary stamped with the crawl start time
    pub fn new(max_pages_limit: Option<u64>, max_depth_limit: Option<u32>) -> Self {
        Self {
            total_pages: 0,
            total_forms: 0,
            total_buttons: 0,
            total_input_fields: 0,
            errors: 0,
            skipped: 0,
            interrupted: false,
            start_time: Utc::now(),
            end_time: None,
            duration_seconds: None,
            stop_reason: None,
            max_pages_limit,
            max_depth_limit,
        }
    }

    pub fn increment_total_pages(&mut self) {
        self.total_pages += 1;
    }

    pub fn increment_errors(&mut self) {
        self.errors += 1;
    }

    pub fn increment_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Adds discovered element counts from one page
    pub fn add_elements(&mut self, forms: u64, buttons: u64, input_fields: u64) {
        self.total_forms += forms;
        self.total_buttons += buttons;
        self.total_input_fields += input_fields;
    }

    /// Records that the page cap was hit while the queue was still non-empty
    pub fn mark_max_pages_reached(&mut self) {
        self.set_stop_reason(StopReason::MaxPagesReached);
    }

    /// Records a user-requested interruption
    ///
    /// The `interrupted` flag is set unconditionally; the stop reason only
    /// if no other terminal state was recorded first.
    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
        self.set_stop_reason(StopReason::Interrupted);
    }

    /// Records natural completion (queue drained with no other terminal state)
    pub fn mark_completed(&mut self) {
        self.set_stop_reason(StopReason::Completed);
    }

    /// Records a fatal error
    pub fn mark_error(&mut self) {
        self.set_stop_reason(StopReason::Error);
    }

    fn set_stop_reason(&mut self, reason: StopReason) {
        if self.stop_reason.is_none() {
            self.stop_reason = Some(reason);
        }
    }

    /// Stamps the end time and computes the floored duration in seconds
    ///
    /// Idempotent: only the first call has any effect, so every exit path
    /// can finalize without double-stamping.
    pub fn finalize(&mut self, end_time: DateTime<Utc>) {
        if self.end_time.is_some() {
            return;
        }
        self.end_time = Some(end_time);
        self.duration_seconds = Some((end_time - self.start_time).num_seconds());
    }
}
