//! Crawler module for web surface discovery
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first crawl engine and its traversal state
//! - Collaborator traits for fetching, extraction, auth, and progress
//! - HTTP fetching with redirect handling and 429 retry logic
//! - DOM extraction of links, forms, buttons, and input fields
//! - Request rate limiting and redirect-loop tracking

mod engine;
mod extractor;
mod fetcher;
mod limiter;
mod redirects;
mod traits;
mod types;

pub use engine::CrawlEngine;
pub use extractor::DomExtractor;
pub use fetcher::{build_http_client, HttpFetcher};
pub use limiter::{exponential_backoff, RateLimiter};
pub use redirects::RedirectTracker;
pub use traits::{Authenticator, ContentExtractor, LogReporter, PageFetcher, ProgressReporter};
pub use types::{
    AuthEvent, AuthSession, Button, CrawlResults, ExtractedContent, FetchedPage, Form,
    InputField, Page, QueueItem, SessionContext,
};

use crate::config::Config;
use crate::interrupt::InterruptController;
use crate::Result;
use std::sync::Arc;

/// Runs a complete anonymous crawl with the default collaborators
///
/// This is the main library entry point. It wires the HTTP fetcher, the DOM
/// extractor, and the logging progress reporter into a crawl engine and runs
/// it to completion (or interruption).
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `interrupt` - Cancellation state, usually wired to Ctrl-C by the caller
///
/// # Returns
///
/// * `Ok(CrawlResults)` - Results on every non-fatal path, partial if interrupted
/// * `Err(ScoutError)` - Invalid configuration or fetch backend failure
pub async fn run_crawl(config: &Config, interrupt: Arc<InterruptController>) -> Result<CrawlResults> {
    let mut engine = CrawlEngine::new(
        config,
        Box::new(HttpFetcher::new(&config.user_agent_string())),
        Box::new(DomExtractor::new()),
        Box::new(LogReporter),
        interrupt,
    )?;
    engine.crawl().await
}
