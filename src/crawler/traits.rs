//! Collaborator seams for the crawl engine
//!
//! The engine orchestrates traversal; fetching, extraction, authentication,
//! and progress reporting are external collaborators behind these traits.
//! Default implementations live in this crate (`HttpFetcher`,
//! `DomExtractor`, `LogReporter`) but the engine depends only on the traits.

use crate::crawler::types::{AuthSession, ExtractedContent, FetchedPage, SessionContext};
use crate::Result;
use async_trait::async_trait;

/// Loads a URL and returns its rendered result
///
/// Contract highlights:
/// - `fetch` is infallible at the interface: transport failures come back as
///   a `FetchedPage` with `error` set and a heuristically inferred status.
/// - HTTP 429 responses must be retried up to 3 additional attempts with
///   `exponential_backoff(attempt, 1000)` delays before surfacing.
/// - Redirect statuses (300-399) and the resolved final URL must be
///   reported so the engine can track redirect chains.
/// - A response resolving to a different origin than the request must be
///   treated as an error, not followed.
#[async_trait]
pub trait PageFetcher: Send {
    /// Prepares the fetch backend; a failure here is fatal to the crawl
    async fn init(&mut self) -> Result<()>;

    /// Fetches one canonical URL, optionally carrying a session context
    async fn fetch(&mut self, url: &str, session: Option<&SessionContext>) -> FetchedPage;

    /// Releases the backend's resources; called unconditionally on crawl exit
    async fn close(&mut self);
}

/// Turns raw markup into structured surface records
pub trait ContentExtractor: Send {
    /// Extracts same-origin links, forms, buttons, and input fields
    fn extract(&self, html: &str, page_url: &str) -> ExtractedContent;
}

/// Performs a login flow and produces a reusable session context
///
/// The engine never drives login itself; it only consumes the resulting
/// session via `CrawlEngine::set_auth_context`.
#[async_trait]
pub trait Authenticator: Send {
    async fn authenticate(&mut self, role: &str) -> Result<AuthSession>;
}

/// Receives traversal progress updates and warnings
///
/// Purely observational; implementations must not affect control flow.
pub trait ProgressReporter: Send {
    fn report(&mut self, pages_processed: u64, queue_depth: usize, current_url: &str);

    fn warn(&mut self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Default reporter that logs progress through tracing
#[derive(Debug, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&mut self, pages_processed: u64, queue_depth: usize, current_url: &str) {
        tracing::info!(
            "Progress: {} pages processed, {} queued, current: {}",
            pages_processed,
            queue_depth,
            current_url
        );
    }
}
