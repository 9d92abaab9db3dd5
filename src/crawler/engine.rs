//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding and managing the FIFO frontier queue
//! - URL filtering, robots.txt compliance, and redirect-loop avoidance
//! - Rate-limited fetching and element extraction via collaborators
//! - Depth and page-cap accounting
//! - Cooperative interruption with partial-result preservation
//! - Building the final result aggregate

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::limiter::RateLimiter;
use crate::crawler::redirects::RedirectTracker;
use crate::crawler::traits::{ContentExtractor, PageFetcher, ProgressReporter};
use crate::crawler::types::{
    AuthEvent, AuthSession, Button, CrawlResults, Form, InputField, Page, QueueItem,
    SessionContext,
};
use crate::interrupt::InterruptController;
use crate::robots::RobotsChecker;
use crate::state::CrawlSummary;
use crate::url::{normalize, origin_of, UrlFilter};
use crate::{Result, ScoutError};
use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Mutable traversal state owned by one `crawl()` invocation
///
/// Everything that accumulates during a crawl lives here, so nothing leaks
/// across calls and no locking is needed: the engine's single control flow
/// is the only mutator.
struct CrawlState {
    queue: VecDeque<QueueItem>,
    discovered: HashSet<String>,
    redirects: RedirectTracker,
    summary: CrawlSummary,
    pages: Vec<Page>,
    forms: Vec<Form>,
    buttons: Vec<Button>,
    input_fields: Vec<InputField>,
    warnings: Vec<String>,
}

impl CrawlState {
    fn new(start_url: String, max_pages: Option<u64>, max_depth: Option<u32>) -> Self {
        let mut queue = VecDeque::new();
        let mut discovered = HashSet::new();
        discovered.insert(start_url.clone());
        queue.push_back(QueueItem {
            url: start_url,
            depth: 0,
        });

        Self {
            queue,
            discovered,
            redirects: RedirectTracker::new(),
            summary: CrawlSummary::new(max_pages, max_depth),
            pages: Vec::new(),
            forms: Vec::new(),
            buttons: Vec::new(),
            input_fields: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Total page records so far; compared against the page cap
    fn recorded_pages(&self) -> u64 {
        self.pages.len() as u64
    }
}

/// Breadth-first crawl orchestrator
///
/// Composes the URL filter, robots checker, rate limiter, and redirect
/// tracker with the external fetch/extract/report collaborators. One engine
/// runs one crawl; the interrupt controller is passed in explicitly so
/// cancellation state never outlives the call site that created it.
pub struct CrawlEngine {
    start_url: String,
    max_pages: Option<u64>,
    max_depth: Option<u32>,
    rate_interval: Duration,
    user_agent: String,
    filter: UrlFilter,
    fetcher: Box<dyn PageFetcher>,
    extractor: Box<dyn ContentExtractor>,
    reporter: Box<dyn ProgressReporter>,
    interrupt: Arc<InterruptController>,
    session: Option<SessionContext>,
    role_name: Option<String>,
    auth_events: Vec<AuthEvent>,
}

impl CrawlEngine {
    /// Creates an engine from a validated configuration and collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl configuration (start URL, limits, patterns)
    /// * `fetcher` - Page fetch backend
    /// * `extractor` - HTML element extractor
    /// * `reporter` - Progress and warning sink
    /// * `interrupt` - Cancellation state for this crawl
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Ready to crawl
    /// * `Err(ScoutError)` - Invalid start URL or URL pattern
    pub fn new(
        config: &Config,
        fetcher: Box<dyn PageFetcher>,
        extractor: Box<dyn ContentExtractor>,
        reporter: Box<dyn ProgressReporter>,
        interrupt: Arc<InterruptController>,
    ) -> Result<Self> {
        let filter = UrlFilter::new(
            &config.crawler.include_patterns,
            &config.crawler.exclude_patterns,
        )?;

        Ok(Self {
            start_url: config.start_url.clone(),
            max_pages: config.crawler.max_pages,
            max_depth: config.crawler.max_depth,
            rate_interval: Duration::from_millis(config.crawler.rate_interval_ms),
            user_agent: config.user_agent_string(),
            filter,
            fetcher,
            extractor,
            reporter,
            interrupt,
            session: None,
            role_name: None,
            auth_events: Vec::new(),
        })
    }

    /// Attaches an externally produced authenticated session
    ///
    /// Subsequent fetches carry the session context. The engine performs no
    /// login logic itself; it only consumes what the authenticator produced.
    pub fn set_auth_context(&mut self, session: AuthSession, role_name: &str) {
        self.auth_events.extend(session.events);
        self.auth_events.push(AuthEvent {
            action: "session_attached".to_string(),
            role: role_name.to_string(),
            timestamp: Utc::now(),
        });
        self.session = Some(session.context);
        self.role_name = Some(role_name.to_string());
    }

    /// Detaches the authenticated session; later fetches are anonymous
    pub fn clear_auth_context(&mut self) {
        if let Some(role) = &self.role_name {
            self.auth_events.push(AuthEvent {
                action: "session_cleared".to_string(),
                role: role.clone(),
                timestamp: Utc::now(),
            });
        }
        self.session = None;
    }

    /// Runs the breadth-first traversal and returns the result aggregate
    ///
    /// Every non-fatal path returns usable `CrawlResults`, including
    /// interruption. Only a fetch-backend initialization failure surfaces as
    /// an error, and the backend is still closed before it propagates.
    pub async fn crawl(&mut self) -> Result<CrawlResults> {
        let start_url = normalize(&self.start_url);
        let origin = origin_of(&start_url).map_err(|e| ScoutError::InvalidStartUrl {
            url: self.start_url.clone(),
            message: e.to_string(),
        })?;

        let mut state = CrawlState::new(start_url, self.max_pages, self.max_depth);

        // The flag itself drives the loop exit; the handler only logs
        let handler_id = self.interrupt.on_interrupt(|| {
            tracing::info!("Interrupt received, finishing current page");
        });

        let init_result = self.fetcher.init().await;
        if init_result.is_ok() {
            let robots = self.init_robots(&origin, &mut state).await;
            self.run_loop(&mut state, &robots).await;
        }

        // Resource release is unconditional, on every exit path
        self.fetcher.close().await;
        self.interrupt.remove_handler(handler_id);

        if let Err(e) = init_result {
            state.summary.mark_error();
            state.summary.finalize(Utc::now());
            return Err(e);
        }
        state.summary.finalize(Utc::now());

        tracing::info!(
            "Crawl finished: {} pages, {} errors, {} skipped ({:?})",
            state.summary.total_pages,
            state.summary.errors,
            state.summary.skipped,
            state.summary.stop_reason
        );

        Ok(CrawlResults {
            summary: state.summary,
            pages: state.pages,
            forms: state.forms,
            buttons: state.buttons,
            input_fields: state.input_fields,
            auth_events: if self.auth_events.is_empty() {
                None
            } else {
                Some(self.auth_events.clone())
            },
            role_name: self.role_name.clone(),
            warnings: state.warnings,
        })
    }

    /// Best-effort robots.txt setup for the start origin
    ///
    /// Failures degrade to a permissive checker; the warning is both logged
    /// and carried on the results so callers can inspect it.
    async fn init_robots(&mut self, origin: &str, state: &mut CrawlState) -> RobotsChecker {
        let checker = match build_http_client(&self.user_agent) {
            Ok(client) => RobotsChecker::for_origin(&client, origin, &self.user_agent).await,
            Err(e) => {
                tracing::warn!("Could not build robots.txt client: {}", e);
                RobotsChecker::permissive(&self.user_agent)
            }
        };

        if let Some(warning) = checker.warning() {
            state.warnings.push(warning.to_string());
            self.reporter.warn(warning);
        }

        checker
    }

    /// The main traversal loop; sets the terminal stop reason on exit
    async fn run_loop(&mut self, state: &mut CrawlState, robots: &RobotsChecker) {
        let mut limiter = RateLimiter::new(self.rate_interval);

        while !state.queue.is_empty() && !self.interrupt.is_interrupted() {
            if let Some(max) = self.max_pages {
                if state.recorded_pages() >= max {
                    state.summary.mark_max_pages_reached();
                    break;
                }
            }

            // FIFO dequeue keeps strict breadth-first order
            let Some(item) = state.queue.pop_front() else {
                break;
            };

            if !self.filter.should_crawl(&item.url) {
                tracing::debug!("Filtered out: {}", item.url);
                state.summary.increment_skipped();
                continue;
            }

            if !robots.is_allowed(&item.url) {
                tracing::debug!("Disallowed by robots.txt: {}", item.url);
                state.summary.increment_skipped();
                continue;
            }

            if state.redirects.is_loop(&item.url) {
                tracing::warn!("Redirect loop detected for {}", item.url);
                state.summary.increment_errors();
                continue;
            }

            limiter.wait().await;
            self.process_page(state, &item).await;

            self.reporter
                .report(state.recorded_pages(), state.queue.len(), &item.url);
        }

        if self.interrupt.is_interrupted() {
            state.summary.mark_interrupted();
        } else {
            state.summary.mark_completed();
        }
    }

    /// Fetches one queued URL and folds the outcome into the state
    async fn process_page(&mut self, state: &mut CrawlState, item: &QueueItem) {
        let fetched = self.fetcher.fetch(&item.url, self.session.as_ref()).await;

        if (300..400).contains(&fetched.status) {
            state.redirects.record(&item.url, &fetched.final_url);
        }

        // Failed fetches are recorded against the requested URL. The final
        // URL of a rejected cross-origin redirect must not enter the
        // discovered set, or a later URL resolving to the same foreign
        // destination would be miscounted as a duplicate instead of an error.
        if let Some(error) = &fetched.error {
            tracing::debug!(
                "Error page {} (status {}): {}",
                item.url,
                fetched.status,
                error
            );
            state.summary.increment_errors();
            state.pages.push(Page {
                url: item.url.clone(),
                status: fetched.status,
                title: fetched.title.clone(),
                error: Some(error.clone()),
                discovered_at: Utc::now(),
            });
            return;
        }

        // A redirect landing on an already-discovered page is a duplicate,
        // not new surface
        let canonical_final = normalize(&fetched.final_url);
        if canonical_final != item.url && state.discovered.contains(&canonical_final) {
            tracing::debug!(
                "Duplicate via redirect: {} -> {}",
                item.url,
                canonical_final
            );
            state.summary.increment_skipped();
            return;
        }
        state.discovered.insert(canonical_final.clone());

        let succeeded = (200..300).contains(&fetched.status);

        if succeeded {
            state.summary.increment_total_pages();
        } else {
            tracing::debug!("Error page {} (status {})", item.url, fetched.status);
            state.summary.increment_errors();
        }

        state.pages.push(Page {
            url: canonical_final.clone(),
            status: fetched.status,
            title: fetched.title.clone(),
            error: None,
            discovered_at: Utc::now(),
        });

        if !succeeded {
            return;
        }

        let content = self.extractor.extract(&fetched.html, &fetched.final_url);
        state.summary.add_elements(
            content.forms.len() as u64,
            content.buttons.len() as u64,
            content.input_fields.len() as u64,
        );
        state.forms.extend(content.forms);
        state.buttons.extend(content.buttons);
        state.input_fields.extend(content.input_fields);

        let next_depth = item.depth + 1;
        if self.max_depth.map_or(true, |max| next_depth <= max) {
            for link in content.links {
                let canonical = normalize(&link);
                // Discovery-order enqueue; the set guards against re-enqueueing
                if state.discovered.insert(canonical.clone()) {
                    state.queue.push_back(QueueItem {
                        url: canonical,
                        depth: next_depth,
                    });
                }
            }
        }
    }
}
