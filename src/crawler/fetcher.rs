//! Default reqwest-backed page fetcher
//!
//! This module implements the `PageFetcher` collaborator contract:
//! - Manual redirect handling (max 10 hops), with cross-origin redirects
//!   rejected rather than followed
//! - HTTP 429 retried up to 3 additional attempts with exponential backoff
//! - Transport failures converted to error pages with a status inferred
//!   from the error message, so a single bad URL never aborts the crawl

use crate::crawler::limiter::exponential_backoff;
use crate::crawler::traits::PageFetcher;
use crate::crawler::types::{FetchedPage, SessionContext};
use crate::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client, Response, StatusCode};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops before the chain is reported as an error
const MAX_REDIRECT_HOPS: usize = 10;

/// Additional attempts after an HTTP 429 response
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Base delay for the 429 retry backoff
const RETRY_BASE_MS: u64 = 1000;

/// Builds an HTTP client with the crawler's user agent and timeouts
///
/// Redirects are handled manually so the engine can observe every hop.
pub fn build_http_client(user_agent: &str) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Default `PageFetcher` over plain HTTP
///
/// The client is created in `init` and dropped in `close`, mirroring the
/// lifecycle of a browser-automation backend: initialization failures are
/// fatal, per-page failures are not.
pub struct HttpFetcher {
    user_agent: String,
    client: Option<Client>,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            client: None,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn init(&mut self) -> Result<()> {
        let client = build_http_client(&self.user_agent)
            .map_err(|e| ScoutError::FetcherInit(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn fetch(&mut self, url: &str, session: Option<&SessionContext>) -> FetchedPage {
        let Some(client) = self.client.clone() else {
            return error_page(url, "Fetcher used before init".to_string());
        };
        fetch_with_redirects(&client, url, session).await
    }

    async fn close(&mut self) {
        self.client = None;
    }
}

/// Follows same-origin redirects manually, up to `MAX_REDIRECT_HOPS`
async fn fetch_with_redirects(
    client: &Client,
    url: &str,
    session: Option<&SessionContext>,
) -> FetchedPage {
    let request_origin = Url::parse(url).ok().map(|u| u.origin());
    let mut current = url.to_string();
    let mut last_redirect_status = 0u16;

    for _ in 0..=MAX_REDIRECT_HOPS {
        let response = match send_with_retries(client, &current, session).await {
            Ok(r) => r,
            Err(e) => return error_page(url, e.to_string()),
        };

        let status = response.status().as_u16();

        if (300..400).contains(&status) {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let Some(location) = location else {
                return FetchedPage {
                    status,
                    final_url: current,
                    html: String::new(),
                    title: None,
                    error: Some("Redirect without Location header".to_string()),
                };
            };

            let destination = match Url::parse(&current).and_then(|base| base.join(&location)) {
                Ok(d) => d,
                Err(e) => {
                    return FetchedPage {
                        status,
                        final_url: location,
                        html: String::new(),
                        title: None,
                        error: Some(format!("Unresolvable redirect target: {}", e)),
                    }
                }
            };

            // Cross-origin redirects are reported as errors, never followed
            if request_origin.as_ref() != Some(&destination.origin()) {
                return FetchedPage {
                    status,
                    final_url: destination.to_string(),
                    html: String::new(),
                    title: None,
                    error: Some(format!("Cross-origin redirect to {}", destination)),
                };
            }

            last_redirect_status = status;
            current = destination.to_string();
            continue;
        }

        let final_url = response.url().to_string();

        if status >= 400 {
            return FetchedPage {
                status,
                final_url,
                html: String::new(),
                title: None,
                error: None,
            };
        }

        let html = match response.text().await {
            Ok(body) => body,
            Err(e) => return error_page(url, e.to_string()),
        };
        let title = extract_title(&html);

        return FetchedPage {
            status,
            final_url,
            html,
            title,
            error: None,
        };
    }

    FetchedPage {
        status: last_redirect_status,
        final_url: current,
        html: String::new(),
        title: None,
        error: Some("Redirect limit exceeded".to_string()),
    }
}

/// Sends a GET, retrying HTTP 429 with exponential backoff
async fn send_with_retries(
    client: &Client,
    url: &str,
    session: Option<&SessionContext>,
) -> reqwest::Result<Response> {
    let mut attempt = 0u32;

    loop {
        let mut request = client.get(url);
        if let Some(session) = session {
            for (name, value) in &session.headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        let response = request.send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_RATE_LIMIT_RETRIES {
            let delay = exponential_backoff(attempt, RETRY_BASE_MS);
            tracing::debug!("HTTP 429 from {}, retrying in {}ms", url, delay);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            attempt += 1;
            continue;
        }

        return Ok(response);
    }
}

/// Converts a fetch failure into an error page record
pub fn error_page(url: &str, message: String) -> FetchedPage {
    FetchedPage {
        status: infer_status_from_error(&message),
        final_url: url.to_string(),
        html: String::new(),
        title: None,
        error: Some(message),
    }
}

/// Infers an HTTP status from an error message
///
/// Known status substrings (404, 403, 500, 408) map to those codes;
/// anything else maps to 0.
pub fn infer_status_from_error(message: &str) -> u16 {
    for code in [404u16, 403, 500, 408] {
        if message.contains(&code.to_string()) {
            return code;
        }
    }
    0
}

/// Extracts the page title from raw markup
fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
