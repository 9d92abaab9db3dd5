//! Core data types for the crawl engine and its collaborators

use crate::state::CrawlSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A URL queued for fetching with its BFS distance from the start URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    /// Canonical URL string
    pub url: String,
    /// 0 = start page
    pub depth: u32,
}

/// One visited page, successful or not
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub url: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Present when the fetch failed; such pages count as errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub discovered_at: DateTime<Utc>,
}

/// A form discovered on a page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub page_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub method: String,
}

/// A button (or button-like input) discovered on a page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub page_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub button_type: String,
}

/// An input field discovered on a page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    pub page_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub input_type: String,
    pub required: bool,
}

/// Result of one page fetch, as reported by the page fetcher
///
/// A fetch never fails at the interface level: transport errors are carried
/// in `error` with a heuristically inferred status so the engine can record
/// them as error pages without aborting the crawl.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    /// URL the request resolved to after redirects
    pub final_url: String,
    pub html: String,
    pub title: Option<String>,
    pub error: Option<String>,
}

/// Structured elements extracted from one page's markup
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// Same-origin absolute URLs found on the page
    pub links: Vec<String>,
    pub forms: Vec<Form>,
    pub buttons: Vec<Button>,
    pub input_fields: Vec<InputField>,
}

/// Opaque session context produced by an external authenticator
///
/// The engine never inspects it; the page fetcher applies the headers to
/// each request so fetches carry the authenticated session.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub headers: Vec<(String, String)>,
}

/// A recorded authentication lifecycle event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEvent {
    pub action: String,
    pub role: String,
    pub timestamp: DateTime<Utc>,
}

/// A ready-to-use session plus the events that produced it
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub context: SessionContext,
    pub events: Vec<AuthEvent>,
}

/// The immutable output aggregate of one crawl
///
/// This is the crawl's externally visible artifact; its serialized shape is
/// stable for downstream documentation and test-case generators.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResults {
    pub summary: CrawlSummary,
    pub pages: Vec<Page>,
    pub forms: Vec<Form>,
    pub buttons: Vec<Button>,
    pub input_fields: Vec<InputField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_events: Option<Vec<AuthEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    /// Degraded-mode warnings (robots.txt fallback and similar); carried on
    /// the value for inspection but not part of the serialized artifact
    #[serde(skip)]
    pub warnings: Vec<String>,
}
