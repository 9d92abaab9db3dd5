//! DOM extraction of links and interactive surface elements
//!
//! This module handles parsing HTML content to extract:
//! - Same-origin links to follow (from <a> tags)
//! - Forms, with action and method
//! - Buttons and button-like inputs
//! - Input fields (input, textarea, select)

use crate::crawler::traits::ContentExtractor;
use crate::crawler::types::{Button, ExtractedContent, Form, InputField};
use crate::url::same_origin;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Default `ContentExtractor` backed by the scraper crate
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - `<a href="..." download>`
/// - Links resolving to a different origin than the page
///
/// **Note:** `rel="nofollow"` links ARE followed
#[derive(Debug, Default)]
pub struct DomExtractor;

impl DomExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ContentExtractor for DomExtractor {
    fn extract(&self, html: &str, page_url: &str) -> ExtractedContent {
        let base_url = match Url::parse(page_url) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("Cannot resolve links against {}: {}", page_url, e);
                return ExtractedContent::default();
            }
        };

        let document = Html::parse_document(html);

        ExtractedContent {
            links: extract_links(&document, &base_url),
            forms: extract_forms(&document, page_url),
            buttons: extract_buttons(&document, page_url),
            input_fields: extract_input_fields(&document, page_url),
        }
    }
}

/// Extracts all followable same-origin links from the document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute same-origin URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs or non-HTTP(S) URLs after resolution
/// - URLs on a different origin than the base
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
                return None;
            }
            if !same_origin(absolute_url.as_str(), base_url.as_str()) {
                return None;
            }
            Some(absolute_url.to_string())
        }
        Err(_) => None,
    }
}

/// Extracts all forms with their action and method
///
/// Method defaults to GET when absent and is uppercased for consistency.
fn extract_forms(document: &Html, page_url: &str) -> Vec<Form> {
    let mut forms = Vec::new();

    if let Ok(selector) = Selector::parse("form") {
        for element in document.select(&selector) {
            let action = element
                .value()
                .attr("action")
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string);
            let method = element
                .value()
                .attr("method")
                .map(|m| m.trim().to_uppercase())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "GET".to_string());

            forms.push(Form {
                page_url: page_url.to_string(),
                action,
                method,
            });
        }
    }

    forms
}

/// Extracts buttons and button-like inputs
///
/// Covers `<button>` elements plus `<input>` of type submit, button, and
/// reset. Type defaults to "submit" for bare `<button>` elements.
fn extract_buttons(document: &Html, page_url: &str) -> Vec<Button> {
    let mut buttons = Vec::new();

    if let Ok(selector) = Selector::parse("button") {
        for element in document.select(&selector) {
            let text = element_text(&element);
            let button_type = element
                .value()
                .attr("type")
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "submit".to_string());

            buttons.push(Button {
                page_url: page_url.to_string(),
                text,
                button_type,
            });
        }
    }

    if let Ok(selector) = Selector::parse(
        "input[type='submit'], input[type='button'], input[type='reset']",
    ) {
        for element in document.select(&selector) {
            let text = element
                .value()
                .attr("value")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            let button_type = element
                .value()
                .attr("type")
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| "button".to_string());

            buttons.push(Button {
                page_url: page_url.to_string(),
                text,
                button_type,
            });
        }
    }

    buttons
}

/// Extracts input fields from input, textarea, and select elements
///
/// Button-like inputs (submit, button, reset) are reported as buttons, not
/// input fields.
fn extract_input_fields(document: &Html, page_url: &str) -> Vec<InputField> {
    let mut fields = Vec::new();

    if let Ok(selector) = Selector::parse("input") {
        for element in document.select(&selector) {
            let input_type = element
                .value()
                .attr("type")
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string());

            if matches!(input_type.as_str(), "submit" | "button" | "reset") {
                continue;
            }

            fields.push(InputField {
                page_url: page_url.to_string(),
                name: element_name(&element),
                input_type,
                required: element.value().attr("required").is_some(),
            });
        }
    }

    if let Ok(selector) = Selector::parse("textarea") {
        for element in document.select(&selector) {
            fields.push(InputField {
                page_url: page_url.to_string(),
                name: element_name(&element),
                input_type: "textarea".to_string(),
                required: element.value().attr("required").is_some(),
            });
        }
    }

    if let Ok(selector) = Selector::parse("select") {
        for element in document.select(&selector) {
            fields.push(InputField {
                page_url: page_url.to_string(),
                name: element_name(&element),
                input_type: "select".to_string(),
                required: element.value().attr("required").is_some(),
            });
        }
    }

    fields
}

fn element_name(element: &ElementRef) -> Option<String> {
    element
        .value()
        .attr("name")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn element_text(element: &ElementRef) -> Option<String> {
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
