//! JSON persistence of crawl results
//!
//! The serialized shape (summary, pages, forms, buttons, inputFields, plus
//! optional authEvents/roleName) is the crawl's externally visible artifact
//! and stays stable for downstream doc/test generators.

use crate::crawler::CrawlResults;
use crate::Result;
use std::path::Path;

/// Writes crawl results to a pretty-printed JSON file
///
/// Parent directories are created as needed. Partial results from an
/// interrupted crawl are persisted the same way as complete ones.
///
/// # Arguments
///
/// * `results` - The crawl result aggregate
/// * `path` - Destination file path
pub fn write_results(results: &CrawlResults, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;

    tracing::info!("Results written to {}", path.display());
    Ok(())
}
