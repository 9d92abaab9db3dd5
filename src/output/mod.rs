//! Output module for persisting and reporting crawl results
//!
//! This module handles:
//! - Writing the stable JSON results artifact
//! - Printing a human-readable summary to stdout

mod json;
mod report;

pub use json::write_results;
pub use report::print_summary;
