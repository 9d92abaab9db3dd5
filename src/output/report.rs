//! Human-readable crawl summary printed to stdout

use crate::crawler::CrawlResults;
use crate::state::StopReason;

/// Prints a formatted summary of the crawl to stdout
///
/// # Arguments
///
/// * `results` - The crawl result aggregate
pub fn print_summary(results: &CrawlResults) {
    let summary = &results.summary;

    println!("=== Crawl Summary ===\n");

    println!("Outcome:");
    println!("  Stop reason: {}", stop_reason_label(summary.stop_reason));
    if summary.interrupted {
        println!("  Interrupted: yes (partial results preserved)");
    }
    if let Some(duration) = summary.duration_seconds {
        println!("  Duration: {}s", duration);
    }
    println!();

    println!("Pages:");
    println!("  Crawled: {}", summary.total_pages);
    println!("  Errors: {}", summary.errors);
    println!("  Skipped: {}", summary.skipped);
    if let Some(max_pages) = summary.max_pages_limit {
        println!("  Page limit: {}", max_pages);
    }
    if let Some(max_depth) = summary.max_depth_limit {
        println!("  Depth limit: {}", max_depth);
    }
    println!();

    println!("Surface Elements:");
    println!("  Forms: {}", summary.total_forms);
    println!("  Buttons: {}", summary.total_buttons);
    println!("  Input fields: {}", summary.total_input_fields);

    if let Some(role) = &results.role_name {
        println!();
        println!("Authenticated as: {}", role);
    }

    if !results.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &results.warnings {
            println!("  - {}", warning);
        }
    }
}

fn stop_reason_label(reason: Option<StopReason>) -> &'static str {
    match reason {
        Some(StopReason::Completed) => "completed",
        Some(StopReason::MaxPagesReached) => "max pages reached",
        Some(StopReason::Interrupted) => "interrupted",
        Some(StopReason::Error) => "error",
        None => "unknown",
    }
}
