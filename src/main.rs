//! Surface-Scout main entry point
//!
//! This is the command-line interface for the Surface-Scout web application
//! surface mapper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use surface_scout::config::{load_config_with_hash, Config};
use surface_scout::crawler::run_crawl;
use surface_scout::output::{print_summary, write_results};
use surface_scout::InterruptController;
use tracing_subscriber::EnvFilter;

/// Surface-Scout: A polite web application surface mapper
///
/// Surface-Scout crawls a web application breadth-first while respecting
/// robots.txt, rate limits, and page/depth caps, and records the pages,
/// forms, buttons, and input fields it finds.
#[derive(Parser, Debug)]
#[command(name = "surface-scout")]
#[command(version)]
#[command(about = "A polite web application surface mapper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Write results to this path instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(&config, cli.output).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("surface_scout=info,warn"),
            1 => EnvFilter::new("surface_scout=debug,info"),
            2 => EnvFilter::new("surface_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Surface-Scout Dry Run ===\n");

    println!("Start URL: {}", config.start_url);

    println!("\nCrawler Configuration:");
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unbounded"),
    }
    match config.crawler.max_depth {
        Some(max) => println!("  Max depth: {}", max),
        None => println!("  Max depth: unbounded"),
    }
    println!("  Rate interval: {}ms", config.crawler.rate_interval_ms);

    println!(
        "\nInclude Patterns ({}):",
        config.crawler.include_patterns.len()
    );
    for pattern in &config.crawler.include_patterns {
        println!("  - {}", pattern);
    }

    println!(
        "\nExclude Patterns ({}):",
        config.crawler.exclude_patterns.len()
    );
    for pattern in &config.crawler.exclude_patterns {
        println!("  - {}", pattern);
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent_string());

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling from {}", config.start_url);

    Ok(())
}

/// Handles the main crawl operation
///
/// A first Ctrl-C requests a cooperative stop; the in-flight page finishes
/// and partial results are written. A second Ctrl-C aborts immediately with
/// exit status 130.
async fn handle_crawl(
    config: &Config,
    output_override: Option<PathBuf>,
) -> anyhow::Result<()> {
    let interrupt = Arc::new(InterruptController::new());

    let signal_interrupt = Arc::clone(&interrupt);
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::warn!("Failed to listen for Ctrl-C");
                return;
            }
            if !signal_interrupt.trigger() {
                // Second signal: forceful abort, no cleanup
                eprintln!("Second interrupt received, aborting");
                std::process::exit(130);
            }
            tracing::info!("Interrupt requested, stopping after the current page");
        }
    });

    tracing::info!("Starting crawl of {}", config.start_url);

    let results = match run_crawl(config, interrupt).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    // Partial results from an interrupted crawl are persisted too
    let results_path = output_override
        .unwrap_or_else(|| PathBuf::from(&config.output.results_path));
    write_results(&results, &results_path)
        .with_context(|| format!("failed to write results to {}", results_path.display()))?;

    print_summary(&results);

    Ok(())
}
