//! # article_scrape
//!
//! Command-line front end for the extraction library: classifies each input,
//! fetches and extracts it, and prints one JSON envelope per input.
//!
//! ## Usage
//!
//! ```sh
//! article_scrape PMC4924471 https://www.sciencedaily.com/releases/2024/01/240101120000.htm
//! article_scrape --list-sources
//! ```
//!
//! Logs go to stderr; stdout carries only JSON. A failed extraction is still
//! printed as an envelope and does not change the exit code.

use article_scrape::config::ScrapeConfig;
use article_scrape::fetch::HttpFetcher;
use article_scrape::models::ExtractionResult;
use article_scrape::outputs::json;
use article_scrape::pipeline::scrape_article;
use article_scrape::scrapers::ProfileTable;
use article_scrape::utils::{ensure_writable_dir, truncate_for_log};
use clap::Parser;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(inputs = args.inputs.len(), ?args.json_output_dir, ?args.config, "Parsed CLI arguments");

    let profiles = ProfileTable::standard()?;

    if args.list_sources {
        print_json(&profiles.supported_sources(), args.pretty)?;
        return Ok(());
    }

    let config = ScrapeConfig::load(args.config.as_deref(), args.overrides()).await?;
    info!(
        timeout_secs = config.timeout_secs,
        render_proxy = config.render_proxy.enabled,
        "Loaded configuration"
    );

    // Early check: output dir must be writable before any network work
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let fetcher = HttpFetcher::new(&config)?;
    let concurrency = args.concurrency.max(1);
    info!(inputs = args.inputs.len(), concurrency, "Starting extraction");

    let mut results: Vec<(usize, &str, ExtractionResult)> = stream::iter(args.inputs.iter().enumerate())
        .map(|(i, input)| {
            let fetcher = &fetcher;
            let profiles = &profiles;
            async move {
                let result = scrape_article(fetcher, profiles, input).await;
                (i, input.as_str(), result)
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    // Report in input order regardless of completion order
    results.sort_by_key(|(i, _, _)| *i);

    let mut failed = 0usize;
    for (_, input, result) in &results {
        if let Some(message) = result.message() {
            failed += 1;
            warn!(input = %truncate_for_log(input, 120), message, "Input failed");
        }

        print_json(result, args.pretty)?;

        if let Some(dir) = &args.json_output_dir {
            if let Err(e) = json::write_result(result, input, dir).await {
                error!(input = %truncate_for_log(input, 120), error = %e, "Failed to write JSON envelope");
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        total = results.len(),
        successful = results.len() - failed,
        failed,
        "Execution complete"
    );

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<(), serde_json::Error> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
