//! # article_scrape
//!
//! Turns a URL or bare identifier from a supported scholarly or
//! science-news source into one normalized article record, or a typed
//! failure explaining why it could not.
//!
//! ## Sources
//!
//! - **medRxiv** preprints, with full text from the `.full-text` page
//! - **PubMed Central** articles, by URL or bare `PMC` id
//! - **ScienceDaily** news releases
//!
//! ## Architecture
//!
//! 1. **Classify**: match the input against each profile's domains, then
//!    identifier patterns ([`classify`])
//! 2. **Fetch**: one GET for the primary page ([`fetch`])
//! 3. **Extract**: run the profile's field rules with fallback groups
//!    ([`scrapers`])
//! 4. **Full text**: fetch and assemble the secondary page when the profile
//!    has one, degrading to the abstract on failure
//! 5. **Normalize**: collapse whitespace and strip control characters in
//!    every field ([`normalize`])
//!
//! [`pipeline::scrape_article`] runs all of it and always returns an
//! [`models::ExtractionResult`].
//!
//! ```no_run
//! use article_scrape::config::ScrapeConfig;
//! use article_scrape::fetch::HttpFetcher;
//! use article_scrape::pipeline::scrape_article;
//! use article_scrape::scrapers::ProfileTable;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let profiles = ProfileTable::standard()?;
//! let fetcher = HttpFetcher::new(&ScrapeConfig::default())?;
//! let result = scrape_article(&fetcher, &profiles, "PMC4924471").await;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod pipeline;
pub mod scrapers;
pub mod utils;
