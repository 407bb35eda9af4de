//! One extraction run: input string in, [`ExtractionResult`] out.
//!
//! ```text
//! classify -> fetch primary -> extract -> fetch full text (optional)
//!          -> assemble -> normalize -> envelope
//! ```
//!
//! A run owns its documents, draft and deduplicator; nothing is shared
//! between runs except the read-only [`ProfileTable`]. The primary fetch is
//! fatal on failure. A failed full-text fetch only degrades the result.

use crate::classify::classify_input;
use crate::error::ScrapeError;
use crate::fetch::Fetcher;
use crate::models::{ExtractionResult, Field, NormalizedArticle, PageVariant};
use crate::scrapers::profile::{FullTextPage, MissingFullText, SourceProfile};
use crate::scrapers::{self, ProfileTable};
use itertools::Itertools;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Scrape one URL or identifier. Always returns exactly one outcome.
#[instrument(level = "info", skip(fetcher, profiles))]
pub async fn scrape_article<F: Fetcher>(
    fetcher: &F,
    profiles: &ProfileTable,
    input: &str,
) -> ExtractionResult {
    let t0 = Instant::now();
    match run(fetcher, profiles, input).await {
        Ok(article) => {
            info!(
                profile = %article.profile,
                has_abstract = !article.abstract_text.is_empty(),
                has_full_text = !article.full_text.is_empty(),
                has_summary = !article.summary.is_empty(),
                full_text_chars = article.full_text.chars().count(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Extraction succeeded"
            );
            ExtractionResult::Success(article)
        }
        Err(e) => {
            warn!(error = %e, elapsed_ms = t0.elapsed().as_millis() as u64, "Extraction failed");
            e.into_result()
        }
    }
}

async fn run<F: Fetcher>(
    fetcher: &F,
    profiles: &ProfileTable,
    input: &str,
) -> Result<NormalizedArticle, ScrapeError> {
    let kind = classify_input(profiles, input)?;
    let profile = profiles.get(kind).ok_or(ScrapeError::MissingProfile(kind))?;
    let urls = profile.resolve(input);
    info!(%kind, source = profile.name, primary = %urls.primary, "Resolved input");

    let primary = fetcher
        .fetch(&urls.primary, PageVariant::Primary)
        .await
        .map_err(|error| ScrapeError::Retrieval {
            source_name: profile.name,
            error,
        })?;

    let mut draft = scrapers::extract(profile, &primary);
    drop(primary);

    if let (Some(rule), Some(id)) = (&profile.identifier, &urls.identifier) {
        draft.set_if_empty(rule.field, id.as_str());
    }

    if let Some(plan) = &profile.full_text {
        if let (FullTextPage::Suffix(_), Some(full_text_url)) = (plan.page, &urls.full_text) {
            draft.set_if_empty(Field::AbstractUrl, urls.primary.as_str());
            draft.set_if_empty(Field::FullTextUrl, full_text_url.as_str());

            match fetcher.fetch(full_text_url, PageVariant::FullText).await {
                Ok(doc) => {
                    if let Some(text) = scrapers::extract_full_text(plan, &doc) {
                        draft.set_if_empty(Field::FullText, text);
                    }
                }
                Err(e) => {
                    warn!(url = %full_text_url, error = %e, "Full-text page unavailable; using abstract only");
                }
            }
        }

        if draft.is_empty(Field::FullText) {
            let fallback = match plan.on_missing {
                MissingFullText::CopyField(field) => draft.get(field).to_string(),
                MissingFullText::Placeholder(text) => text.to_string(),
            };
            draft.set_if_empty(Field::FullText, fallback);
        }
    }

    let article = draft.finalize(kind, &urls.primary);
    check_required(profile, &article)?;
    Ok(article)
}

/// Fail when an essential field is empty, or when every narrative field is.
fn check_required(profile: &SourceProfile, article: &NormalizedArticle) -> Result<(), ScrapeError> {
    if let Some(field) = profile
        .essential
        .iter()
        .find(|f| article.get(**f).is_empty())
    {
        return Err(ScrapeError::ExtractionEmpty {
            source_name: profile.name,
            field: *field,
        });
    }

    if !profile.narrative.is_empty() && profile.narrative.iter().all(|f| article.get(*f).is_empty()) {
        return Err(ScrapeError::NarrativeEmpty {
            source_name: profile.name,
            fields: profile.narrative.iter().map(Field::name).join(" or "),
        });
    }

    Ok(())
}
