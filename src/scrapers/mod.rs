//! Source profiles and the generic extraction engine that runs them.
//!
//! Every source is described as data: a [`SourceProfile`] lists, per field,
//! an ordered chain of query groups, plus an optional full-text plan. One
//! engine ([`extract`]) runs any profile, so adding a source means adding a
//! table, not a code path.
//!
//! # Supported Sources
//!
//! | Source | Module | Kind | Notes |
//! |--------|--------|------|-------|
//! | medRxiv | [`medrxiv`] | preprint repository | Full text on a separate `.full-text` page |
//! | PubMed Central | [`pmc`] | biomedical repository | Bare `PMC` ids accepted; placeholders for missing content |
//! | ScienceDaily | [`sciencedaily`] | news release | Positional byline; sibling walk for the story |
//!
//! # Common Patterns
//!
//! - Metadata comes from `citation_*` meta tags where the source has them.
//! - A field keeps the value of the first query group that matched anything.
//! - HTML is parsed and dropped inside synchronous functions, so no parsed
//!   document is ever held across a network await.

pub mod assemble;
pub mod medrxiv;
pub mod pmc;
pub mod profile;
pub mod query;
pub mod sciencedaily;
pub mod walk;

use crate::dedup::Deduplicator;
use crate::models::{ExtractedDraft, Field, RawDocument};
use profile::{FullTextPage, FullTextPlan};
use scraper::Html;
use tracing::{debug, instrument};

pub use profile::{ProfileTable, SourceProfile};

/// Run every field rule of `profile` against `doc`.
///
/// When the profile assembles its full text from the same page, that runs
/// here too. Fields already set on entry are left alone.
#[instrument(level = "debug", skip_all, fields(profile = %profile.kind, url = %doc.url))]
pub fn extract(profile: &SourceProfile, doc: &RawDocument) -> ExtractedDraft {
    let mut draft = ExtractedDraft::new();
    extract_into(profile, doc, &mut draft);
    draft
}

/// Like [`extract`], filling an existing draft.
pub fn extract_into(profile: &SourceProfile, doc: &RawDocument, draft: &mut ExtractedDraft) {
    let html = Html::parse_document(&doc.html);

    for rule in &profile.fields {
        if !draft.is_empty(rule.field) {
            continue;
        }
        let outcome = rule.resolve(&html);
        if outcome.groups_tried > 1 && outcome.value.is_some() {
            debug!(field = %rule.field, group = outcome.groups_tried, "Primary group empty; fallback matched");
        }
        match outcome.value {
            Some(value) => {
                draft.set_if_empty(rule.field, value);
            }
            None => {
                if let Some(placeholder) = rule.placeholder {
                    debug!(field = %rule.field, "No match; using placeholder");
                    draft.set_if_empty(rule.field, placeholder);
                }
            }
        }
    }

    if let Some(plan) = &profile.full_text {
        if plan.page == FullTextPage::SamePage {
            if let Some(text) = assemble_full_text(plan, &html) {
                draft.set_if_empty(Field::FullText, text);
            }
        }
    }
}

/// Full text of a separately fetched page, or `None` when nothing usable
/// was found.
#[instrument(level = "debug", skip_all, fields(url = %doc.url))]
pub fn extract_full_text(plan: &FullTextPlan, doc: &RawDocument) -> Option<String> {
    let html = Html::parse_document(&doc.html);
    assemble_full_text(plan, &html)
}

fn assemble_full_text(plan: &FullTextPlan, html: &Html) -> Option<String> {
    let mut dedup = Deduplicator::new();
    let assembled = assemble::assemble(html, &plan.sections, &mut dedup);
    if assembled.paragraphs > 0 {
        return Some(assembled.text());
    }

    plan.fallback.iter().find_map(|group| {
        let values = group.run(html);
        if values.is_empty() {
            None
        } else {
            debug!("Section assembly empty; fallback group matched");
            Some(group.join.apply(&values))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PageVariant, SourceKind};

    const FULL_TEXT_PAGE: &str = r#"<div class="article fulltext-view">
        <div class="section abstract" id="abstract-1"><h2>Abstract</h2><p>Abstract paragraph that is long.</p></div>
        <div class="section" id="sec-1"><h2>Introduction</h2><p>Vaccination coverage varies widely by county.</p></div>
        <div class="section" id="sec-2"><h2>Methods</h2><p>We linked registry data to census tracts.</p>
          <div class="section" id="sec-2-1"><h3>Data</h3><p>We linked registry data to census tracts.</p></div>
        </div>
        <div class="section ref-list"><h2>References</h2><p>1. Some reference entry long enough.</p></div>
    </div>"#;

    #[test]
    fn test_extract_full_text_from_sections() {
        let table = ProfileTable::standard().unwrap();
        let medrxiv = table.get(SourceKind::PreprintRepository).unwrap();
        let plan = medrxiv.full_text.as_ref().unwrap();
        let doc = RawDocument::new("https://www.medrxiv.org/x.full-text", PageVariant::FullText, FULL_TEXT_PAGE);

        let text = extract_full_text(plan, &doc).unwrap();
        assert_eq!(
            text,
            "## Introduction\n\nVaccination coverage varies widely by county.\n\n## Methods\n\nWe linked registry data to census tracts.\n\n## Data"
        );
    }

    #[test]
    fn test_extract_full_text_fallback_group() {
        let table = ProfileTable::standard().unwrap();
        let medrxiv = table.get(SourceKind::PreprintRepository).unwrap();
        let plan = medrxiv.full_text.as_ref().unwrap();
        let doc = RawDocument::new(
            "https://www.medrxiv.org/x.full-text",
            PageVariant::FullText,
            r#"<div class="article fulltext-view"><p>Unsectioned body text of the preprint.</p><p>tiny</p></div>"#,
        );
        assert_eq!(
            extract_full_text(plan, &doc).as_deref(),
            Some("Unsectioned body text of the preprint.")
        );
    }

    #[test]
    fn test_extract_full_text_nothing_found() {
        let table = ProfileTable::standard().unwrap();
        let medrxiv = table.get(SourceKind::PreprintRepository).unwrap();
        let plan = medrxiv.full_text.as_ref().unwrap();
        let doc = RawDocument::new("https://www.medrxiv.org/x.full-text", PageVariant::FullText, "<p>no</p>");
        assert_eq!(extract_full_text(plan, &doc), None);
    }

    #[test]
    fn test_extract_into_keeps_preset_fields() {
        let table = ProfileTable::standard().unwrap();
        let pmc = table.get(SourceKind::BiomedicalRepository).unwrap();
        let doc = RawDocument::new(
            "https://pmc.ncbi.nlm.nih.gov/articles/PMC1/",
            PageVariant::Primary,
            r#"<meta name="citation_title" content="From page">"#,
        );
        let mut draft = ExtractedDraft::new();
        draft.set_if_empty(Field::Title, "Preset");
        extract_into(pmc, &doc, &mut draft);
        assert_eq!(draft.get(Field::Title), "Preset");
    }
}
