//! medRxiv preprint profile.
//!
//! medRxiv serves the abstract and the full text on two pages: the article
//! URL, and the same URL with `.full-text` appended. Either may be given as
//! input. Metadata comes from Highwire `citation_*` meta tags, with class
//! based fallbacks for pages that omit them.
//!
//! When the full-text page cannot be fetched or yields nothing, the abstract
//! is used as the full text.

use crate::error::ScrapeError;
use crate::models::{Field, SourceKind};
use crate::scrapers::assemble::{HeadingStyle, MIN_PARAGRAPH_CHARS, SectionPlan};
use crate::scrapers::profile::{FullTextPage, FullTextPlan, MissingFullText, SourceProfile};
use crate::scrapers::query::{FieldRule, Join, Query, QueryGroup};

pub const FULL_TEXT_SUFFIX: &str = ".full-text";

pub fn profile() -> Result<SourceProfile, ScrapeError> {
    let fields = vec![
        FieldRule::new(
            Field::Title,
            vec![QueryGroup::single(Query::text("#page-title")?, Join::Space)],
        ),
        FieldRule::new(
            Field::Authors,
            vec![
                QueryGroup::single(Query::meta("citation_author")?, Join::Comma),
                QueryGroup::single(Query::text(".highwire-citation-authors")?, Join::Space),
            ],
        ),
        FieldRule::new(
            Field::Doi,
            vec![QueryGroup::single(Query::meta("citation_doi")?, Join::First)],
        ),
        FieldRule::new(
            Field::Date,
            vec![
                QueryGroup::single(Query::meta("citation_publication_date")?, Join::First),
                QueryGroup::single(Query::meta("citation_online_date")?, Join::First),
            ],
        ),
        FieldRule::new(
            Field::Abstract,
            vec![
                QueryGroup::single(Query::text(".section.abstract p")?, Join::Paragraphs)
                    .min_len(MIN_PARAGRAPH_CHARS),
                QueryGroup::single(Query::text(r#"div[class*="abstract"] p"#)?, Join::Paragraphs)
                    .min_len(MIN_PARAGRAPH_CHARS),
            ],
        ),
        FieldRule::new(
            Field::Keywords,
            vec![QueryGroup::single(Query::meta("citation_keywords")?, Join::Comma)],
        ),
        FieldRule::new(
            Field::PdfUrl,
            vec![QueryGroup::single(Query::meta("citation_pdf_url")?, Join::First)],
        ),
    ];

    let full_text = FullTextPlan {
        page: FullTextPage::Suffix(FULL_TEXT_SUFFIX),
        sections: SectionPlan::new(".section", HeadingStyle::Markdown(2))?,
        fallback: vec![
            QueryGroup::single(Query::text(".article.fulltext-view p")?, Join::Paragraphs)
                .min_len(MIN_PARAGRAPH_CHARS),
        ],
        on_missing: MissingFullText::CopyField(Field::Abstract),
    };

    Ok(SourceProfile {
        kind: SourceKind::PreprintRepository,
        name: "medRxiv",
        pattern: "medrxiv.org",
        example: "https://www.medrxiv.org/content/...",
        domains: vec!["medrxiv.org"],
        identifier: None,
        fields,
        full_text: Some(full_text),
        essential: vec![Field::Title],
        narrative: vec![Field::Abstract, Field::FullText],
    })
}
