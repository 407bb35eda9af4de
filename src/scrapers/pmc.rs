//! PubMed Central profile.
//!
//! Accepts article URLs on `pmc.ncbi.nlm.nih.gov` (and the legacy
//! `www.ncbi.nlm.nih.gov/pmc/` paths) or a bare `PMC` identifier, which is
//! resolved to the canonical article URL. Abstract, keywords and the
//! sectioned full text all come from the single article page.
//!
//! Missing abstract, keywords or full text are replaced by placeholder
//! strings. The title is the only field whose absence fails the run.

use crate::error::ScrapeError;
use crate::models::{Field, SourceKind};
use crate::scrapers::assemble::{HeadingStyle, MIN_PARAGRAPH_CHARS, SectionPlan};
use crate::scrapers::profile::{FullTextPage, FullTextPlan, IdentifierRule, MissingFullText, SourceProfile};
use crate::scrapers::query::{Derive, FieldRule, Join, Query, QueryGroup};
use regex::Regex;

pub const ARTICLE_URL_TEMPLATE: &str = "https://pmc.ncbi.nlm.nih.gov/articles/{id}/";

pub const NO_ABSTRACT: &str = "No abstract available for this article.";
pub const NO_KEYWORDS: &str = "No keywords.";
pub const NO_FULL_TEXT: &str = "Full text could not be extracted.";

fn identifier_rule() -> Result<IdentifierRule, ScrapeError> {
    let compile = |pattern: &str| {
        Regex::new(pattern).map_err(|_| ScrapeError::InvalidPattern(pattern.to_string()))
    };
    Ok(IdentifierRule {
        exact: compile(r"(?i)^PMC\d+$")?,
        embedded: compile(r"(?i)PMC\d+")?,
        url_template: ARTICLE_URL_TEMPLATE,
        field: Field::PmcId,
    })
}

pub fn profile() -> Result<SourceProfile, ScrapeError> {
    let fields = vec![
        FieldRule::new(
            Field::Title,
            vec![
                QueryGroup::single(Query::meta("citation_title")?, Join::First),
                QueryGroup::single(Query::text("h1.content-title")?, Join::Space),
                QueryGroup::single(Query::text(r#"h1[class*="article-title"]"#)?, Join::Space),
            ],
        ),
        FieldRule::new(
            Field::Authors,
            vec![QueryGroup::single(Query::meta("citation_author")?, Join::Comma)],
        ),
        FieldRule::new(
            Field::Journal,
            vec![QueryGroup::single(Query::meta("citation_journal_title")?, Join::First)],
        ),
        FieldRule::new(
            Field::Year,
            vec![QueryGroup::single(Query::meta("citation_publication_date")?, Join::First)],
        )
        .derive(Derive::Year),
        FieldRule::new(
            Field::Pmid,
            vec![QueryGroup::single(Query::meta("citation_pmid")?, Join::First)],
        ),
        FieldRule::new(
            Field::Doi,
            vec![QueryGroup::single(Query::meta("citation_doi")?, Join::First)],
        ),
        FieldRule::new(
            Field::Abstract,
            vec![
                QueryGroup::single(
                    Query::text(
                        r#".abstract p, section[class*="abstract"] p, section#abstract p, div#abstract p"#,
                    )?,
                    Join::Paragraphs,
                )
                .min_len(MIN_PARAGRAPH_CHARS),
            ],
        )
        .placeholder(NO_ABSTRACT),
        FieldRule::new(
            Field::Keywords,
            vec![
                QueryGroup::single(
                    Query::content_or_text(r#".kwd-group span, meta[name="citation_keywords"]"#)?,
                    Join::Comma,
                )
                .min_len(2)
                .unique(),
            ],
        )
        .placeholder(NO_KEYWORDS),
    ];

    let full_text = FullTextPlan {
        page: FullTextPage::SamePage,
        sections: SectionPlan::new(".tsec, section[id], .boxed-text", HeadingStyle::Banner(3))?,
        fallback: Vec::new(),
        on_missing: MissingFullText::Placeholder(NO_FULL_TEXT),
    };

    Ok(SourceProfile {
        kind: SourceKind::BiomedicalRepository,
        name: "PubMed Central",
        pattern: "pmc.ncbi.nlm.nih.gov or a PMC ID",
        example: "PMC4924471",
        domains: vec!["pmc.ncbi.nlm.nih.gov", "ncbi.nlm.nih.gov/pmc"],
        identifier: Some(identifier_rule()?),
        fields,
        full_text: Some(full_text),
        essential: vec![Field::Title],
        narrative: vec![Field::Abstract, Field::FullText],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedDraft, PageVariant, RawDocument};
    use crate::scrapers::extract;

    fn draft_for(html: &str) -> ExtractedDraft {
        let profile = profile().unwrap();
        extract(
            &profile,
            &RawDocument::new(
                "https://pmc.ncbi.nlm.nih.gov/articles/PMC4924471/",
                PageVariant::Primary,
                html,
            ),
        )
    }

    #[test]
    fn test_identifier_rule() {
        let rule = identifier_rule().unwrap();
        assert!(rule.matches("PMC4924471"));
        assert!(rule.matches(" pmc4924471 "));
        assert!(!rule.matches("PMC"));
        assert!(!rule.matches("https://pmc.ncbi.nlm.nih.gov/articles/PMC4924471/"));
        assert_eq!(
            rule.find("https://www.ncbi.nlm.nih.gov/pmc/articles/pmc77/").as_deref(),
            Some("PMC77")
        );
    }

    #[test]
    fn test_metadata_and_year() {
        let draft = draft_for(
            r#"<head>
            <meta name="citation_title" content="Sepsis outcomes">
            <meta name="citation_author" content="A. Author">
            <meta name="citation_author" content="B. Author">
            <meta name="citation_journal_title" content="Crit Care">
            <meta name="citation_publication_date" content="2016/06/27">
            <meta name="citation_pmid" content="27353213">
            <meta name="citation_doi" content="10.1186/s13054-016-1375-2">
            </head>"#,
        );
        assert_eq!(draft.get(Field::Title), "Sepsis outcomes");
        assert_eq!(draft.get(Field::Authors), "A. Author, B. Author");
        assert_eq!(draft.get(Field::Journal), "Crit Care");
        assert_eq!(draft.get(Field::Year), "2016");
        assert_eq!(draft.get(Field::Pmid), "27353213");
        assert_eq!(draft.get(Field::Doi), "10.1186/s13054-016-1375-2");
    }

    #[test]
    fn test_title_fallback_chain() {
        let draft = draft_for(r#"<h1 class="main-article-title">From class match</h1>"#);
        assert_eq!(draft.get(Field::Title), "From class match");
    }

    #[test]
    fn test_abstract_keeps_only_long_paragraphs() {
        let draft = draft_for(
            r#"<section class="abstract" id="abstract1">
                <p>Too short one.</p>
                <p>Background: sepsis remains a leading cause of death.</p>
                <p>Methods.</p>
                <p>Results: mortality fell by a third after the protocol.</p>
                <p>Tiny</p>
            </section>"#,
        );
        assert_eq!(
            draft.get(Field::Abstract),
            "Background: sepsis remains a leading cause of death.\n\nResults: mortality fell by a third after the protocol."
        );
    }

    #[test]
    fn test_placeholders_when_missing() {
        let draft = draft_for(r#"<meta name="citation_title" content="Bare">"#);
        assert_eq!(draft.get(Field::Abstract), NO_ABSTRACT);
        assert_eq!(draft.get(Field::Keywords), NO_KEYWORDS);
    }

    #[test]
    fn test_keywords_deduplicated() {
        let draft = draft_for(
            r#"<meta name="citation_keywords" content="sepsis">
            <div class="kwd-group"><span>sepsis</span><span>,</span><span>fever</span><span>;</span><span>fever</span></div>"#,
        );
        assert_eq!(draft.get(Field::Keywords), "sepsis, fever");
    }

    #[test]
    fn test_full_text_from_sections() {
        let draft = draft_for(
            r#"<meta name="citation_title" content="T">
            <section id="abstract1" class="abstract"><h2>Abstract</h2><p>Abstract text that is long enough.</p></section>
            <section id="sec1" class="tsec"><h2>Introduction</h2>
              <p>Sepsis is a dysregulated host response to infection.</p>
              <p>Lancet. 2010;375:1. [PubMed]</p>
            </section>
            <section id="ref-list1" class="ref-list"><h2>References</h2><p>Reference entry long enough to pass.</p></section>"#,
        );
        assert_eq!(
            draft.get(Field::FullText),
            "### Introduction ###\n\nSepsis is a dysregulated host response to infection."
        );
    }
}
