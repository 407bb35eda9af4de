//! Section-aware full-text assembly.
//!
//! Walks section containers in document order, emitting one heading marker
//! per distinct section label followed by the paragraphs under it. Reference
//! lists and abstracts are skipped; the abstract has its own field rule.

use crate::dedup::{Deduplicator, Fingerprint};
use crate::error::ScrapeError;
use crate::scrapers::query::{element_text, parse_selector};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Paragraphs shorter than this are captions, labels or layout debris.
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// Bracketed citation-database link labels left behind by reference widgets.
static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[(DOI|PubMed|PMC free article|Google Scholar|CrossRef)\]")
        .expect("valid boilerplate regex")
});

pub fn is_boilerplate(text: &str) -> bool {
    BOILERPLATE.is_match(text)
}

/// How a section label is rendered in the assembled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    /// `## Label`
    Markdown(usize),
    /// `### Label ###`
    Banner(usize),
}

impl HeadingStyle {
    pub fn render(&self, label: &str) -> String {
        match self {
            HeadingStyle::Markdown(level) => format!("{} {label}", "#".repeat(*level)),
            HeadingStyle::Banner(level) => {
                let hashes = "#".repeat(*level);
                format!("{hashes} {label} {hashes}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionPlan {
    containers: Selector,
    heading: Selector,
    paragraph: Selector,
    /// Containers whose id or class contains any of these are skipped.
    skip_markers: &'static [&'static str],
    style: HeadingStyle,
    min_len: usize,
}

impl SectionPlan {
    pub fn new(containers_css: &str, style: HeadingStyle) -> Result<Self, ScrapeError> {
        Ok(Self {
            containers: parse_selector(containers_css)?,
            heading: parse_selector("h2, h3")?,
            paragraph: parse_selector("p")?,
            skip_markers: &["abstract", "reference", "ref-list"],
            style,
            min_len: MIN_PARAGRAPH_CHARS,
        })
    }

    fn skipped(&self, section: &ElementRef<'_>) -> bool {
        let id = section.value().attr("id").unwrap_or("").to_lowercase();
        let class = section.value().attr("class").unwrap_or("").to_lowercase();
        self.skip_markers
            .iter()
            .any(|marker| id.contains(marker) || class.contains(marker))
    }

    fn keeps_paragraph(&self, text: &str) -> bool {
        text.chars().count() >= self.min_len && !is_boilerplate(text)
    }
}

/// Assembled parts of one document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Assembled {
    /// Heading markers and paragraphs, in emission order.
    pub parts: Vec<String>,
    pub paragraphs: usize,
}

impl Assembled {
    pub fn text(&self) -> String {
        self.parts.join("\n\n")
    }
}

/// Assemble the full text of `doc` according to `plan`.
///
/// `dedup` belongs to the current run; the same paragraph reached through
/// nested or overlapping containers is emitted once.
pub fn assemble(doc: &Html, plan: &SectionPlan, dedup: &mut Deduplicator) -> Assembled {
    let mut out = Assembled::default();
    let mut skipped = 0usize;

    for section in doc.select(&plan.containers) {
        if plan.skipped(&section) {
            skipped += 1;
            continue;
        }

        if let Some(heading) = section.select(&plan.heading).next() {
            let label = element_text(&heading);
            if !label.is_empty()
                && !label.to_lowercase().contains("reference")
                && dedup.admit(Fingerprint::heading(&label))
            {
                out.parts.push(plan.style.render(&label));
            }
        }

        for paragraph in section.select(&plan.paragraph) {
            let text = element_text(&paragraph);
            if plan.keeps_paragraph(&text) && dedup.admit(Fingerprint::paragraph(&text)) {
                out.parts.push(text);
                out.paragraphs += 1;
            }
        }
    }

    debug!(
        parts = out.parts.len(),
        paragraphs = out.paragraphs,
        skipped_sections = skipped,
        "Assembled full text"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str = "Participants were recruited from four regional hospitals.";
    const LONG_B: &str = "Outcomes were assessed blindly at twelve weeks.";

    fn plan() -> SectionPlan {
        SectionPlan::new(".tsec, section[id]", HeadingStyle::Banner(3)).unwrap()
    }

    #[test]
    fn test_heading_styles() {
        assert_eq!(HeadingStyle::Markdown(2).render("Methods"), "## Methods");
        assert_eq!(HeadingStyle::Banner(3).render("Methods"), "### Methods ###");
    }

    #[test]
    fn test_assembles_sections_in_order() {
        let html = Html::parse_document(&format!(
            r#"<section id="s1"><h2>Methods</h2><p>{LONG_A}</p></section>
               <section id="s2"><h2>Results</h2><p>{LONG_B}</p></section>"#
        ));
        let mut dedup = Deduplicator::new();
        let out = assemble(&html, &plan(), &mut dedup);
        assert_eq!(
            out.parts,
            vec!["### Methods ###", LONG_A, "### Results ###", LONG_B]
        );
        assert_eq!(out.paragraphs, 2);
        assert_eq!(
            out.text(),
            format!("### Methods ###\n\n{LONG_A}\n\n### Results ###\n\n{LONG_B}")
        );
    }

    #[test]
    fn test_nested_sections_do_not_duplicate() {
        let html = Html::parse_document(&format!(
            r#"<div class="tsec" id="outer"><h2>Methods</h2>
                 <section id="inner"><h3>Methods</h3><p>{LONG_A}</p></section>
               </div>"#
        ));
        let mut dedup = Deduplicator::new();
        let out = assemble(&html, &plan(), &mut dedup);
        assert_eq!(out.parts, vec!["### Methods ###", LONG_A]);
    }

    #[test]
    fn test_skips_abstract_and_reference_sections() {
        let html = Html::parse_document(&format!(
            r#"<section id="abstract1"><h2>Abstract</h2><p>{LONG_A}</p></section>
               <section id="ref-list1" class="ref-list"><h2>References</h2><p>{LONG_B}</p></section>
               <section id="s3"><h2>Discussion</h2><p>{LONG_B}</p></section>"#
        ));
        let mut dedup = Deduplicator::new();
        let out = assemble(&html, &plan(), &mut dedup);
        assert_eq!(out.parts, vec!["### Discussion ###", LONG_B]);
    }

    #[test]
    fn test_filters_short_and_boilerplate_paragraphs() {
        let html = Html::parse_document(&format!(
            r#"<section id="s1"><h2>Notes</h2>
                 <p>Too short.</p>
                 <p>Smith J. Title of paper. 2001. [DOI] [PubMed]</p>
                 <p>{LONG_A}</p></section>"#
        ));
        let mut dedup = Deduplicator::new();
        let out = assemble(&html, &plan(), &mut dedup);
        assert_eq!(out.parts, vec!["### Notes ###", LONG_A]);
    }

    #[test]
    fn test_reference_heading_not_emitted() {
        let html = Html::parse_document(&format!(
            r#"<section id="s9"><h2>Cited References</h2><p>{LONG_A}</p></section>"#
        ));
        let mut dedup = Deduplicator::new();
        let out = assemble(&html, &plan(), &mut dedup);
        assert_eq!(out.parts, vec![LONG_A]);
    }

    #[test]
    fn test_no_duplicate_fingerprints_in_output() {
        let html = Html::parse_document(&format!(
            r#"<div class="tsec"><section id="a"><h2>Intro</h2><p>{LONG_A}</p><p>{LONG_A}</p></section></div>
               <section id="b"><h2>INTRO</h2><p>{LONG_A}</p><p>{LONG_B}</p></section>"#
        ));
        let mut dedup = Deduplicator::new();
        let out = assemble(&html, &plan(), &mut dedup);
        let mut check = Deduplicator::new();
        for part in out.parts.iter().filter(|p| !p.starts_with("###")) {
            assert!(check.admit(Fingerprint::paragraph(part)), "duplicate {part}");
        }
        assert_eq!(out.parts.iter().filter(|p| p.starts_with("###")).count(), 1);
        assert_eq!(out.paragraphs, 2);
    }

    #[test]
    fn test_boilerplate_detection() {
        assert!(is_boilerplate("Lancet. 2010;375:1. [PubMed]"));
        assert!(is_boilerplate("see [pmc free article]"));
        assert!(!is_boilerplate("Plain sentence with [brackets] inside."));
    }
}
