//! Forward sibling walk from an anchor element.
//!
//! The siblings after the anchor are flattened into [`SiblingDescriptor`]s
//! first; [`WalkPlan::walk`] then scans that list and stops at the first
//! descriptor matching the stop predicate. Keeping the two steps apart lets
//! the stop logic be tested without any HTML.

use crate::error::ScrapeError;
use crate::scrapers::query::{element_text, parse_selector};
use scraper::{ElementRef, Html, Selector};

/// The parts of a sibling element the walk looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingDescriptor {
    /// Lower-case tag name.
    pub tag: String,
    pub class: String,
    pub text: String,
}

impl SiblingDescriptor {
    pub fn new(tag: &str, class: &str, text: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            class: class.to_string(),
            text: text.to_string(),
        }
    }

    fn from_element(element: &ElementRef<'_>) -> Self {
        Self::new(
            element.value().name(),
            element.value().attr("class").unwrap_or(""),
            &element_text(element),
        )
    }
}

#[derive(Debug, Clone)]
pub struct WalkPlan {
    anchor: Selector,
    /// The anchor must contain this text (case-sensitive).
    anchor_text: &'static str,
    stop_tags: &'static [&'static str],
    stop_class_markers: &'static [&'static str],
    capture_tags: &'static [&'static str],
}

impl WalkPlan {
    pub fn new(
        anchor_css: &str,
        anchor_text: &'static str,
        stop_tags: &'static [&'static str],
        stop_class_markers: &'static [&'static str],
        capture_tags: &'static [&'static str],
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            anchor: parse_selector(anchor_css)?,
            anchor_text,
            stop_tags,
            stop_class_markers,
            capture_tags,
        })
    }

    /// Element siblings following the first anchor, in document order. Empty
    /// when no anchor exists.
    pub fn siblings_after(&self, doc: &Html) -> Vec<SiblingDescriptor> {
        let Some(anchor) = doc
            .select(&self.anchor)
            .find(|el| el.text().collect::<String>().contains(self.anchor_text))
        else {
            return Vec::new();
        };
        anchor
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .map(|el| SiblingDescriptor::from_element(&el))
            .collect()
    }

    pub fn stops_at(&self, sibling: &SiblingDescriptor) -> bool {
        self.stop_tags.contains(&sibling.tag.as_str())
            || self
                .stop_class_markers
                .iter()
                .any(|marker| sibling.class.contains(marker))
    }

    pub fn captures(&self, sibling: &SiblingDescriptor) -> bool {
        self.capture_tags.contains(&sibling.tag.as_str())
    }

    /// Texts of captured siblings up to, not including, the first stop.
    pub fn walk(&self, siblings: &[SiblingDescriptor]) -> Vec<String> {
        siblings
            .iter()
            .take_while(|s| !self.stops_at(s))
            .filter(|s| self.captures(s) && !s.text.is_empty())
            .map(|s| s.text.clone())
            .collect()
    }
}
