//! Query groups and the per-field fallback engine.
//!
//! A [`FieldRule`] holds an ordered list of [`QueryGroup`]s. Groups are tried
//! in order and the first one that yields any non-empty match wins; later
//! groups are never evaluated once an earlier group has produced a value.

use crate::error::ScrapeError;
use crate::scrapers::walk::WalkPlan;
use crate::models::Field;
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(1[5-9]\d{2}|20\d{2})\b").expect("valid year regex"));

pub(crate) fn parse_selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::InvalidSelector(css.to_string()))
}

/// Trimmed text content of an element.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// One document lookup inside a query group.
#[derive(Debug, Clone)]
pub enum Query {
    /// `content` of every `<meta name="...">`.
    Meta(Selector),
    /// Text of every element matching the selector.
    Text(Selector),
    /// `content` attribute when present, element text otherwise.
    ContentOrText(Selector),
    /// Text of the `index`-th match, only when at least `min_count` elements
    /// match. Positional, so it breaks if the page reorders these elements.
    Nth {
        selector: Selector,
        index: usize,
        min_count: usize,
    },
    /// Capture the siblings following an anchor until a stop condition.
    Walk(WalkPlan),
}

impl Query {
    pub fn meta(name: &str) -> Result<Self, ScrapeError> {
        Ok(Query::Meta(parse_selector(&format!(r#"meta[name="{name}"]"#))?))
    }

    pub fn text(css: &str) -> Result<Self, ScrapeError> {
        Ok(Query::Text(parse_selector(css)?))
    }

    pub fn content_or_text(css: &str) -> Result<Self, ScrapeError> {
        Ok(Query::ContentOrText(parse_selector(css)?))
    }

    pub fn nth(css: &str, index: usize, min_count: usize) -> Result<Self, ScrapeError> {
        Ok(Query::Nth {
            selector: parse_selector(css)?,
            index,
            min_count,
        })
    }

    /// Non-empty trimmed matches in document order.
    pub fn matches(&self, doc: &Html) -> Vec<String> {
        let values: Vec<String> = match self {
            Query::Meta(selector) => doc
                .select(selector)
                .filter_map(|el| el.value().attr("content"))
                .map(|content| content.trim().to_string())
                .collect(),
            Query::Text(selector) => doc.select(selector).map(|el| element_text(&el)).collect(),
            Query::ContentOrText(selector) => doc
                .select(selector)
                .map(|el| match el.value().attr("content") {
                    Some(content) if !content.trim().is_empty() => content.trim().to_string(),
                    _ => element_text(&el),
                })
                .collect(),
            Query::Nth {
                selector,
                index,
                min_count,
            } => {
                let all: Vec<ElementRef<'_>> = doc.select(selector).collect();
                if all.len() >= *min_count {
                    all.get(*index).map(element_text).into_iter().collect()
                } else {
                    Vec::new()
                }
            }
            Query::Walk(plan) => plan.walk(&plan.siblings_after(doc)),
        };
        values.into_iter().filter(|v| !v.is_empty()).collect()
    }
}

/// How the matches of a group become one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// Keep only the first match.
    First,
    /// `", "`, for author and keyword lists.
    Comma,
    /// Blank line between entries, for paragraph lists.
    Paragraphs,
    /// Single space, for text spread over several elements.
    Space,
}

impl Join {
    pub fn apply(&self, values: &[String]) -> String {
        match self {
            Join::First => values.first().cloned().unwrap_or_default(),
            Join::Comma => values.join(", "),
            Join::Paragraphs => values.join("\n\n"),
            Join::Space => values.join(" "),
        }
    }
}

/// An ordered set of queries tried together as one extraction attempt.
#[derive(Debug, Clone)]
pub struct QueryGroup {
    pub queries: Vec<Query>,
    pub join: Join,
    /// Matches shorter than this many characters are discarded.
    pub min_len: usize,
    /// Drop repeated matches, keeping first occurrences.
    pub unique: bool,
}

impl QueryGroup {
    pub fn new(queries: Vec<Query>, join: Join) -> Self {
        Self {
            queries,
            join,
            min_len: 0,
            unique: false,
        }
    }

    pub fn single(query: Query, join: Join) -> Self {
        Self::new(vec![query], join)
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Surviving matches of every query in the group, in query order.
    pub fn run(&self, doc: &Html) -> Vec<String> {
        let matches = self
            .queries
            .iter()
            .flat_map(|q| q.matches(doc))
            .filter(|v| v.chars().count() >= self.min_len);
        if self.unique {
            matches.unique().collect()
        } else {
            matches.collect()
        }
    }
}

/// Post-processing applied to the winning value of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derive {
    /// Reduce a full publication date to its year.
    Year,
}

impl Derive {
    pub fn apply(&self, value: &str) -> Option<String> {
        match self {
            Derive::Year => derive_year(value),
        }
    }
}

/// Year component of a publication date such as `2016/06/27` or `2016 Jun 27`.
pub fn derive_year(date: &str) -> Option<String> {
    const FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%Y %b %d", "%d %b %Y", "%B %d, %Y"];
    let date = date.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date, fmt).ok())
        .map(|d| d.year().to_string())
        .or_else(|| YEAR.find(date).map(|m| m.as_str().to_string()))
}

/// Result of resolving one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOutcome {
    pub value: Option<String>,
    /// How many groups were evaluated, including the one that matched.
    pub groups_tried: usize,
}

/// Ordered fallback chain for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: Field,
    pub groups: Vec<QueryGroup>,
    pub derive: Option<Derive>,
    /// Value stored when every group comes back empty. Counts as present.
    pub placeholder: Option<&'static str>,
}

impl FieldRule {
    pub fn new(field: Field, groups: Vec<QueryGroup>) -> Self {
        Self {
            field,
            groups,
            derive: None,
            placeholder: None,
        }
    }

    pub fn derive(mut self, derive: Derive) -> Self {
        self.derive = Some(derive);
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Evaluate groups in order, stopping at the first non-empty one.
    pub fn resolve(&self, doc: &Html) -> FieldOutcome {
        for (i, group) in self.groups.iter().enumerate() {
            let values = group.run(doc);
            if values.is_empty() {
                continue;
            }
            let joined = group.join.apply(&values);
            let value = match self.derive {
                Some(derive) => derive.apply(&joined),
                None => Some(joined),
            };
            return FieldOutcome {
                value,
                groups_tried: i + 1,
            };
        }
        FieldOutcome {
            value: None,
            groups_tried: self.groups.len(),
        }
    }
}
