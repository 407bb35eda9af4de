//! Source profiles: per-source classification rules and extraction tables.
//!
//! The [`ProfileTable`] is built once at start-up and shared read-only by
//! every run.

use crate::error::ScrapeError;
use crate::models::{Field, SourceKind};
use crate::scrapers::assemble::SectionPlan;
use crate::scrapers::query::{FieldRule, QueryGroup};
use crate::scrapers::{medrxiv, pmc, sciencedaily};
use regex::Regex;
use serde::Serialize;

/// Recognizes a bare source identifier and maps it to a canonical URL.
#[derive(Debug, Clone)]
pub struct IdentifierRule {
    /// Matches the whole trimmed input.
    pub exact: Regex,
    /// Finds the identifier inside a URL.
    pub embedded: Regex,
    /// Canonical article URL; `{id}` is replaced with the upper-cased identifier.
    pub url_template: &'static str,
    /// Field the identifier is recorded in.
    pub field: Field,
}

impl IdentifierRule {
    pub fn matches(&self, input: &str) -> bool {
        self.exact.is_match(input.trim())
    }

    /// Upper-cased identifier found anywhere in `input`.
    pub fn find(&self, input: &str) -> Option<String> {
        self.embedded
            .find(input)
            .map(|m| m.as_str().to_uppercase())
    }

    pub fn canonical_url(&self, id: &str) -> String {
        self.url_template.replace("{id}", id)
    }
}

/// Where the full text of an article lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullTextPage {
    /// Assembled from the primary page.
    SamePage,
    /// A second page whose URL is the primary URL plus this suffix.
    Suffix(&'static str),
}

/// What goes into the full-text field when assembly produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingFullText {
    /// Copy another field, typically the abstract.
    CopyField(Field),
    Placeholder(&'static str),
}

#[derive(Debug, Clone)]
pub struct FullTextPlan {
    pub page: FullTextPage,
    pub sections: SectionPlan,
    /// Tried only when section assembly yields no paragraphs.
    pub fallback: Vec<QueryGroup>,
    pub on_missing: MissingFullText,
}

/// URLs derived from the input before anything is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrls {
    /// Fetched first; failure here ends the run.
    pub primary: String,
    /// Separate full-text page, when the profile has one.
    pub full_text: Option<String>,
    pub identifier: Option<String>,
}

/// Everything needed to classify and extract one source.
#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub kind: SourceKind,
    /// Display name used in messages.
    pub name: &'static str,
    /// Human description of accepted inputs.
    pub pattern: &'static str,
    pub example: &'static str,
    /// Lower-case domain substrings.
    pub domains: Vec<&'static str>,
    pub identifier: Option<IdentifierRule>,
    pub fields: Vec<FieldRule>,
    pub full_text: Option<FullTextPlan>,
    /// Fields whose absence fails the run.
    pub essential: Vec<Field>,
    /// At least one of these must be present for the run to succeed.
    pub narrative: Vec<Field>,
}

impl SourceProfile {
    pub fn matches_domain(&self, lowered_input: &str) -> bool {
        self.domains.iter().any(|d| lowered_input.contains(d))
    }

    pub fn matches_identifier(&self, input: &str) -> bool {
        self.identifier.as_ref().is_some_and(|rule| rule.matches(input))
    }

    /// Turn the input into the URLs this profile will fetch.
    pub fn resolve(&self, input: &str) -> ResolvedUrls {
        let input = input.trim();
        let identifier = self.identifier.as_ref().and_then(|rule| rule.find(input));

        let primary = match (&self.identifier, &identifier) {
            (Some(rule), Some(id)) if rule.matches(input) => rule.canonical_url(id),
            _ => input.to_string(),
        };

        match self.full_text.as_ref().map(|plan| plan.page) {
            Some(FullTextPage::Suffix(suffix)) => {
                let (abstract_url, full_text_url) = if primary.contains(suffix) {
                    (primary.replace(suffix, ""), primary.clone())
                } else {
                    (primary.clone(), format!("{primary}{suffix}"))
                };
                ResolvedUrls {
                    primary: abstract_url,
                    full_text: Some(full_text_url),
                    identifier,
                }
            }
            _ => ResolvedUrls {
                primary,
                full_text: None,
                identifier,
            },
        }
    }
}

/// Row of the supported-source listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedSource {
    pub name: &'static str,
    pub pattern: &'static str,
    pub example: &'static str,
}

/// All source profiles in classification priority order.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: Vec<SourceProfile>,
}

impl ProfileTable {
    pub fn new(profiles: Vec<SourceProfile>) -> Self {
        Self { profiles }
    }

    /// The built-in medRxiv, PMC and ScienceDaily profiles.
    pub fn standard() -> Result<Self, ScrapeError> {
        Ok(Self::new(vec![
            medrxiv::profile()?,
            pmc::profile()?,
            sciencedaily::profile()?,
        ]))
    }

    pub fn get(&self, kind: SourceKind) -> Option<&SourceProfile> {
        self.profiles.iter().find(|p| p.kind == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceProfile> {
        self.profiles.iter()
    }

    pub fn supported_sources(&self) -> Vec<SupportedSource> {
        self.profiles
            .iter()
            .map(|p| SupportedSource {
                name: p.name,
                pattern: p.pattern,
                example: p.example,
            })
            .collect()
    }
}
