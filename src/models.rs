//! Data models for documents, drafts and the final article record.
//!
//! This module defines the values that flow through one extraction run:
//! - [`SourceKind`]: which source profile a URL belongs to
//! - [`RawDocument`]: fetched HTML plus where it came from
//! - [`ExtractedDraft`]: field values filled in incrementally by query groups
//! - [`NormalizedArticle`]: the finished, normalized record
//! - [`ExtractionResult`]: the success/failure envelope handed to callers
//!
//! The serialized field names use camelCase because the rewriting collaborator
//! consumes them as JSON.

use crate::normalize::normalize;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The kind of publication source a URL or identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// medRxiv, abstract page plus a separate `.full-text` page.
    PreprintRepository,
    /// PubMed Central, one page per article, addressable by `PMC` id.
    BiomedicalRepository,
    /// ScienceDaily press releases.
    NewsRelease,
    Unknown,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::PreprintRepository => "preprint-repository",
            SourceKind::BiomedicalRepository => "biomedical-repository",
            SourceKind::NewsRelease => "news-release",
            SourceKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which page of an article a [`RawDocument`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariant {
    /// The page the input resolved to (abstract page, article page, release).
    Primary,
    /// A separately fetched full-text page.
    FullText,
}

impl fmt::Display for PageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageVariant::Primary => f.write_str("primary"),
            PageVariant::FullText => f.write_str("full-text"),
        }
    }
}

/// Unparsed HTML as returned by the retrieval layer.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub variant: PageVariant,
    pub html: String,
}

impl RawDocument {
    pub fn new(url: impl Into<String>, variant: PageVariant, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            variant,
            html: html.into(),
        }
    }
}

/// Every field an extractor can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Authors,
    Abstract,
    FullText,
    Summary,
    Date,
    Year,
    Journal,
    Source,
    Doi,
    Pmid,
    PmcId,
    Keywords,
    PdfUrl,
    AbstractUrl,
    FullTextUrl,
    JournalReference,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Authors => "authors",
            Field::Abstract => "abstract",
            Field::FullText => "full text",
            Field::Summary => "summary",
            Field::Date => "date",
            Field::Year => "year",
            Field::Journal => "journal",
            Field::Source => "source",
            Field::Doi => "doi",
            Field::Pmid => "pmid",
            Field::PmcId => "pmc id",
            Field::Keywords => "keywords",
            Field::PdfUrl => "pdf url",
            Field::AbstractUrl => "abstract url",
            Field::FullTextUrl => "full-text url",
            Field::JournalReference => "journal reference",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field values collected during one run, before normalization.
///
/// A field is only written while it is still empty, so the first query group
/// that produces a value wins and later groups cannot clobber it.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDraft {
    fields: BTreeMap<Field, String>,
}

impl ExtractedDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self, field: Field) -> bool {
        self.get(field).trim().is_empty()
    }

    /// Store `value` unless the field already holds something. Returns whether
    /// the value was written.
    pub fn set_if_empty(&mut self, field: Field, value: impl Into<String>) -> bool {
        if !self.is_empty(field) {
            return false;
        }
        let value = value.into();
        if value.trim().is_empty() {
            return false;
        }
        self.fields.insert(field, value);
        true
    }

    /// Normalize every field and produce the final record.
    pub fn finalize(self, profile: SourceKind, url: &str) -> NormalizedArticle {
        let take = |field: Field| normalize(self.get(field));
        NormalizedArticle {
            profile,
            url: normalize(url),
            title: take(Field::Title),
            authors: take(Field::Authors),
            abstract_text: take(Field::Abstract),
            full_text: take(Field::FullText),
            summary: take(Field::Summary),
            date: take(Field::Date),
            year: take(Field::Year),
            journal: take(Field::Journal),
            source: take(Field::Source),
            doi: take(Field::Doi),
            pmid: take(Field::Pmid),
            pmc_id: take(Field::PmcId),
            keywords: take(Field::Keywords),
            pdf_url: take(Field::PdfUrl),
            abstract_url: take(Field::AbstractUrl),
            full_text_url: take(Field::FullTextUrl),
            journal_reference: take(Field::JournalReference),
        }
    }
}

/// A fully normalized article record.
///
/// Fields a profile does not produce are empty strings. Every string is
/// whitespace-collapsed and free of control characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArticle {
    pub profile: SourceKind,
    pub url: String,
    pub title: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Assembled body text. News releases put their full story here too, so
    /// consumers expecting a `fullStory` key read `fullText` instead. Records
    /// written with `fullStory` still deserialize into this field.
    #[serde(alias = "fullStory")]
    pub full_text: String,
    pub summary: String,
    pub date: String,
    pub year: String,
    pub journal: String,
    /// Originating institution for news releases.
    pub source: String,
    pub doi: String,
    pub pmid: String,
    pub pmc_id: String,
    pub keywords: String,
    pub pdf_url: String,
    pub abstract_url: String,
    pub full_text_url: String,
    pub journal_reference: String,
}

impl NormalizedArticle {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Authors => &self.authors,
            Field::Abstract => &self.abstract_text,
            Field::FullText => &self.full_text,
            Field::Summary => &self.summary,
            Field::Date => &self.date,
            Field::Year => &self.year,
            Field::Journal => &self.journal,
            Field::Source => &self.source,
            Field::Doi => &self.doi,
            Field::Pmid => &self.pmid,
            Field::PmcId => &self.pmc_id,
            Field::Keywords => &self.keywords,
            Field::PdfUrl => &self.pdf_url,
            Field::AbstractUrl => &self.abstract_url,
            Field::FullTextUrl => &self.full_text_url,
            Field::JournalReference => &self.journal_reference,
        }
    }
}

/// Category of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    ClassificationUnknown,
    RetrievalFailure,
    ExtractionEmpty,
    MalformedInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Terminal outcome of one extraction run.
///
/// Serializes as `{"success": true, "data": {...}}` or
/// `{"success": false, "kind": "...", "message": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Success(NormalizedArticle),
    Failure(Failure),
}

impl ExtractionResult {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ExtractionResult::Failure(Failure {
            kind,
            message: message.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    pub fn article(&self) -> Option<&NormalizedArticle> {
        match self {
            ExtractionResult::Success(article) => Some(article),
            ExtractionResult::Failure(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ExtractionResult::Success(_) => None,
            ExtractionResult::Failure(failure) => Some(&failure.message),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a NormalizedArticle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match self {
            ExtractionResult::Success(article) => Envelope {
                success: true,
                data: Some(article),
                kind: None,
                message: None,
            },
            ExtractionResult::Failure(failure) => Envelope {
                success: false,
                data: None,
                kind: Some(failure.kind),
                message: Some(&failure.message),
            },
        };
        envelope.serialize(serializer)
    }
}
