//! Per-run duplicate suppression for assembled full text.
//!
//! Overlapping selectors (`section[id]` nested inside `.tsec`, for instance)
//! routinely select the same node more than once. The [`Deduplicator`] keeps
//! the fingerprints of everything emitted so far in one extraction run; it is
//! created by the run and dropped with it.

use crate::normalize::normalize;
use std::collections::HashSet;

/// Number of leading characters of normalized paragraph text used as its key.
pub const PARAGRAPH_FINGERPRINT_CHARS: usize = 100;

/// A short derived key identifying emitted content.
///
/// Headings and paragraphs live in separate namespaces, so a paragraph whose
/// prefix happens to equal a heading label is not suppressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    Heading(String),
    Paragraph(String),
}

impl Fingerprint {
    /// Lower-cased trimmed label.
    pub fn heading(label: &str) -> Self {
        Fingerprint::Heading(label.trim().to_lowercase())
    }

    /// Fixed-length prefix of the normalized paragraph text.
    pub fn paragraph(text: &str) -> Self {
        let prefix = normalize(text)
            .chars()
            .take(PARAGRAPH_FINGERPRINT_CHARS)
            .collect();
        Fingerprint::Paragraph(prefix)
    }
}

#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<Fingerprint>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(fingerprint)
    }

    pub fn remember(&mut self, fingerprint: Fingerprint) {
        self.seen.insert(fingerprint);
    }

    /// Remember `fingerprint` and report whether it was new.
    pub fn admit(&mut self, fingerprint: Fingerprint) -> bool {
        self.seen.insert(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
