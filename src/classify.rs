//! Source classification.
//!
//! Rules are checked in a fixed order: every profile's domain substrings
//! first, then identifier patterns for bare ids such as `PMC4924471`. Domain
//! matching is case-insensitive. Inputs matching nothing are `Unknown`.

use crate::error::ScrapeError;
use crate::models::SourceKind;
use crate::scrapers::ProfileTable;
use tracing::debug;
use url::Url;

/// Map `input` to a source kind. Never fails.
pub fn classify(profiles: &ProfileTable, input: &str) -> SourceKind {
    let lowered = input.to_lowercase();

    let kind = profiles
        .iter()
        .find(|p| p.matches_domain(&lowered))
        .or_else(|| profiles.iter().find(|p| p.matches_identifier(input)))
        .map(|p| p.kind)
        .unwrap_or(SourceKind::Unknown);

    debug!(input, %kind, "Classified input");
    kind
}

/// Classify `input`, turning `Unknown` into the appropriate error.
///
/// An unrecognized http(s) URL is [`ScrapeError::ClassificationUnknown`];
/// anything that is not a URL at all is [`ScrapeError::MalformedInput`].
pub fn classify_input(profiles: &ProfileTable, input: &str) -> Result<SourceKind, ScrapeError> {
    match classify(profiles, input) {
        SourceKind::Unknown if looks_like_url(input) => {
            Err(ScrapeError::ClassificationUnknown(input.trim().to_string()))
        }
        SourceKind::Unknown => Err(ScrapeError::MalformedInput(input.trim().to_string())),
        kind => Ok(kind),
    }
}

fn looks_like_url(input: &str) -> bool {
    Url::parse(input.trim())
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
