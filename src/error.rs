//! Error types for retrieval and extraction.
//!
//! Library errors never escape a run: [`crate::pipeline`] turns every
//! [`ScrapeError`] into an [`ExtractionResult::Failure`] through
//! [`ScrapeError::into_result`].

use crate::models::{ExtractionResult, Field, FailureKind, SourceKind};

/// Failure of a single fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RetrievalError {
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("timed out fetching {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Transport(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScrapeError {
    #[error("unsupported source: {0}. Use a link from medRxiv, PMC, or ScienceDaily")]
    ClassificationUnknown(String),

    #[error("not a URL or a recognized identifier: {0}")]
    MalformedInput(String),

    #[error("failed to fetch {source_name} page: {error}")]
    Retrieval {
        source_name: &'static str,
        error: RetrievalError,
    },

    #[error("could not extract {field} from {source_name} page")]
    ExtractionEmpty {
        source_name: &'static str,
        field: Field,
    },

    #[error("could not extract any of {fields} from {source_name} page")]
    NarrativeEmpty {
        source_name: &'static str,
        fields: String,
    },

    #[error("invalid selector `{0}` in source profile")]
    InvalidSelector(String),

    #[error("invalid pattern `{0}` in source profile")]
    InvalidPattern(String),

    #[error("no source profile registered for {0}")]
    MissingProfile(SourceKind),
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::ClassificationUnknown(_) | ScrapeError::MissingProfile(_) => {
                FailureKind::ClassificationUnknown
            }
            ScrapeError::MalformedInput(_) => FailureKind::MalformedInput,
            ScrapeError::Retrieval { .. } => FailureKind::RetrievalFailure,
            ScrapeError::ExtractionEmpty { .. }
            | ScrapeError::NarrativeEmpty { .. }
            | ScrapeError::InvalidSelector(_)
            | ScrapeError::InvalidPattern(_) => FailureKind::ExtractionEmpty,
        }
    }

    pub fn into_result(self) -> ExtractionResult {
        ExtractionResult::failure(self.kind(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_display() {
        let err = RetrievalError::Status {
            status: 403,
            url: "https://www.medrxiv.org/x".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status 403 from https://www.medrxiv.org/x");
    }

    #[test]
    fn test_extraction_empty_message_names_field() {
        let err = ScrapeError::ExtractionEmpty {
            source_name: "PMC",
            field: Field::Title,
        };
        assert_eq!(err.to_string(), "could not extract title from PMC page");
        assert_eq!(err.kind(), FailureKind::ExtractionEmpty);
    }

    #[test]
    fn test_into_result_is_failure() {
        let result = ScrapeError::ClassificationUnknown("https://example.com".to_string()).into_result();
        assert!(!result.is_success());
        assert!(result.message().unwrap().contains("example.com"));
    }

    #[test]
    fn test_retrieval_kind() {
        let err = ScrapeError::Retrieval {
            source_name: "ScienceDaily",
            error: RetrievalError::Timeout("https://www.sciencedaily.com/x".to_string()),
        };
        assert_eq!(err.kind(), FailureKind::RetrievalFailure);
        assert!(err.to_string().contains("timed out"));
    }
}
