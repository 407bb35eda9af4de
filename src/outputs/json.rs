//! JSON envelope files.
//!
//! Each run may also be written to disk, grouped by profile:
//!
//! ```text
//! json_output_dir/
//! ├── preprint-repository/
//! │   └── masking-and-transmission-<hash>.json
//! ├── biomedical-repository/
//! │   └── early-goal-directed-therapy-<hash>.json
//! └── failed/
//!     └── https-www-nature-com-articles-x-<hash>.json
//! ```
//!
//! Successful runs are named after the article title, failures after the
//! input. An empty slug falls back to `article`. Every name ends with the
//! first [`INPUT_HASH_CHARS`] hex digits of the input's SHA-256, so two
//! inputs sharing a title or a long URL prefix never overwrite each other.

use crate::models::ExtractionResult;
use crate::utils::slugify;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

const FAILED_DIR: &str = "failed";
const EMPTY_SLUG: &str = "article";
pub const INPUT_HASH_CHARS: usize = 8;

/// Short hex digest of the trimmed input.
fn input_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.trim().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..INPUT_HASH_CHARS].to_string()
}

/// Path an envelope for `input` is written to under `json_output_dir`.
pub fn output_path(result: &ExtractionResult, input: &str, json_output_dir: &str) -> PathBuf {
    let (dir, name) = match result.article() {
        Some(article) if !article.title.is_empty() => (article.profile.as_str(), article.title.as_str()),
        Some(article) => (article.profile.as_str(), input),
        None => (FAILED_DIR, input),
    };
    let slug = match slugify(name) {
        s if s.is_empty() => EMPTY_SLUG.to_string(),
        s => s,
    };
    let hash = input_hash(input);
    PathBuf::from(json_output_dir)
        .join(dir)
        .join(format!("{slug}-{hash}.json"))
}

/// Write one result envelope, creating its profile directory as needed.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_result(
    result: &ExtractionResult,
    input: &str,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(result)?;
    let path = output_path(result, input, json_output_dir);

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON envelope");
    Ok(path)
}
