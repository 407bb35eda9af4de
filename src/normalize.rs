//! Whitespace and control-character normalization for extracted text.
//!
//! Every string field of an [`ExtractedDraft`](crate::models::ExtractedDraft)
//! passes through [`normalize`] before it becomes part of a
//! [`NormalizedArticle`](crate::models::NormalizedArticle).

/// Collapse whitespace runs to a single space, drop control characters and trim.
///
/// Newlines and tabs count as whitespace and are collapsed like spaces. Other
/// control characters (`\x00`-`\x1F`, `\x7F`, and the C1 block) are removed
/// before collapsing so that removing one never leaves a double space behind.
///
/// The function is idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// # Examples
///
/// ```
/// use article_scrape::normalize::normalize;
///
/// assert_eq!(normalize("  Hello\n\n\tworld\u{0007} "), "Hello world");
/// ```
pub fn normalize(s: &str) -> String {
    let printable: String = s
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}
