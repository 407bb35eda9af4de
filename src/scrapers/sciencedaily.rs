//! ScienceDaily news-release profile.
//!
//! Release pages carry no citation meta tags. The title is the first `<h1>`
//! only; an empty first heading leaves it empty. The byline block is a `<dl>`
//! whose first three `<dd>` elements are, in order, the date, the issuing
//! institution and the summary. They are read by position, so a reordering
//! of that block on the site silently swaps the fields.
//!
//! The story body follows an `<h2>` reading "FULL STORY" as a run of sibling
//! paragraphs; the walk ends at the first rule, list, top-level heading or
//! related/source box. `#story_text` is used when the walk finds nothing.

use crate::error::ScrapeError;
use crate::models::{Field, SourceKind};
use crate::scrapers::profile::SourceProfile;
use crate::scrapers::query::{FieldRule, Join, Query, QueryGroup};
use crate::scrapers::walk::WalkPlan;

pub const FULL_STORY_MARKER: &str = "FULL STORY";

const STOP_TAGS: &[&str] = &["hr", "ul", "ol", "h1", "h2"];
const STOP_CLASS_MARKERS: &[&str] = &["related", "source"];
const CAPTURE_TAGS: &[&str] = &["p", "h3", "h4"];

/// Byline `<dd>` positions.
const DATE_INDEX: usize = 0;
const SOURCE_INDEX: usize = 1;
const SUMMARY_INDEX: usize = 2;
const BYLINE_MIN_COUNT: usize = 3;

pub fn profile() -> Result<SourceProfile, ScrapeError> {
    let byline = |field: Field, index: usize| -> Result<FieldRule, ScrapeError> {
        Ok(FieldRule::new(
            field,
            vec![QueryGroup::single(
                Query::nth("dd", index, BYLINE_MIN_COUNT)?,
                Join::First,
            )],
        ))
    };

    let story_walk = WalkPlan::new(
        "h2",
        FULL_STORY_MARKER,
        STOP_TAGS,
        STOP_CLASS_MARKERS,
        CAPTURE_TAGS,
    )?;

    let fields = vec![
        FieldRule::new(
            Field::Title,
            vec![QueryGroup::single(Query::nth("h1", 0, 1)?, Join::First)],
        ),
        byline(Field::Date, DATE_INDEX)?,
        byline(Field::Source, SOURCE_INDEX)?,
        byline(Field::Summary, SUMMARY_INDEX)?,
        FieldRule::new(
            Field::FullText,
            vec![
                QueryGroup::single(Query::Walk(story_walk), Join::Paragraphs),
                QueryGroup::single(Query::text("#story_text p, #story_text h3, #story_text h4")?, Join::Paragraphs)
                    .min_len(10),
            ],
        ),
        FieldRule::new(
            Field::JournalReference,
            vec![QueryGroup::single(Query::text(r#"[class*="journal-reference"]"#)?, Join::Space)],
        ),
    ];

    Ok(SourceProfile {
        kind: SourceKind::NewsRelease,
        name: "ScienceDaily",
        pattern: "sciencedaily.com",
        example: "https://www.sciencedaily.com/releases/...",
        domains: vec!["sciencedaily.com"],
        identifier: None,
        fields,
        full_text: None,
        essential: vec![Field::Title],
        narrative: vec![Field::Summary, Field::FullText],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExtractedDraft, PageVariant, RawDocument};
    use crate::scrapers::extract;

    fn draft_for(html: &str) -> ExtractedDraft {
        let profile = profile().unwrap();
        extract(
            &profile,
            &RawDocument::new(
                "https://www.sciencedaily.com/releases/2024/01/240101120000.htm",
                PageVariant::Primary,
                html,
            ),
        )
    }

    #[test]
    fn test_full_story_stops_at_rule() {
        let draft = draft_for(
            r#"<h1>Bees learn to count</h1>
            <div id="text">
              <h2>FULL STORY</h2>
              <p>First paragraph.</p>
              <p>Second paragraph.</p>
              <p>Third paragraph.</p>
              <hr>
              <p>Story Source: not part of the story.</p>
            </div>"#,
        );
        assert_eq!(
            draft.get(Field::FullText),
            "First paragraph.\n\nSecond paragraph.\n\nThird paragraph."
        );
    }

    #[test]
    fn test_full_story_captures_subheadings_and_skips_other_tags() {
        let draft = draft_for(
            r#"<div><h2>FULL STORY</h2>
              <p>Lead.</p>
              <div class="ad">Advertisement</div>
              <h3>Method</h3>
              <p>Body.</p>
              <div class="story-related">Related stories</div>
              <p>Never reached.</p>
            </div>"#,
        );
        assert_eq!(draft.get(Field::FullText), "Lead.\n\nMethod\n\nBody.");
    }

    #[test]
    fn test_story_text_fallback() {
        let draft = draft_for(
            r#"<h1>T</h1><div id="story_text">
              <p>short</p>
              <p>Researchers found that bees can count.</p>
              <h3>Next steps taken</h3>
            </div>"#,
        );
        assert_eq!(
            draft.get(Field::FullText),
            "Researchers found that bees can count.\n\nNext steps taken"
        );
    }

    #[test]
    fn test_title_is_first_heading_only() {
        let draft = draft_for(r#"<h1>Bees learn to count</h1><h1>Related: wasps</h1>"#);
        assert_eq!(draft.get(Field::Title), "Bees learn to count");

        let draft = draft_for(r#"<h1 class="logo"></h1><h1>Later heading</h1>"#);
        assert!(draft.is_empty(Field::Title));
    }

    #[test]
    fn test_byline_by_position() {
        let draft = draft_for(
            r#"<h1>T</h1><dl>
              <dt>Date:</dt><dd>January 1, 2024</dd>
              <dt>Source:</dt><dd>University of Somewhere</dd>
              <dt>Summary:</dt><dd>Bees can count to four.</dd>
            </dl>
            <div class="journal-reference-box">Doe J. Bees. Nature, 2024.</div>"#,
        );
        assert_eq!(draft.get(Field::Date), "January 1, 2024");
        assert_eq!(draft.get(Field::Source), "University of Somewhere");
        assert_eq!(draft.get(Field::Summary), "Bees can count to four.");
        assert_eq!(draft.get(Field::JournalReference), "Doe J. Bees. Nature, 2024.");
    }

    #[test]
    fn test_byline_ignored_with_fewer_than_three_entries() {
        let draft = draft_for(r#"<h1>T</h1><dl><dd>January 1, 2024</dd><dd>Somewhere</dd></dl>"#);
        assert!(draft.is_empty(Field::Date));
        assert!(draft.is_empty(Field::Source));
        assert!(draft.is_empty(Field::Summary));
    }
}
