// src/ingest/normalize.rs
use chrono::{DateTime, Days, SecondsFormat, Utc};

use crate::classify;
use crate::ingest::types::RawFeedEntry;
use crate::sources::Source;
use crate::store::ArticleDraft;

/// Articles live for 30 calendar days from ingestion.
pub const RETENTION_DAYS: u64 = 30;

pub const SUMMARY_MAX_CHARS: usize = 500;
pub const CONTENT_MAX_CHARS: usize = 5000;

/// Outcome of normalizing one raw entry. Entries without any usable url are
/// dropped silently; they count as neither success nor error.
#[derive(Debug)]
pub enum NormalizeOutcome {
    Draft(Box<ArticleDraft>),
    SkippedNoUrl,
}

/// ISO-8601 UTC with millisecond precision and `Z` suffix, the stored
/// timestamp shape.
pub fn to_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Parse a feed date string, RFC 3339 first then RFC 2822 (`pubDate`).
pub fn parse_entry_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn first_non_empty<'a>(candidates: [&'a Option<String>; 3]) -> Option<&'a str> {
    candidates
        .into_iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.is_empty())
}

/// Build a fully-populated article draft from one raw entry.
///
/// `now` is the ingestion instant; `published_at` falls back to it and
/// `expires_at` is derived from it, so a run stamps consistent lifecycle
/// metadata no matter how long it takes.
pub fn draft_from_entry(
    entry: &RawFeedEntry,
    source: &Source,
    now: DateTime<Utc>,
) -> NormalizeOutcome {
    let source_url = match entry
        .link
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(entry.guid.as_deref().filter(|s| !s.is_empty()))
    {
        Some(u) => u.to_string(),
        None => return NormalizeOutcome::SkippedNoUrl,
    };

    let title = entry
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled")
        .to_string();

    // Summary and content are two independent truncations of the same
    // resolved text, not a summary of the content.
    let resolved = first_non_empty([&entry.content_snippet, &entry.content, &entry.summary])
        .unwrap_or_default();
    let summary = truncate_chars(resolved, SUMMARY_MAX_CHARS);
    let content = truncate_chars(resolved, CONTENT_MAX_CHARS);

    let published_at = entry
        .iso_date
        .as_deref()
        .or(entry.pub_date.as_deref())
        .and_then(parse_entry_date)
        .unwrap_or(now);

    let expires_at = now.checked_add_days(Days::new(RETENTION_DAYS)).unwrap_or(now);

    // Classification reads the untruncated resolved text; only the stored
    // fields are capped.
    let tags = classify::detect_tags(&title, resolved)
        .into_iter()
        .map(str::to_string)
        .collect();

    NormalizeOutcome::Draft(Box::new(ArticleDraft {
        category: classify::detect_category(&title, resolved),
        maker: classify::detect_maker(&title, resolved).map(str::to_string),
        tags,
        image_url: entry.enclosure_url.clone().unwrap_or_default(),
        source_name: source.name.clone(),
        country: source.country.clone(),
        language: source.language.clone(),
        published_at: to_iso(&published_at),
        expires_at: to_iso(&expires_at),
        title,
        summary,
        content,
        source_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn src() -> Source {
        Source::new("Test Wire", "https://t.example/feed", "usa", "en")
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn draft(entry: &RawFeedEntry, now: DateTime<Utc>) -> ArticleDraft {
        match draft_from_entry(entry, &src(), now) {
            NormalizeOutcome::Draft(d) => *d,
            NormalizeOutcome::SkippedNoUrl => panic!("expected a draft"),
        }
    }

    #[test]
    fn entry_without_link_or_guid_is_skipped() {
        let entry = RawFeedEntry {
            title: Some("orphan".into()),
            ..Default::default()
        };
        assert!(matches!(
            draft_from_entry(&entry, &src(), Utc::now()),
            NormalizeOutcome::SkippedNoUrl
        ));
        // Present-but-empty link counts as missing too.
        let entry = RawFeedEntry {
            link: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            draft_from_entry(&entry, &src(), Utc::now()),
            NormalizeOutcome::SkippedNoUrl
        ));
    }

    #[test]
    fn empty_link_falls_back_to_guid() {
        let entry = RawFeedEntry {
            link: Some(String::new()),
            guid: Some("guid-1".into()),
            ..Default::default()
        };
        assert_eq!(draft(&entry, Utc::now()).source_url, "guid-1");
    }

    #[test]
    fn missing_title_becomes_untitled() {
        let entry = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            ..Default::default()
        };
        assert_eq!(draft(&entry, Utc::now()).title, "Untitled");
    }

    #[test]
    fn content_resolution_first_non_empty_wins() {
        let entry = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            content_snippet: Some(String::new()),
            content: Some("full body".into()),
            summary: Some("short".into()),
            ..Default::default()
        };
        let d = draft(&entry, Utc::now());
        assert_eq!(d.summary, "full body");
        assert_eq!(d.content, "full body");
    }

    #[test]
    fn truncation_bounds_hold_independently() {
        let long = "x".repeat(6000);
        let entry = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            content_snippet: Some(long.clone()),
            ..Default::default()
        };
        let d = draft(&entry, Utc::now());
        assert_eq!(d.summary.chars().count(), SUMMARY_MAX_CHARS);
        assert_eq!(d.content.chars().count(), CONTENT_MAX_CHARS);

        let short_entry = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            content_snippet: Some("short text".into()),
            ..Default::default()
        };
        let d = draft(&short_entry, Utc::now());
        assert_eq!(d.summary, "short text");
        assert_eq!(d.content, "short text");
    }

    #[test]
    fn classification_sees_text_past_the_stored_cut() {
        let long = format!("{} petg resin", "x".repeat(5400));
        let entry = RawFeedEntry {
            link: Some("https://t.example/long".into()),
            content_snippet: Some(long),
            ..Default::default()
        };
        let d = draft(&entry, Utc::now());
        assert_eq!(d.content.chars().count(), CONTENT_MAX_CHARS);
        assert_eq!(d.tags, vec!["PETG".to_string()]);
        assert_eq!(d.category, crate::classify::Category::Materials);
    }

    #[test]
    fn published_at_parses_both_formats_and_falls_back() {
        let now = at("2024-06-01T12:00:00Z");

        let rfc2822 = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            pub_date: Some("Mon, 01 Jan 2024 08:00:00 GMT".into()),
            ..Default::default()
        };
        assert_eq!(draft(&rfc2822, now).published_at, "2024-01-01T08:00:00.000Z");

        let rfc3339 = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            iso_date: Some("2024-02-02T09:30:00Z".into()),
            ..Default::default()
        };
        assert_eq!(draft(&rfc3339, now).published_at, "2024-02-02T09:30:00.000Z");

        let garbage = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            pub_date: Some("not a date".into()),
            ..Default::default()
        };
        assert_eq!(draft(&garbage, now).published_at, to_iso(&now));
    }

    #[test]
    fn expiry_is_thirty_calendar_days_out() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let entry = RawFeedEntry {
            link: Some("https://t.example/a".into()),
            ..Default::default()
        };
        assert_eq!(draft(&entry, now).expires_at, "2024-01-31T00:00:00.000Z");
    }

    #[test]
    fn locale_and_classification_are_populated() {
        let entry = RawFeedEntry {
            link: Some("https://t.example/pla".into()),
            title: Some("New PLA filament with Prusa-compatible bed adhesion".into()),
            content_snippet: Some("Ships with profiles for any hotend".into()),
            ..Default::default()
        };
        let d = draft(&entry, Utc::now());
        assert_eq!(d.category, crate::classify::Category::Materials);
        assert_eq!(d.maker.as_deref(), Some("prusa"));
        assert!(d.tags.contains(&"PLA".to_string()));
        assert_eq!(d.country, "usa");
        assert_eq!(d.language, "en");
        assert_eq!(d.source_name, "Test Wire");
    }
}
