//! Normalization of heterogeneous upstream entries into [`ResultRecord`]s.
//!
//! Upstream capabilities hand back entries in three shapes: a bare URL string,
//! a dict-like map of fields, or a record with optional attributes. Every shape
//! normalizes into a record; missing fields never fail the conversion.

use serde_json::{Map, Value};

use crate::ResultRecord;

/// Maximum length, in characters, of a scraped abstract.
pub const ABSTRACT_MAX_LENGTH: usize = 300;

/// Keys checked, in order, for a description inside a dict-like entry.
const DESCRIPTION_KEYS: &[&str] = &["abstract", "description", "body", "snippet"];

/// An entry as returned by an upstream search capability.
#[derive(Debug, Clone, PartialEq)]
pub enum RawHit {
    /// Only the result URL is known.
    Url(String),
    /// Dict-like entry; recognised keys are `title`, `url`/`href` and
    /// `abstract`/`description`/`body`/`snippet`.
    Fields(Map<String, Value>),
    /// Entry with optional attributes.
    Record {
        title: Option<String>,
        url: Option<String>,
        description: Option<String>,
    },
}

impl RawHit {
    /// Builds a [`RawHit::Record`] with every attribute present.
    pub fn record(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        RawHit::Record {
            title: Some(title.into()),
            url: Some(url.into()),
            description: Some(description.into()),
        }
    }

    /// Converts the entry into a record at the given rank.
    ///
    /// A missing or blank title becomes `"<engine> Result <rank>"`; a missing
    /// URL or description becomes an empty string.
    pub fn into_record(self, engine: &str, rank: u32) -> ResultRecord {
        let (title, url, description) = match self {
            RawHit::Url(url) => (None, Some(url), None),
            RawHit::Fields(map) => (
                string_field(&map, &["title"]),
                string_field(&map, &["url", "href"]),
                string_field(&map, DESCRIPTION_KEYS),
            ),
            RawHit::Record {
                title,
                url,
                description,
            } => (title, url, description),
        };

        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| ResultRecord::placeholder_title(engine, rank));

        ResultRecord::new(
            title,
            url.map(|u| u.trim().to_string()).unwrap_or_default(),
            description.unwrap_or_default(),
            rank,
        )
    }
}

impl From<String> for RawHit {
    fn from(url: String) -> Self {
        RawHit::Url(url)
    }
}

impl From<Map<String, Value>> for RawHit {
    fn from(map: Map<String, Value>) -> Self {
        RawHit::Fields(map)
    }
}

fn string_field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Normalizes a sequence of entries, ranking them by position (1-based).
pub fn normalize_hits(engine: &str, hits: Vec<RawHit>) -> Vec<ResultRecord> {
    hits.into_iter()
        .enumerate()
        .map(|(i, hit)| hit.into_record(engine, (i + 1) as u32))
        .collect()
}

/// Collapses runs of whitespace and trims the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> RawHit {
        match value {
            Value::Object(map) => RawHit::Fields(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_url_string_gets_placeholder_title() {
        let record = RawHit::Url("https://example.com".to_string()).into_record("Google", 4);
        assert_eq!(record.title, "Google Result 4");
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.description, "");
        assert_eq!(record.rank, 4);
    }

    #[test]
    fn test_fields_full() {
        let hit = fields(json!({
            "title": "Rust",
            "url": "https://www.rust-lang.org/",
            "abstract": "A language empowering everyone."
        }));
        let record = hit.into_record("Baidu", 1);
        assert_eq!(record.title, "Rust");
        assert_eq!(record.url, "https://www.rust-lang.org/");
        assert_eq!(record.description, "A language empowering everyone.");
    }

    #[test]
    fn test_fields_missing_everything() {
        let record = fields(json!({})).into_record("Baidu", 2);
        assert_eq!(record.title, "Baidu Result 2");
        assert_eq!(record.url, "");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_fields_non_string_values_are_absent() {
        let record = fields(json!({"title": 42, "url": null})).into_record("Baidu", 1);
        assert_eq!(record.title, "Baidu Result 1");
        assert_eq!(record.url, "");
    }

    #[test]
    fn test_fields_href_and_body_aliases() {
        let record = fields(json!({"title": "T", "href": "https://a.b", "body": "B"}))
            .into_record("X", 1);
        assert_eq!(record.url, "https://a.b");
        assert_eq!(record.description, "B");
    }

    #[test]
    fn test_record_blank_title_gets_placeholder() {
        let hit = RawHit::Record {
            title: Some("   ".to_string()),
            url: None,
            description: Some("desc".to_string()),
        };
        let record = hit.into_record("Google", 7);
        assert_eq!(record.title, "Google Result 7");
        assert_eq!(record.url, "");
        assert_eq!(record.description, "desc");
    }

    #[test]
    fn test_normalize_hits_ranks_by_position() {
        let hits = vec![
            RawHit::Url("https://one.example".to_string()),
            RawHit::record("Two", "https://two.example", ""),
            fields(json!({"url": "https://three.example"})),
        ];
        let records = normalize_hits("Google", hits);
        let ranks: Vec<u32> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(records[0].title, "Google Result 1");
        assert_eq!(records[1].title, "Two");
        assert_eq!(records[2].title, "Google Result 3");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  a \n\t b  c "), "a b c");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_truncate_chars_ascii() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("人工智能研究", 2), "人工");
    }
}
