//! Shallow textual extraction over a volumes search response.
//!
//! The body is never parsed as JSON. For each field the first occurrence of
//! its quoted marker wins, and the value is the first quoted span after it.
//! Escaped quotes inside a value are not handled; the span ends at the next
//! `"` character.

use super::BookMetadata;
use once_cell::sync::Lazy;
use regex::Regex;

const RESULTS_MARKER: &str = "\"items\"";

static TITLE_RE: Lazy<Regex> = Lazy::new(|| field_regex("title"));
static AUTHORS_RE: Lazy<Regex> = Lazy::new(|| field_regex("authors"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| field_regex("description"));

fn field_regex(field: &str) -> Regex {
    Regex::new(&format!(r#""{field}"[^"]*"([^"]*)""#)).expect("valid field regex")
}

/// Extracts metadata from a raw response body.
///
/// Returns an empty result when the body has no `"items"` collection marker.
pub fn extract_metadata(body: &str) -> BookMetadata {
    if !body.contains(RESULTS_MARKER) {
        return BookMetadata::default();
    }

    BookMetadata {
        title: first_quoted_after(&TITLE_RE, body),
        authors: first_quoted_after(&AUTHORS_RE, body),
        description: first_quoted_after(&DESCRIPTION_RE, body),
    }
}

// Leftmost match is the first marker occurrence: any later marker would itself
// supply the quotes the first one needs.
fn first_quoted_after(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::extract_metadata;

    const VOLUME_BODY: &str = r#"{
  "kind": "books#volumes",
  "totalItems": 1,
  "items": [
    {
      "volumeInfo": {
        "title": "Dune",
        "authors": [
          "Frank Herbert",
          "Brian Herbert"
        ],
        "description": "Set on the desert planet Arrakis."
      }
    }
  ]
}"#;

    #[test]
    fn body_without_results_marker_is_empty() {
        let metadata = extract_metadata(r#"{"kind": "books#volumes", "totalItems": 0}"#);
        assert!(metadata.is_empty());
    }

    #[test]
    fn extracts_all_three_fields_with_first_author() {
        let metadata = extract_metadata(VOLUME_BODY);
        assert_eq!(metadata.title.as_deref(), Some("Dune"));
        assert_eq!(metadata.authors.as_deref(), Some("Frank Herbert"));
        assert_eq!(
            metadata.description.as_deref(),
            Some("Set on the desert planet Arrakis.")
        );
    }

    #[test]
    fn only_title_marker_yields_only_title() {
        let metadata = extract_metadata(r#"{"items": [{"title": "Atlas"}]}"#);
        assert_eq!(metadata.title.as_deref(), Some("Atlas"));
        assert!(metadata.authors.is_none());
        assert!(metadata.description.is_none());
        assert_eq!(metadata.field_count(), 1);
    }

    #[test]
    fn first_candidate_wins_across_multiple_items() {
        let body = r#"{"items": [{"title": "First"}, {"title": "Second"}]}"#;
        assert_eq!(extract_metadata(body).title.as_deref(), Some("First"));
    }

    #[test]
    fn escaped_quote_truncates_value() {
        let body = r#"{"items": [{"title": "The \"Quoted\" Book"}]}"#;
        assert_eq!(extract_metadata(body).title.as_deref(), Some(r"The \"));
    }

    #[test]
    fn empty_or_unterminated_values_are_omitted() {
        let empty = r#"{"items": [{"title": "", "description": "x"}]}"#;
        let metadata = extract_metadata(empty);
        assert!(metadata.title.is_none());

        let unterminated = r#"{"items": [{"description": "never closed"#;
        assert!(extract_metadata(unterminated).description.is_none());
    }

    #[test]
    fn subtitle_is_not_mistaken_for_title() {
        let body = r#"{"items": [{"subtitle": "Part Two", "title": "Dune"}]}"#;
        assert_eq!(extract_metadata(body).title.as_deref(), Some("Dune"));
    }
}
