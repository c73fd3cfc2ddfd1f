// src/query/types.rs
use anyhow::Result;
use serde_json::{Map, Value};

/// One content item as returned by a WordPress-style collection endpoint.
///
/// The field set is the posts shape (`ID`, `post_date`, `post_title`,
/// `post_content`, `category_id`); team-roster deployments carry their
/// payload (name, win count, description) in `extra`, which round-trips
/// untouched through serialization.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct Record {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// The identifier in the string form detail-page addresses use.
    pub fn id_str(&self) -> String {
        self.id.to_string()
    }

    /// Plain-text excerpt of `post_content`: entities decoded, tags
    /// stripped, whitespace collapsed, cut at `max_chars`.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let body = self.post_content.as_deref().unwrap_or_default();
        crate::query::strip_markup(body, max_chars)
    }
}

/// Identifier entry produced by [`ContentQuery::list_identifiers`].
///
/// [`ContentQuery::list_identifiers`]: crate::query::ContentQuery::list_identifiers
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RecordId {
    pub id: String,
}

/// One upstream collection. Implementations fetch the full record array;
/// all sorting, filtering, and slicing happens client-side over the
/// aggregated working set.
#[async_trait::async_trait]
pub trait CollectionSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Record>>;
    fn name(&self) -> &str;
}

/// A source that could not contribute to the working set this call.
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub reason: String,
}

/// What to do when one source fails to fetch or parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log the failure, record it, and aggregate whatever sources succeeded.
    #[default]
    Degrade,
    /// Abort the operation on the first source failure.
    Propagate,
}

/// Result of one query operation: the derived value plus the sources that
/// dropped out along the way. An empty value with non-empty `failures` is
/// "source unavailable", distinct from a legitimately empty collection.
#[derive(Debug, Clone, serde::Serialize, PartialEq)]
pub struct QueryOutcome<T> {
    pub value: T,
    pub failures: Vec<SourceFailure>,
}

impl<T> QueryOutcome<T> {
    pub fn complete(value: T) -> Self {
        Self {
            value,
            failures: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Map the value, carrying failures along.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        QueryOutcome {
            value: f(self.value),
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_unknown_payload_fields() {
        let json = r#"{"ID": 7, "post_date": "2024-05-01 09:00:00", "team_name": "Hawks", "wins": 12}"#;
        let rec: Record = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, 7);
        assert_eq!(rec.extra.get("team_name").unwrap(), "Hawks");
        assert_eq!(rec.extra.get("wins").unwrap(), 12);
    }

    #[test]
    fn id_stringifies_losslessly() {
        let rec: Record = serde_json::from_str(r#"{"ID": 42}"#).unwrap();
        assert_eq!(rec.id_str(), "42");
    }

    #[test]
    fn excerpt_strips_markup_from_post_content() {
        let rec: Record = serde_json::from_str(
            r#"{"ID": 1, "post_content": "<h2>Title</h2><p>Body&nbsp;text.</p>"}"#,
        )
        .unwrap();
        assert_eq!(rec.excerpt(200), "Title Body text.");

        let bare: Record = serde_json::from_str(r#"{"ID": 2}"#).unwrap();
        assert_eq!(bare.excerpt(200), "");
    }

    #[test]
    fn complete_outcome_has_no_failures() {
        let out = QueryOutcome::complete(vec![1, 2]);
        assert!(!out.is_degraded());
        assert_eq!(out.value, vec![1, 2]);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn outcome_map_preserves_failures() {
        let out = QueryOutcome {
            value: vec![1, 2, 3],
            failures: vec![SourceFailure {
                source: "posts".into(),
                reason: "timeout".into(),
            }],
        };
        let mapped = out.map(|v| v.len());
        assert_eq!(mapped.value, 3);
        assert!(mapped.is_degraded());
    }
}
