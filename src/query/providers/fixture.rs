// src/query/providers/fixture.rs
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::query::types::{CollectionSource, Record};

/// In-memory source holding a pre-parsed record array. Used by tests and
/// local development in place of a live endpoint.
pub struct FixtureSource {
    name: String,
    records: Vec<Record>,
}

impl FixtureSource {
    pub fn new(name: &str, records: Vec<Record>) -> Self {
        Self {
            name: name.to_string(),
            records,
        }
    }

    /// Parse a JSON array in the collection-endpoint shape.
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let records: Vec<Record> =
            serde_json::from_str(json).context("parsing fixture collection json")?;
        Ok(Self::new(name, records))
    }
}

#[async_trait]
impl CollectionSource for FixtureSource {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_parses_collection_shape() {
        let json = r#"[
            { "ID": 1, "post_date": "2024-01-01 00:00:00", "post_title": "First" },
            { "ID": 2, "post_date": "2024-02-01 00:00:00", "post_title": "Second" }
        ]"#;
        let src = FixtureSource::from_json("posts", json).unwrap();
        assert_eq!(src.records.len(), 2);
        assert_eq!(src.records[1].post_title.as_deref(), Some("Second"));
    }

    #[test]
    fn fixture_rejects_non_array_bodies() {
        assert!(FixtureSource::from_json("posts", r#"{"ID": 1}"#).is_err());
    }
}
