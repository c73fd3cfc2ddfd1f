// src/query/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::query::providers::http::HttpCollectionSource;
use crate::query::types::{CollectionSource, ErrorPolicy};
use crate::query::ContentQuery;

const ENV_PATH: &str = "CONTENT_QUERY_CONFIG_PATH";

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Endpoint configuration. Source declaration order is concatenation
/// order for the aggregated working set.
#[derive(Debug, Clone, serde::Deserialize, PartialEq)]
pub struct QueryConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, serde::Deserialize, PartialEq)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
}

impl QueryConfig {
    /// Load configuration from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading query config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::parse(&content, ext.as_str())
    }

    /// Load configuration using env var + fallbacks:
    /// 1) $CONTENT_QUERY_CONFIG_PATH
    /// 2) config/sources.toml
    /// 3) config/sources.json
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("CONTENT_QUERY_CONFIG_PATH points to non-existent path"));
        }
        let toml_p = PathBuf::from("config/sources.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/sources.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Err(anyhow!(
            "no query config found (set {} or provide config/sources.toml)",
            ENV_PATH
        ))
    }

    fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        let try_toml = hint_ext == "toml" || s.contains("[[sources]]");
        if try_toml {
            if let Ok(v) = toml::from_str::<Self>(s) {
                return v.validated();
            }
        }
        if let Ok(v) = serde_json::from_str::<Self>(s) {
            return v.validated();
        }
        if !try_toml {
            if let Ok(v) = toml::from_str::<Self>(s) {
                return v.validated();
            }
        }
        Err(anyhow!("unsupported query config format"))
    }

    fn validated(self) -> Result<Self> {
        if self.sources.is_empty() {
            return Err(anyhow!("query config declares no sources"));
        }
        for src in &self.sources {
            if src.name.trim().is_empty() || src.url.trim().is_empty() {
                return Err(anyhow!("source entries need a non-empty name and url"));
            }
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the query layer this config describes, with one HTTP source
    /// per declared endpoint.
    pub fn build_query(&self) -> Result<ContentQuery> {
        let mut sources: Vec<Box<dyn CollectionSource>> = Vec::with_capacity(self.sources.len());
        for src in &self.sources {
            sources.push(Box::new(HttpCollectionSource::new(
                &src.name,
                &src.url,
                self.timeout(),
            )?));
        }
        Ok(ContentQuery::new(sources, self.error_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_with_defaults() {
        let toml = r#"
            [[sources]]
            name = "posts"
            url = "https://example.test/wp-json/v1/latest-posts/1"
        "#;
        let cfg = QueryConfig::parse(toml, "toml").unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8000");
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.error_policy, ErrorPolicy::Degrade);
        assert_eq!(cfg.sources.len(), 1);
        assert_eq!(cfg.sources[0].name, "posts");
    }

    #[test]
    fn parses_json_with_explicit_policy() {
        let json = r#"{
            "timeout_secs": 3,
            "error_policy": "propagate",
            "sources": [
                { "name": "east", "url": "https://example.test/east" },
                { "name": "west", "url": "https://example.test/west" }
            ]
        }"#;
        let cfg = QueryConfig::parse(json, "json").unwrap();
        assert_eq!(cfg.error_policy, ErrorPolicy::Propagate);
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.sources.len(), 2);
    }

    #[test]
    fn rejects_empty_source_list() {
        let toml = r#"timeout_secs = 5"#;
        assert!(QueryConfig::parse(toml, "toml").is_err());
        let json = r#"{ "sources": [] }"#;
        assert!(QueryConfig::parse(json, "json").is_err());
    }

    #[test]
    fn rejects_blank_source_fields() {
        let json = r#"{ "sources": [ { "name": " ", "url": "https://x" } ] }"#;
        assert!(QueryConfig::parse(json, "json").is_err());
    }
}
