// src/query/providers/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::query::types::{CollectionSource, Record};

/// Collection source backed by a WordPress-style JSON endpoint:
/// `GET <url>` returns the full record array. Requests carry a bounded
/// timeout; expiry surfaces as an ordinary fetch error.
pub struct HttpCollectionSource {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpCollectionSource {
    pub fn new(name: &str, url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl CollectionSource for HttpCollectionSource {
    async fn fetch_all(&self) -> Result<Vec<Record>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .with_context(|| format!("GET {} returned error status", self.url))?;

        let records: Vec<Record> = resp
            .json()
            .await
            .with_context(|| format!("parsing collection body from {}", self.url))?;

        tracing::debug!(source = %self.name, count = records.len(), "fetched collection");
        Ok(records)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
