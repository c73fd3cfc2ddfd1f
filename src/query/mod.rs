// src/query/mod.rs
pub mod config;
pub mod providers;
pub mod types;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use metrics::{counter, gauge, histogram};
use once_cell::sync::OnceCell;

use crate::query::types::{
    CollectionSource, ErrorPolicy, QueryOutcome, Record, RecordId, SourceFailure,
};

/// Default page size for the "latest N" view.
pub const DEFAULT_LATEST_COUNT: usize = 5;

/// Parse a publish date as the upstream emits it: WordPress
/// `YYYY-MM-DD HH:MM:SS`, RFC 3339, or a bare date. `None` means the date
/// is unparseable and the record sorts after all dated ones.
pub fn parse_post_date(s: &str) -> Option<DateTime<Utc>> {
    let t = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

fn publish_date(rec: &Record) -> Option<DateTime<Utc>> {
    rec.post_date.as_deref().and_then(parse_post_date)
}

/// Sort records by publish date, most recent first. The sort is stable,
/// so records with equal or unparseable dates keep concatenation order;
/// unparseable dates sink below every dated record.
pub fn sort_by_date_desc(records: &mut [Record]) {
    records.sort_by_key(|r| std::cmp::Reverse(publish_date(r)));
}

/// One identifier entry per record, in source order.
pub fn identifiers(records: &[Record]) -> Vec<RecordId> {
    records
        .iter()
        .map(|r| RecordId { id: r.id_str() })
        .collect()
}

/// First record whose identifier stringifies to `id`. O(n) scan.
pub fn find_by_id(records: &[Record], id: &str) -> Option<Record> {
    records.iter().find(|r| r.id_str() == id).cloned()
}

/// Records whose category equals `category_id`. Strict equality, no
/// hierarchy semantics.
pub fn filter_by_category(records: &[Record], category_id: i64) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.category_id == Some(category_id))
        .cloned()
        .collect()
}

/// Plain-text rendition of an HTML fragment: entities decoded, tags
/// stripped, whitespace collapsed, cut at `max_chars` characters.
pub fn strip_markup(s: &str, max_chars: usize) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > max_chars {
        out = out.chars().take(max_chars).collect();
        out = out.trim_end().to_string();
    }
    out
}

/// The Content Query Layer: stateless derived views over one or more
/// remote collections. Every operation re-fetches the working set; the
/// only held state is the configured sources and the failure policy.
pub struct ContentQuery {
    sources: Vec<Box<dyn CollectionSource>>,
    error_policy: ErrorPolicy,
}

impl ContentQuery {
    pub fn new(sources: Vec<Box<dyn CollectionSource>>, error_policy: ErrorPolicy) -> Self {
        crate::metrics::describe_query_series();
        Self {
            sources,
            error_policy,
        }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Fetch every source in declaration order and concatenate the results
    /// into one working set. Under [`ErrorPolicy::Degrade`], a failing
    /// source is logged, counted, and recorded as a [`SourceFailure`];
    /// under [`ErrorPolicy::Propagate`] the first failure aborts.
    async fn working_set(&self) -> anyhow::Result<QueryOutcome<Vec<Record>>> {
        let t0 = std::time::Instant::now();
        let mut records = Vec::new();
        let mut failures = Vec::new();

        for source in &self.sources {
            match source.fetch_all().await {
                Ok(mut batch) => records.append(&mut batch),
                Err(e) => {
                    counter!("query_source_errors_total").increment(1);
                    match self.error_policy {
                        ErrorPolicy::Propagate => {
                            return Err(e.context(format!("fetching source '{}'", source.name())));
                        }
                        ErrorPolicy::Degrade => {
                            tracing::warn!(error = ?e, source = source.name(), "source error, substituting empty result");
                            failures.push(SourceFailure {
                                source: source.name().to_string(),
                                reason: format!("{e:#}"),
                            });
                        }
                    }
                }
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("query_fetch_ms").record(ms);
        counter!("query_records_total").increment(records.len() as u64);
        gauge!("query_last_fetch_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        Ok(QueryOutcome { value: records, failures })
    }

    /// All addressable identifiers, one per record, source order.
    pub async fn list_identifiers(&self) -> anyhow::Result<QueryOutcome<Vec<RecordId>>> {
        Ok(self.working_set().await?.map(|recs| identifiers(&recs)))
    }

    /// Every record, publish date descending.
    pub async fn list_sorted(&self) -> anyhow::Result<QueryOutcome<Vec<Record>>> {
        Ok(self.working_set().await?.map(|mut recs| {
            sort_by_date_desc(&mut recs);
            recs
        }))
    }

    /// Single-item lookup by stringified identifier. `None` in the value
    /// position is the not-found signal; it is never an error.
    pub async fn get_by_id(&self, id: &str) -> anyhow::Result<QueryOutcome<Option<Record>>> {
        Ok(self.working_set().await?.map(|recs| find_by_id(&recs, id)))
    }

    /// Most recent `count` records, clamped to what is available.
    pub async fn list_latest(&self, count: usize) -> anyhow::Result<QueryOutcome<Vec<Record>>> {
        Ok(self.list_sorted().await?.map(|mut recs| {
            recs.truncate(count);
            recs
        }))
    }

    /// Records whose category equals `category_id`, source order.
    pub async fn list_by_category(
        &self,
        category_id: i64,
    ) -> anyhow::Result<QueryOutcome<Vec<Record>>> {
        Ok(self
            .working_set()
            .await?
            .map(|recs| filter_by_category(&recs, category_id)))
    }
}
