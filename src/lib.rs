// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod metrics;
pub mod query;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::query::config::QueryConfig;
pub use crate::query::providers::{FixtureSource, HttpCollectionSource};
pub use crate::query::types::{
    CollectionSource, ErrorPolicy, QueryOutcome, Record, RecordId, SourceFailure,
};
pub use crate::query::ContentQuery;
