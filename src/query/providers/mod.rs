// src/query/providers/mod.rs
pub mod fixture;
pub mod http;

pub use fixture::FixtureSource;
pub use http::HttpCollectionSource;
