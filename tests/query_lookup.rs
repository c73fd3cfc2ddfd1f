// tests/query_lookup.rs
//
// Single-item lookup and category filtering.

use wp_content_query::{CollectionSource, ContentQuery, ErrorPolicy, FixtureSource};

fn query() -> ContentQuery {
    let src = FixtureSource::from_json(
        "posts",
        r#"[
            { "ID": 10, "post_date": "2024-01-05 08:00:00", "post_title": "Alpha", "category_id": 1 },
            { "ID": 11, "post_date": "2024-01-06 08:00:00", "post_title": "Beta", "category_id": 2 },
            { "ID": 12, "post_date": "2024-01-07 08:00:00", "post_title": "Gamma", "category_id": 1 }
        ]"#,
    )
    .expect("fixture json");
    let sources: Vec<Box<dyn CollectionSource>> = vec![Box::new(src)];
    ContentQuery::new(sources, ErrorPolicy::Degrade)
}

#[tokio::test]
async fn get_by_id_returns_the_matching_record() {
    let out = query().get_by_id("11").await.expect("get_by_id");
    let rec = out.value.expect("record present");
    assert_eq!(rec.id, 11);
    assert_eq!(rec.post_title.as_deref(), Some("Beta"));
}

#[tokio::test]
async fn get_by_id_absence_is_not_an_error() {
    let out = query().get_by_id("999").await.expect("get_by_id");
    assert!(out.value.is_none());
    assert!(!out.is_degraded());
}

#[tokio::test]
async fn get_by_id_is_idempotent_against_an_unchanged_source() {
    let q = query();
    let first = q.get_by_id("12").await.expect("get_by_id").value;
    let second = q.get_by_id("12").await.expect("get_by_id").value;
    assert_eq!(first, second);
}

#[tokio::test]
async fn list_by_category_is_sound_and_complete() {
    let out = query().list_by_category(1).await.expect("list_by_category");
    let ids: Vec<u64> = out.value.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![10, 12]);
    assert!(out.value.iter().all(|r| r.category_id == Some(1)));
}

#[tokio::test]
async fn list_by_category_with_no_matches_is_empty_not_degraded() {
    let out = query().list_by_category(9).await.expect("list_by_category");
    assert!(out.value.is_empty());
    assert!(!out.is_degraded());
}
