//! Integration tests for the retrieval crate.
//!
//! These load a catalog from disk, then classify and search the way a
//! request handler would.

use data_loader::MovieCatalog;
use retrieval::{
    CatalogStore, DEFAULT_LIMIT, Intent, QueryRequest, classify, keyword_search,
};
use std::io::Write;
use std::sync::Arc;

fn create_test_store() -> CatalogStore {
    let mut file = tempfile::Builder::new().suffix(".jsonl").tempfile().unwrap();
    let documents = [
        r#"{"_id": {"$oid": "a1"}, "title": "The Matrix", "year": 1999, "genres": ["Action", "Sci-Fi"], "cast": ["Keanu Reeves", "Carrie-Anne Moss"], "plot": "A hacker learns the truth."}"#,
        r#"{"_id": {"$oid": "a2"}, "title": "The Matrix Reloaded", "year": 2003, "genres": ["Action", "Sci-Fi"], "cast": ["Keanu Reeves"]}"#,
        r#"{"_id": {"$oid": "a3"}, "title": "Inception", "year": 2010, "genres": ["Action", "Thriller"], "cast": ["Leonardo DiCaprio"]}"#,
        r#"{"_id": {"$oid": "a4"}, "title": "Paddington", "year": 2014, "genres": ["Family", "Comedy"], "cast": ["Ben Whishaw"]}"#,
    ];
    for doc in documents {
        writeln!(file, "{doc}").unwrap();
    }

    let catalog = MovieCatalog::load_from_file(file.path()).unwrap();
    CatalogStore::new(Arc::new(catalog))
}

#[tokio::test]
async fn test_qa_query_end_to_end() {
    let store = create_test_store();
    let text = "matrix reloaded";

    assert_eq!(classify(text), Intent::Qa);

    let results = keyword_search(Some(&store), text, DEFAULT_LIMIT).await;
    let titles: Vec<_> = results.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["The Matrix", "The Matrix Reloaded"]);
}

#[tokio::test]
async fn test_search_by_cast_across_catalog() {
    let store = create_test_store();
    let results = keyword_search(Some(&store), "dicaprio whishaw", DEFAULT_LIMIT).await;

    let ids: Vec<_> = results.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["a3", "a4"]);
}

#[tokio::test]
async fn test_limit_applies_after_loading() {
    let store = create_test_store();
    let results = keyword_search(Some(&store), "action", 2).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "a1");
}

#[test]
fn test_inbound_request_classification() {
    let cases = [
        (r#"{"query_text": "Can you recommend a thriller?"}"#, Intent::Recommend),
        (r#"{"query_text": "Hello, tell me a story"}"#, Intent::Conversational),
        (r#"{"query_text": "What is the plot of Inception?"}"#, Intent::Qa),
        (r#"{"query_text": 42}"#, Intent::Qa),
        (r#"{"query_text": null}"#, Intent::Qa),
        (r#"{"query_text": ""}"#, Intent::Qa),
    ];

    for (body, expected) in cases {
        let request: QueryRequest = serde_json::from_str(body).unwrap();
        let (query, _) = request.into_parts();
        assert_eq!(classify(query.text()), expected, "{body}");
    }
}
