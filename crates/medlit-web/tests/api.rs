//! End-to-end tests for the HTTP API against an in-memory database and
//! stubbed upstreams.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use medlit_db::Database;
use medlit_ranker::RankingCache;
use medlit_test_utils::fixtures::{sample_articles, sample_bookmark};
use medlit_test_utils::{StubArticleSource, StubRankingSource};
use medlit_web::router::build_router;
use medlit_web::state::AppState;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    rankings: Arc<StubRankingSource>,
    articles: Arc<StubArticleSource>,
}

async fn test_app() -> TestApp {
    let db = Database::in_memory().await.unwrap();
    db.initialize().await.unwrap();

    let rankings = Arc::new(
        StubRankingSource::new().with_rankings("Cardiology", &[("Circulation", 35.5), ("European Heart Journal", 37.6)]),
    );
    let articles = Arc::new(StubArticleSource::new(sample_articles(25)));
    let cache = Arc::new(RankingCache::with_system_clock(Duration::from_secs(3600)));

    let state = AppState::new(Arc::new(db), rankings.clone(), cache, articles.clone())
        .with_max_download_results(100);
    TestApp { router: build_router(state), rankings, articles }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), 1_000_000).await.unwrap();
        (status, body.to_vec(), disposition)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body, _) = self.send(request).await;
        (status, parse(&body))
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, body, _) = self.send(json_request("POST", uri, body)).await;
        (status, parse(&body))
    }

    async fn delete(&self, uri: &str) -> StatusCode {
        let request = Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap();
        self.send(request).await.0
    }

    async fn set_email(&self) {
        let (status, _) = self
            .post("/api/config", json!({ "entrez_email": "reader@example.org" }))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn parse(body: &[u8]) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body).unwrap()
    }
}

// --- system ---

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, json) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_clear_cache_rejects_unknown_type() {
    let app = test_app().await;
    let (status, json) = app.post("/api/clear-cache?cache_type=articles", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");

    let (status, json) = app.post("/api/clear-cache?cache_type=rankings", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Cache cleared: rankings");
}

// --- rankings ---

#[tokio::test]
async fn test_live_rankings_then_cache() {
    let app = test_app().await;
    let (status, json) = app.get("/api/journal-rankings/cardiology").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["specialty"], "Cardiology");
    assert_eq!(json["source"], "live");
    assert_eq!(json["data"][0]["journal_name"], "European Heart Journal");
    assert_eq!(json["data"][0]["rank"], 1);
    assert!(json.get("message").is_none());

    let (_, json) = app.get("/api/journal-rankings/Cardiology").await;
    assert_eq!(json["source"], "cache");
    assert_eq!(app.rankings.calls(), 1);

    let (_, json) = app.get("/api/available-specialties").await;
    let specialties: Vec<&str> = json["specialties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert!(specialties.contains(&"Cardiology"));
}

#[tokio::test]
async fn test_rankings_fall_back_to_reference_data() {
    let app = test_app().await;
    app.rankings.set_offline(true);

    let (status, json) = app.get("/api/journal-rankings/Ophthalmology").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback");
    assert!(json["message"].as_str().unwrap().contains("Ophthalmology"));
    assert!(!json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_serves_stale_cache_when_offline() {
    let app = test_app().await;
    let (_, fresh) = app.get("/api/rankings/Cardiology").await;
    app.rankings.set_offline(true);

    let (status, stale) = app.post("/api/rankings/Cardiology/refresh", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stale, fresh);
}

#[tokio::test]
async fn test_unknown_specialty_without_fallback_is_bad_gateway() {
    let app = test_app().await;
    app.rankings.set_unreachable("Underwater Medicine");
    let (status, json) = app.get("/api/rankings/Underwater%20Medicine").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], "error");
}

// --- MeSH terms ---

#[tokio::test]
async fn test_mesh_term_lifecycle() {
    let app = test_app().await;

    let (status, created) = app.post("/api/mesh-terms", json!({ "term": "Glaucoma" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["term"], "Glaucoma");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app.post("/api/mesh-terms", json!({ "term": "Glaucoma" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, list) = app.get("/api/mesh-terms").await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    assert_eq!(app.delete(&format!("/api/mesh-terms/{}", id)).await, StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&format!("/api/mesh-terms/{}", id)).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_mesh_term_rejected() {
    let app = test_app().await;
    let (status, _) = app.post("/api/mesh-terms", json!({ "term": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- bookmarks ---

#[tokio::test]
async fn test_bookmark_lifecycle() {
    let app = test_app().await;
    let bookmark = serde_json::to_value(sample_bookmark("31415926")).unwrap();

    let (status, _) = app.post("/api/bookmark-article", bookmark).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.get("/api/bookmarked-articles").await;
    assert_eq!(json["bookmarks"][0]["pmid"], "31415926");

    assert_eq!(app.delete("/api/bookmark-article/31415926").await, StatusCode::OK);
    assert_eq!(app.delete("/api/bookmark-article/31415926").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bookmark_search_result_with_author_list() {
    let app = test_app().await;
    let (status, _) = app
        .post(
            "/api/bookmark-article",
            json!({
                "pmid": "38000001",
                "title": "Glycaemic control in type 2 diabetes.",
                "authors": ["Jane Smith", "KH Lee"],
                "journal": "The Lancet",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.post("/api/bookmark-article", json!({ "pmid": 38000002 })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.get("/api/bookmarked-articles").await;
    let bookmarks = json["bookmarks"].as_array().unwrap();
    assert_eq!(bookmarks.len(), 2);
    let first = bookmarks.iter().find(|b| b["pmid"] == "38000001").unwrap();
    assert_eq!(first["authors"], "Jane Smith, KH Lee");
    assert!(bookmarks.iter().any(|b| b["pmid"] == "38000002"));
}

#[tokio::test]
async fn test_bookmark_without_pmid_rejected() {
    let app = test_app().await;
    let (status, json) = app.post("/api/bookmark-article", json!({ "title": "No id" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");
}

// --- search ---

#[tokio::test]
async fn test_search_pubmed_requires_query_or_mesh() {
    let app = test_app().await;
    let (status, _) = app.get("/api/search-pubmed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.articles.searches().is_empty());
}

#[tokio::test]
async fn test_search_pubmed_pages_and_records_history() {
    let app = test_app().await;
    let (status, json) = app
        .get("/api/search-pubmed?query=cornea&page=2&per_page=10&journals=Cornea,%20Ophthalmology")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"]["total"], 25);
    assert_eq!(json["results"]["page"], 2);
    assert_eq!(json["results"]["pages"], 3);
    assert_eq!(json["results"]["articles"].as_array().unwrap().len(), 10);

    let term = &app.articles.searches()[0].term;
    assert!(term.contains("\"Cornea\"[Journal]"), "{}", term);

    let (_, json) = app.get("/api/search-history?limit=5").await;
    assert_eq!(json["history"][0]["query"], "cornea");
}

#[tokio::test]
async fn test_malformed_query_string_gets_json_error() {
    let app = test_app().await;
    let request = Request::builder()
        .uri("/api/search-pubmed?query=x&page=abc")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let body = axum::body::to_bytes(response.into_body(), 100_000).await.unwrap();
    let json = parse(&body);
    assert_eq!(json["status"], "error");
    assert!(json["detail"].as_str().unwrap().contains("page"));
    assert!(app.articles.searches().is_empty());
}

#[tokio::test]
async fn test_malformed_json_body_gets_json_error() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/mesh-terms")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"term\": "))
        .unwrap();
    let (status, body, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["status"], "error");
}

#[tokio::test]
async fn test_search_pubmed_rejects_bad_dates() {
    let app = test_app().await;
    let (status, _) = app.get("/api/search-pubmed?query=x&filter_date_start=last-year").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_articles_demo_without_email() {
    let app = test_app().await;
    let (status, json) = app
        .post("/api/search-articles", json!({
            "journal_specialty": "Cardiology",
            "start_date": "2024-01-01",
            "end_date": "2024-06-30"
        }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 10);
    assert!(app.articles.searches().is_empty());
}

#[tokio::test]
async fn test_download_rejects_unsupported_format() {
    let app = test_app().await;
    app.set_email().await;
    let (status, json) = app
        .post("/api/download-search-results", json!({ "query": "cornea", "format": "pdf" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("pdf"));
}

#[tokio::test]
async fn test_download_requires_email() {
    let app = test_app().await;
    let (status, json) = app
        .post("/api/download-search-results", json!({ "query": "cornea", "format": "csv", "max_results": 50 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("Entrez email is not configured"));
}

#[tokio::test]
async fn test_download_csv_attachment() {
    let app = test_app().await;
    app.set_email().await;
    let request = json_request(
        "POST",
        "/api/download-search-results",
        json!({ "query": "cornea", "format": "csv", "max_results": 20 }),
    );
    let (status, body, disposition) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);

    let disposition = disposition.unwrap();
    assert!(disposition.starts_with("attachment; filename=\"pubmed_results_"));
    assert!(disposition.ends_with(".csv\""));

    let text = String::from_utf8(body).unwrap();
    assert_eq!(text.lines().count(), 21);
}

#[tokio::test]
async fn test_cite_article_bibtex() {
    let app = test_app().await;
    app.set_email().await;
    let request = Request::builder()
        .uri("/api/cite-article/30000001?format=bibtex")
        .body(Body::empty())
        .unwrap();
    let (status, body, disposition) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(disposition.unwrap(), "attachment; filename=\"cite_30000001.bib\"");
    assert!(String::from_utf8(body).unwrap().starts_with("@article{pubmed_30000001,"));
}

#[tokio::test]
async fn test_cite_unknown_article_is_not_found() {
    let app = test_app().await;
    app.set_email().await;
    let (status, _) = app.get("/api/cite-article/99999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- settings ---

#[tokio::test]
async fn test_config_round_trip_keeps_omitted_fields() {
    let app = test_app().await;
    let (_, json) = app.get("/api/config").await;
    assert_eq!(json, json!({ "entrez_email": "", "pubmed_api_key": "" }));

    app.post("/api/config", json!({ "entrez_email": "a@b.org", "pubmed_api_key": "k123" })).await;
    let (status, json) = app.post("/api/config", json!({ "entrez_email": "c@d.org" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "entrez_email": "c@d.org", "pubmed_api_key": "k123" }));
}

#[tokio::test]
async fn test_preferences() {
    let app = test_app().await;
    let (status, _) = app
        .post("/api/save-preferences", json!({ "specialty": "Cardiology", "per_page": 25 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = app.get("/api/get-preferences").await;
    assert_eq!(json["preferences"], json!({ "per_page": 25, "specialty": "Cardiology" }));

    let (status, _) = app.post("/api/save-preferences", json!(["not", "an", "object"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_counts_rows() {
    let app = test_app().await;
    app.post("/api/mesh-terms", json!({ "term": "Cataract" })).await;
    let (status, json) = app.get("/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mesh_terms"], 1);
    assert_eq!(json["bookmarks"], 0);
}
