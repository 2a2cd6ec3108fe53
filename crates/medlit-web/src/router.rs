//! Axum router: maps all URL paths to handlers.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    bookmarks::{bookmark_article, bookmarked_articles, remove_bookmark},
    mesh::{add_term, delete_term, list_terms, seed_defaults},
    rankings::{available_specialties, journal_rankings, rankings, refresh_rankings},
    search::{cite_article, download_search_results, search_articles, search_pubmed},
    settings::{get_config, get_preferences, save_config, save_preferences, search_history},
    system::{available_dates, clear_cache, health, stats},
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();
    let shared: SharedState = Arc::new(state);

    let mut router = Router::new()
        // System
        .route("/api/health",                get(health))
        .route("/api/stats",                 get(stats))
        .route("/api/available-dates",       get(available_dates))
        .route("/api/clear-cache",           post(clear_cache))

        // Rankings
        .route("/api/available-specialties",           get(available_specialties))
        .route("/api/journal-rankings/{specialty}",     get(journal_rankings))
        .route("/api/rankings/{specialty}",             get(rankings))
        .route("/api/rankings/{specialty}/refresh",     post(refresh_rankings))

        // MeSH terms
        .route("/api/mesh-terms",          get(list_terms).post(add_term))
        .route("/api/mesh-terms/defaults", post(seed_defaults))
        .route("/api/mesh-terms/{id}",     delete(delete_term))

        // Search and export
        .route("/api/search-pubmed",             get(search_pubmed))
        .route("/api/search-articles",           post(search_articles))
        .route("/api/download-search-results",   post(download_search_results))
        .route("/api/cite-article/{pmid}",       get(cite_article))

        // Bookmarks
        .route("/api/bookmark-article",          post(bookmark_article))
        .route("/api/bookmark-article/{pmid}",   delete(remove_bookmark))
        .route("/api/bookmarked-articles",       get(bookmarked_articles))

        // Settings
        .route("/api/config",           get(get_config).post(save_config))
        .route("/api/search-history",   get(search_history))
        .route("/api/get-preferences",  get(get_preferences))
        .route("/api/save-preferences", post(save_preferences));

    // Static frontend
    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        if index.is_file() {
            router = router.route_service("/", ServeFile::new(index));
        }
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
