//! Shared testing utilities for the medlit workspace: upstream fixtures,
//! stub sources and a throwaway HTTP server.

pub mod fixtures;
pub mod stubs;

pub use stubs::{StubArticleSource, StubRankingSource};

use axum::Router;
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral localhost port and return its base URL.
/// The server lives until the test runtime shuts down.
pub async fn spawn_mock_server(router: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{}", addr))
}
