//! HTTP proxy that hides the upstream API key from callers.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::{
    foundation::error::MemeResult,
    search::{
        model::{ErrorBody, SearchResponse},
        upstream::{PhotoSearch, UNSPLASH_API_BASE, UnsplashClient},
    },
};

/// Extra prefix the route is mounted under, kept for clients built against serverless deploys.
pub const FUNCTIONS_PREFIX: &str = "/.netlify/functions/api";

pub const QUERY_REQUIRED: &str = "Search query is required";

#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub bind: SocketAddr,
    pub api_key: String,
    pub upstream_base: String,
    pub per_page: u32,
}

impl ProxyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8888)),
            api_key: api_key.into(),
            upstream_base: UNSPLASH_API_BASE.to_string(),
            per_page: 20,
        }
    }

    pub fn upstream(&self) -> UnsplashClient {
        UnsplashClient::with_base_url(self.api_key.clone(), self.upstream_base.clone())
            .per_page(self.per_page)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// Build the proxy router: `GET /search-images` at the root and under [`FUNCTIONS_PREFIX`].
///
/// Any origin may call it; browsers hosting the editor elsewhere need the CORS headers.
pub fn router<S: PhotoSearch>(search: Arc<S>) -> Router {
    Router::new()
        .merge(routes::<S>())
        .nest(FUNCTIONS_PREFIX, routes::<S>())
        .layer(CorsLayer::permissive())
        .with_state(search)
}

fn routes<S: PhotoSearch>() -> Router<Arc<S>> {
    Router::new().route("/search-images", get(search_images::<S>))
}

async fn search_images<S: PhotoSearch>(
    State(search): State<Arc<S>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = params.query.filter(|q| !q.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, QUERY_REQUIRED.to_string());
    };

    match search.search(&query).await {
        Ok(images) => {
            tracing::info!(count = images.len(), %query, "search served");
            Json(SearchResponse { images }).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, %query, "image search failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch images: {}", e.user_message()),
            )
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

/// Bind `config.bind` and serve the proxy until the process is stopped.
pub async fn serve(config: ProxyConfig) -> MemeResult<()> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("bind search proxy on {}", config.bind))?;
    let local = listener.local_addr().context("read proxy local address")?;
    tracing::info!(addr = %local, upstream = %config.upstream_base, "search proxy listening");

    let app = router(Arc::new(config.upstream()));
    axum::serve(listener, app)
        .await
        .context("search proxy terminated")?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/search/proxy.rs"]
mod tests;
