//! Upstream photo search behind the proxy.

use std::future::Future;

use crate::{
    foundation::error::{MemeError, MemeResult},
    search::model::{SearchImage, UnsplashSearch},
};

/// Default Unsplash API origin.
pub const UNSPLASH_API_BASE: &str = "https://api.unsplash.com";

/// Anything that can turn a text query into normalized image records.
///
/// The proxy is generic over this so tests can serve canned results without a network.
pub trait PhotoSearch: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = MemeResult<Vec<SearchImage>>> + Send;
}

/// Unsplash `/search/photos` client.
#[derive(Clone, Debug)]
pub struct UnsplashClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    per_page: u32,
}

impl UnsplashClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, UNSPLASH_API_BASE)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            per_page: 20,
        }
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PhotoSearch for UnsplashClient {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> MemeResult<Vec<SearchImage>> {
        let key_hint: String = self.api_key.chars().take(5).collect();
        tracing::info!(key = %format!("{key_hint}..."), "searching unsplash");

        let per_page = self.per_page.to_string();
        let response = self
            .http
            .get(format!("{}/search/photos", self.base_url))
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .header("Authorization", format!("Client-ID {}", self.api_key))
            .send()
            .await
            .map_err(|e| MemeError::search(e.to_string()))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MemeError::search(format!("invalid upstream response: {e}")))?;

        if !status.is_success() {
            return Err(MemeError::search(upstream_error_message(&body)));
        }

        let parsed: UnsplashSearch = serde_json::from_value(body)
            .map_err(|e| MemeError::serde(format!("unexpected upstream payload: {e}")))?;
        let images: Vec<SearchImage> = parsed.results.into_iter().map(SearchImage::from).collect();
        tracing::info!(count = images.len(), "upstream search finished");
        Ok(images)
    }
}

fn upstream_error_message(body: &serde_json::Value) -> String {
    match body.get("errors") {
        Some(serde_json::Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(","),
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "Error fetching images".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/upstream.rs"]
mod tests;
