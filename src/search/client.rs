//! Caller side of the search proxy.

use crate::{
    foundation::error::{MemeError, MemeResult},
    search::model::SearchImage,
};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search term";
pub const NO_RESULTS_MESSAGE: &str = "No images found. Try a different search term.";

/// Talks to a running search proxy and turns every failure into a displayable message.
#[derive(Clone, Debug)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    /// `proxy_base` is the origin (or mount prefix) that serves `/search-images`.
    pub fn new(proxy_base: &str) -> Self {
        Self::with_http(reqwest::Client::new(), proxy_base)
    }

    pub fn with_http(http: reqwest::Client, proxy_base: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/search-images", proxy_base.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Search for `query`. An empty result list is `Ok`; callers show [`NO_RESULTS_MESSAGE`].
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> MemeResult<Vec<SearchImage>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MemeError::validation(EMPTY_QUERY_MESSAGE));
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| MemeError::search(format!("Network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = if text.is_empty() {
                "Unknown error".to_string()
            } else {
                text
            };
            return Err(MemeError::search(format!(
                "API error ({}): {text}",
                status.as_u16()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MemeError::search(format!("Error parsing response: {e}")))?;

        if let Some(error) = body.get("error").and_then(|v| v.as_str()) {
            return Err(MemeError::search(error));
        }

        let images = match body.get("images") {
            Some(v) if !v.is_null() => serde_json::from_value::<Vec<SearchImage>>(v.clone())
                .map_err(|e| MemeError::search(format!("Error parsing response: {e}")))?,
            _ => Vec::new(),
        };
        tracing::debug!(count = images.len(), "search results received");
        Ok(images)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/client.rs"]
mod tests;
