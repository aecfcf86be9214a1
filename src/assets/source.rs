//! Image Source Provider: resolves a [`SourceImage`] from a local file, a data URI, or a remote
//! URL, and tracks which in-flight load is still wanted.

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use base64::Engine as _;

use crate::{
    assets::decode::{SourceImage, decode_image},
    foundation::error::{MemeError, MemeResult},
    search::model::{Attribution, SearchImage},
};

/// Read and decode an image file from disk.
#[tracing::instrument]
pub fn load_from_path(path: &Path) -> MemeResult<SourceImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| MemeError::decode(format!("read image '{}': {e}", path.display())))?;
    let image = decode_image(&bytes)?;
    tracing::debug!(width = image.width, height = image.height, "decoded file image");
    Ok(image)
}

/// Decode a base64 `data:` URI such as the ones produced when a browser reads an uploaded file.
pub fn load_from_data_uri(uri: &str) -> MemeResult<SourceImage> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| MemeError::decode("data URI must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| MemeError::decode("data URI has no ',' separator"))?;
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(MemeError::decode("only base64 data URIs are supported"));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| MemeError::decode(format!("invalid base64 in data URI: {e}")))?;
    decode_image(&bytes)
}

/// Fetch and decode a remote image. `data:` URIs are decoded without touching the network.
#[tracing::instrument(skip(client))]
pub async fn load_from_url(client: &reqwest::Client, url: &str) -> MemeResult<SourceImage> {
    if url.starts_with("data:") {
        return load_from_data_uri(url);
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MemeError::decode(format!("fetch image '{url}': {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(MemeError::decode(format!(
            "fetch image '{url}': HTTP {status}"
        )));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| MemeError::decode(format!("read image body '{url}': {e}")))?;

    let image = decode_image(&bytes)?;
    tracing::debug!(width = image.width, height = image.height, "decoded remote image");
    Ok(image)
}

/// Where the current image came from.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSelection {
    /// A file the user picked locally.
    Upload,
    /// A photo chosen from search results.
    Search(SearchImage),
}

impl ImageSelection {
    /// Photographer credit to show next to the canvas, if the photo came from search.
    pub fn attribution(&self) -> Option<Attribution> {
        match self {
            Self::Upload => None,
            Self::Search(image) => Some(image.attribution()),
        }
    }
}

/// Ticket identifying one started image load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Generation counter that lets the newest load win.
///
/// Every [`ImageLoader::begin`] supersedes all earlier tickets; completions carrying an older
/// ticket are dropped. Clones share the counter, so a clone can travel into a spawned task.
#[derive(Clone, Debug, Default)]
pub struct ImageLoader {
    latest: Arc<AtomicU64>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, superseding any load still in flight.
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `value` through if `ticket` is still the newest load, otherwise discard it.
    pub fn complete<T>(&self, ticket: LoadTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(
                generation = ticket.0,
                latest = self.latest.load(Ordering::SeqCst),
                "discarding superseded image load"
            );
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
