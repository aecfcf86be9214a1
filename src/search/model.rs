use serde::{Deserialize, Serialize};

/// One normalized search result as served by the proxy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchImage {
    pub id: String,
    /// Directly fetchable full-size URL.
    pub url: String,
    pub thumb: String,
    pub alt: String,
    pub photographer: String,
    pub photographer_url: String,
}

impl SearchImage {
    pub fn attribution(&self) -> Attribution {
        Attribution {
            photographer: self.photographer.clone(),
            photographer_url: self.photographer_url.clone(),
        }
    }
}

/// Photographer credit shown for photos that came from search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribution {
    pub photographer: String,
    pub photographer_url: String,
}

impl Attribution {
    pub fn text(&self) -> String {
        format!("Photo by {} on Unsplash", self.photographer)
    }
}

/// Successful proxy response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub images: Vec<SearchImage>,
}

/// Error body shared by every failing proxy response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnsplashSearch {
    #[serde(default)]
    pub results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnsplashPhoto {
    pub id: String,
    pub urls: UnsplashUrls,
    #[serde(default)]
    pub alt_description: Option<String>,
    pub user: UnsplashUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnsplashUrls {
    pub regular: String,
    pub thumb: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnsplashUser {
    pub name: String,
    pub links: UnsplashUserLinks,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnsplashUserLinks {
    pub html: String,
}

impl From<UnsplashPhoto> for SearchImage {
    fn from(p: UnsplashPhoto) -> Self {
        Self {
            id: p.id,
            url: p.urls.regular,
            thumb: p.urls.thumb,
            alt: p
                .alt_description
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "image".to_string()),
            photographer: p.user.name,
            photographer_url: p.user.links.html,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/search/model.rs"]
mod tests;
