use axum::body::Body;
use axum::http::Request;
use tower::ServiceExt as _;

use super::*;
use crate::foundation::error::MemeError;
use crate::search::model::SearchImage;

struct Stub;

impl PhotoSearch for Stub {
    async fn search(&self, query: &str) -> MemeResult<Vec<SearchImage>> {
        match query {
            "fail" => Err(MemeError::search("API rate limit exceeded")),
            "nothing" => Ok(Vec::new()),
            _ => Ok(vec![SearchImage {
                id: "test-image-id".to_string(),
                url: "https://example.com/image.jpg".to_string(),
                thumb: "https://example.com/thumb.jpg".to_string(),
                alt: "test image".to_string(),
                photographer: "Test User".to_string(),
                photographer_url: "https://example.com/user".to_string(),
            }]),
        }
    }
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router(Arc::new(Stub))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn returns_normalized_images() {
    let (status, body) = get_json("/search-images?query=nature").await;
    assert_eq!(status, StatusCode::OK);
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(
        images[0],
        serde_json::json!({
            "id": "test-image-id",
            "url": "https://example.com/image.jpg",
            "thumb": "https://example.com/thumb.jpg",
            "alt": "test image",
            "photographer": "Test User",
            "photographerUrl": "https://example.com/user"
        })
    );
}

#[tokio::test]
async fn missing_query_is_rejected() {
    let (status, body) = get_json("/search-images").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("required"));

    let (status, _) = get_json("/search-images?query=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_failure_is_500() {
    let (status, body) = get_json("/search-images?query=fail").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to fetch images: API rate limit exceeded"
    );
}

#[tokio::test]
async fn served_under_functions_prefix() {
    let (status, body) = get_json("/.netlify/functions/api/search-images?query=nature").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"].as_array().unwrap().len(), 1);

    let (status, body) = get_json("/.netlify/functions/api/search-images?query=nothing").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let response = router(Arc::new(Stub))
        .oneshot(
            Request::builder()
                .uri("/search-images?query=nature")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let preflight = router(Arc::new(Stub))
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/.netlify/functions/api/search-images?query=nature")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::OK);
    assert_eq!(preflight.headers()["access-control-allow-origin"], "*");
    assert!(
        preflight
            .headers()
            .contains_key("access-control-allow-methods")
    );
}

#[test]
fn config_defaults() {
    let cfg = ProxyConfig::new("key");
    assert_eq!(cfg.bind.port(), 8888);
    assert_eq!(cfg.per_page, 20);
    assert_eq!(cfg.upstream().base_url(), UNSPLASH_API_BASE);
}
