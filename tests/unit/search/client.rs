use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

async fn server_with(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search-images"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn empty_query_never_hits_the_network() {
    let client = SearchClient::new("http://127.0.0.1:9");
    let err = client.search("   ").await.unwrap_err();
    assert_eq!(err.user_message(), EMPTY_QUERY_MESSAGE);
}

#[tokio::test]
async fn query_is_trimmed_and_results_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search-images"))
        .and(query_param("query", "cats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "images": [{
                "id": "a",
                "url": "https://example.com/a.jpg",
                "thumb": "https://example.com/a_t.jpg",
                "alt": "a cat",
                "photographer": "Ann",
                "photographerUrl": "https://example.com/ann"
            }]
        })))
        .mount(&server)
        .await;

    let client = SearchClient::new(&format!("{}/", server.uri()));
    let images = client.search("  cats ").await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].attribution().text(), "Photo by Ann on Unsplash");
}

#[tokio::test]
async fn non_success_status_reports_body() {
    let server = server_with(ResponseTemplate::new(502).set_body_string("bad gateway")).await;
    let err = SearchClient::new(&server.uri())
        .search("x")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "API error (502): bad gateway");

    let server = server_with(ResponseTemplate::new(500)).await;
    let err = SearchClient::new(&server.uri())
        .search("x")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "API error (500): Unknown error");
}

#[tokio::test]
async fn invalid_json_is_a_parse_error() {
    let server = server_with(ResponseTemplate::new(200).set_body_string("not json")).await;
    let err = SearchClient::new(&server.uri())
        .search("x")
        .await
        .unwrap_err();
    assert!(err.user_message().starts_with("Error parsing response:"));
}

#[tokio::test]
async fn error_field_is_surfaced_and_missing_images_is_empty() {
    let server = server_with(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "quota" })),
    )
    .await;
    let err = SearchClient::new(&server.uri())
        .search("x")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "quota");

    let server = server_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({}))).await;
    let images = SearchClient::new(&server.uri()).search("x").await.unwrap();
    assert!(images.is_empty());
}

#[tokio::test]
async fn unreachable_proxy_is_a_network_error() {
    let err = SearchClient::new("http://127.0.0.1:1")
        .search("x")
        .await
        .unwrap_err();
    assert!(err.user_message().starts_with("Network error:"), "{err}");
}
