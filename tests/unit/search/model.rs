use super::*;

fn unsplash_json(alt: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "total": 1,
        "results": [{
            "id": "test-image-id",
            "urls": {
                "regular": "https://example.com/image.jpg",
                "thumb": "https://example.com/thumb.jpg",
                "small": "https://example.com/small.jpg"
            },
            "alt_description": alt,
            "user": {
                "name": "Test User",
                "links": { "html": "https://example.com/user" }
            }
        }]
    })
}

#[test]
fn unsplash_photo_maps_to_search_image() {
    let raw: UnsplashSearch = serde_json::from_value(unsplash_json("test image".into())).unwrap();
    let images: Vec<SearchImage> = raw.results.into_iter().map(SearchImage::from).collect();
    assert_eq!(
        images,
        vec![SearchImage {
            id: "test-image-id".into(),
            url: "https://example.com/image.jpg".into(),
            thumb: "https://example.com/thumb.jpg".into(),
            alt: "test image".into(),
            photographer: "Test User".into(),
            photographer_url: "https://example.com/user".into(),
        }]
    );
}

#[test]
fn missing_alt_falls_back_to_image() {
    let raw: UnsplashSearch = serde_json::from_value(unsplash_json(serde_json::Value::Null)).unwrap();
    let image = SearchImage::from(raw.results.into_iter().next().unwrap());
    assert_eq!(image.alt, "image");
}

#[test]
fn search_image_serializes_camel_case() {
    let image = SearchImage {
        id: "1".into(),
        url: "u".into(),
        thumb: "t".into(),
        alt: "a".into(),
        photographer: "p".into(),
        photographer_url: "pu".into(),
    };
    let v = serde_json::to_value(SearchResponse {
        images: vec![image],
    })
    .unwrap();
    let entry = &v["images"][0];
    for key in ["id", "url", "thumb", "alt", "photographer", "photographerUrl"] {
        assert!(entry.get(key).is_some(), "missing {key}");
    }
    assert!(entry.get("photographer_url").is_none());
}
