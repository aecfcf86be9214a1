use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MemeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(MemeError::decode("x").to_string().contains("decode error:"));
    assert!(MemeError::render("x").to_string().contains("render error:"));
    assert!(MemeError::search("x").to_string().contains("search error:"));
    assert!(
        MemeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MemeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn user_message_drops_category_prefix() {
    let err = MemeError::search("Network error: refused");
    assert_eq!(err.user_message(), "Network error: refused");
}
