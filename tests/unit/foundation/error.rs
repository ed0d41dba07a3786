use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuadmorphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QuadmorphError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        QuadmorphError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        QuadmorphError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuadmorphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: QuadmorphError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, QuadmorphError::Serde(_)));
}
