use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WipeframeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WipeframeError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        WipeframeError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WipeframeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
