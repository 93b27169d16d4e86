use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MotionError::scene_load("x")
            .to_string()
            .contains("scene load error:")
    );
    assert!(MotionError::asset("x").to_string().contains("asset error:"));
    assert!(
        MotionError::export("x")
            .to_string()
            .contains("export error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MotionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
