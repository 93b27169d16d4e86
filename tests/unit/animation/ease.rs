use super::*;

const ALL: [Ease; 7] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_fixed_for_every_curve() {
    for e in ALL {
        assert!(e.apply(0.0).abs() < 1e-12, "{e:?} at 0");
        assert!((e.apply(1.0) - 1.0).abs() < 1e-12, "{e:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for e in ALL {
        assert_eq!(e.apply(-3.0), e.apply(0.0));
        assert_eq!(e.apply(7.5), e.apply(1.0));
    }
}

#[test]
fn default_is_identity() {
    assert_eq!(Ease::default(), Ease::Linear);
    assert_eq!(Ease::default().apply(0.37), 0.37);
}

#[test]
fn in_out_curves_are_symmetric_at_midpoint() {
    assert!((Ease::InOutQuad.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    assert!(Ease::InQuad.apply(0.5) < 0.5);
    assert!(Ease::OutQuad.apply(0.5) > 0.5);
}

#[test]
fn deserializes_snake_case_names() {
    let e: Ease = serde_json::from_str("\"in_out_cubic\"").unwrap();
    assert_eq!(e, Ease::InOutCubic);
}
