use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn new_surface_is_cleared_to_background() {
    let bg = Rgba8Premul::from_straight_rgba(10, 20, 30, 255);
    let s = Surface::new(canvas(3, 2), bg);
    assert_eq!(s.data().len(), 24);
    for px in s.data().chunks_exact(4) {
        assert_eq!(px, &[10, 20, 30, 255]);
    }
    assert_eq!(s.pixel(3, 0), None);
}

#[test]
fn opaque_image_replaces_pixels() {
    let mut s = Surface::new(canvas(4, 4), Rgba8Premul::transparent());
    let img = PreparedImage::solid(2, 2, [0, 255, 0, 255]);
    s.draw_image(&img, 1, 1, 255);
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(1, 1), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(2, 2), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 0]));
}

#[test]
fn negative_and_overflowing_offsets_clip() {
    let mut s = Surface::new(canvas(3, 3), Rgba8Premul::transparent());
    let img = PreparedImage::solid(2, 2, [255, 255, 255, 255]);

    s.draw_image(&img, -1, -1, 255);
    assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(1, 0), Some([0, 0, 0, 0]));

    s.draw_image(&img, 2, 2, 255);
    assert_eq!(s.pixel(2, 2), Some([255, 255, 255, 255]));

    let before = s.clone();
    s.draw_image(&img, 10, 0, 255);
    s.draw_image(&img, -5, -5, 255);
    assert_eq!(s, before);
}

#[test]
fn zero_opacity_draws_nothing() {
    let mut s = Surface::new(canvas(2, 2), Rgba8Premul::transparent());
    let before = s.clone();
    s.draw_image(&PreparedImage::solid(2, 2, [255, 0, 0, 255]), 0, 0, 0);
    assert_eq!(s, before);
}

#[test]
fn into_frame_is_premultiplied() {
    let s = Surface::new(canvas(1, 1), Rgba8Premul::from_straight_rgba(255, 0, 0, 128));
    let f = s.to_frame();
    assert!(f.premultiplied);
    assert_eq!(f, s.into_frame());
}

#[test]
fn extreme_offsets_clip_without_overflow() {
    let mut s = Surface::new(canvas(4, 4), Rgba8Premul::transparent());
    let before = s.clone();
    let img = PreparedImage::solid(2, 2, [255, 0, 0, 255]);
    for (x, y) in [
        (i64::MAX, 0),
        (0, i64::MAX),
        (i64::MIN, 0),
        (0, i64::MIN),
        (i64::MAX - 1, i64::MAX - 1),
    ] {
        s.draw_image(&img, x, y, 255);
    }
    assert_eq!(s, before);
}
