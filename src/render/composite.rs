use crate::foundation::math::{mul_div255_u16, mul_div255_u8};
use crate::render::surface::Surface;
use crate::scene::scene::Scene;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over with the source scaled by `opacity / 255`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: u8) -> PremulRgba8 {
    if opacity == 0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(opacity);
    let sa = mul_div255_u16(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - sa;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u16(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u16(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, u16::from(dc));
    }
    out
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

/// Resolve every sprite at `t`, then draw them in name order.
///
/// All instructions for `t` are applied before any pixel is written. The surface is not
/// cleared here; callers hand in a freshly cleared one.
pub fn draw_scene(scene: &mut Scene, surface: &mut Surface, t: f64) {
    scene.update(t);
    for sprite in scene.sprites() {
        sprite.draw(surface);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
