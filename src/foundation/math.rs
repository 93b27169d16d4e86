pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y).min(255) as u8
}

/// Componentwise linear interpolation.
pub(crate) fn lerp(a: f64, b: f64, u: f64) -> f64 {
    a + (b - a) * u
}
