use crate::foundation::error::{MotionError, MotionResult};

/// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional, case-insensitive) into straight RGBA8.
pub fn parse_hex_rgba(s: &str) -> MotionResult<[u8; 4]> {
    let s = s.trim();
    let hex = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> MotionResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| MotionError::scene_load(format!("invalid hex byte \"{pair}\"")))
    }

    if !hex.is_ascii() {
        return Err(MotionError::scene_load(format!("invalid hex color \"{s}\"")));
    }
    match hex.len() {
        6 => Ok([
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
            255,
        ]),
        8 => Ok([
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
            hex_byte(&hex[6..8])?,
        ]),
        _ => Err(MotionError::scene_load(
            "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
        )),
    }
}
