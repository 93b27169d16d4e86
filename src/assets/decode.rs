use std::path::Path;

use anyhow::Context;

use crate::assets::store::PreparedImage;
use crate::foundation::error::{MotionError, MotionResult};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> MotionResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul,
    })
}

/// Read and decode an image file.
///
/// A missing file is reported as `asset not found: <path>`; undecodable bytes keep the decoder
/// message.
pub fn decode_image_file(path: &Path) -> MotionResult<PreparedImage> {
    if !path.is_file() {
        return Err(MotionError::asset(format!(
            "asset not found: {}",
            path.display()
        )));
    }
    let bytes = std::fs::read(path)
        .map_err(|e| MotionError::asset(format!("read '{}': {e}", path.display())))?;
    decode_image(&bytes)
        .map_err(|e| MotionError::asset(format!("decode '{}': {e}", path.display())))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
