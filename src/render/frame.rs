use crate::foundation::math::mul_div255_u16;

/// A rendered frame as RGBA8 pixels.
///
/// Frames leave the sampler **premultiplied**; sinks convert to whatever their container needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha RGBA8 pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel_straight(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        if self.premultiplied {
            unpremultiply(&mut px);
        }
        Some(px)
    }

    /// Copy of the pixel data as straight-alpha RGBA8.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let mut p = [px[0], px[1], px[2], px[3]];
                unpremultiply(&mut p);
                px.copy_from_slice(&p);
            }
        }
        out
    }

    /// Flatten over an opaque straight-alpha `bg` into opaque RGBA8 (alpha always 255).
    pub fn flatten_to_opaque_rgba8(&self, bg_rgba: [u8; 4], dst: &mut [u8]) {
        let bg_r = bg_rgba[0] as u16;
        let bg_g = bg_rgba[1] as u16;
        let bg_b = bg_rgba[2] as u16;

        for (d, s) in dst.chunks_exact_mut(4).zip(self.data.chunks_exact(4)) {
            let a = s[3] as u16;
            if a == 255 {
                d.copy_from_slice(s);
                d[3] = 255;
                continue;
            }

            let inv = 255u16 - a;
            let (r, g, b) = if self.premultiplied {
                (
                    s[0] as u16 + mul_div255_u16(bg_r, inv),
                    s[1] as u16 + mul_div255_u16(bg_g, inv),
                    s[2] as u16 + mul_div255_u16(bg_b, inv),
                )
            } else {
                (
                    mul_div255_u16(s[0] as u16, a) + mul_div255_u16(bg_r, inv),
                    mul_div255_u16(s[1] as u16, a) + mul_div255_u16(bg_g, inv),
                    mul_div255_u16(s[2] as u16, a) + mul_div255_u16(bg_b, inv),
                )
            };

            d[0] = r.min(255) as u8;
            d[1] = g.min(255) as u8;
            d[2] = b.min(255) as u8;
            d[3] = 255;
        }
    }
}

fn unpremultiply(px: &mut [u8; 4]) {
    let a = u32::from(px[3]);
    if a == 0 {
        *px = [0, 0, 0, 0];
        return;
    }
    if a == 255 {
        return;
    }
    for c in px.iter_mut().take(3) {
        *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
    }
}
