use crate::assets::store::PreparedImage;
use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::render::composite::over;
use crate::render::frame::FrameRGBA;

/// Premultiplied RGBA8 raster that sprites are composited onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a surface cleared to `bg`.
    pub fn new(canvas: Canvas, bg: Rgba8Premul) -> Self {
        let mut s = Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.rgba_len()],
        };
        s.clear(bg);
        s
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied pixel bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Fill every pixel with `bg`.
    pub fn clear(&mut self, bg: Rgba8Premul) {
        let px = bg.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Source-over `img` with its top-left corner at `(x, y)`, alpha scaled by `opacity / 255`.
    ///
    /// The source buffer is only read; pixels outside the surface are clipped.
    pub fn draw_image(&mut self, img: &PreparedImage, x: i64, y: i64, opacity: u8) {
        if opacity == 0 || img.width == 0 || img.height == 0 {
            return;
        }

        let x0 = x.max(0);
        let y0 = y.max(0);
        // Positions may be anywhere in i64 range; bounds must not overflow.
        let x1 = x
            .saturating_add(i64::from(img.width))
            .min(i64::from(self.width));
        let y1 = y
            .saturating_add(i64::from(img.height))
            .min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let dst_stride = (self.width as usize) * 4;
        let src_stride = (img.width as usize) * 4;
        let run = ((x1 - x0) as usize) * 4;

        for dy in y0..y1 {
            let sy = (dy - y) as usize;
            let sx = (x0 - x) as usize;
            let s_off = sy * src_stride + sx * 4;
            let d_off = (dy as usize) * dst_stride + (x0 as usize) * 4;

            let src_row = &img.rgba8_premul[s_off..s_off + run];
            let dst_row = &mut self.data[d_off..d_off + run];
            for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
                d.copy_from_slice(&out);
            }
        }
    }

    /// Snapshot into a premultiplied [`FrameRGBA`].
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
            premultiplied: true,
        }
    }

    /// Convert into a premultiplied [`FrameRGBA`] without copying.
    pub fn into_frame(self) -> FrameRGBA {
        FrameRGBA {
            width: self.width,
            height: self.height,
            data: self.data,
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
