use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, PartialOutput, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MotionError, MotionResult};
use crate::render::frame::FrameRGBA;

/// Frames collected between `begin` and `end`, validated for order and size.
#[derive(Debug, Default)]
struct FrameBuffer {
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames: Vec<Vec<u8>>,
}

impl FrameBuffer {
    fn begin(&mut self, cfg: SinkConfig) -> MotionResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(MotionError::export("sink width/height must be non-zero"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(MotionError::export("fps must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames.clear();
        Ok(())
    }

    fn push(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MotionResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| MotionError::export("sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(MotionError::export("sink received out-of-order frame index"));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(MotionError::export(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);
        self.frames.push(frame.to_straight_rgba8());
        Ok(())
    }

    fn take(&mut self) -> MotionResult<(SinkConfig, Vec<Vec<u8>>)> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| MotionError::export("sink not started"))?;
        self.last_idx = None;
        Ok((cfg, std::mem::take(&mut self.frames)))
    }
}

fn to_image(cfg: &SinkConfig, rgba: Vec<u8>) -> MotionResult<RgbaImage> {
    RgbaImage::from_raw(cfg.width, cfg.height, rgba)
        .ok_or_else(|| MotionError::export("frame.data size mismatch with width*height*4"))
}

/// Animated, infinitely looping GIF written in one go at `end`.
#[derive(Debug)]
pub struct GifSink {
    out_path: PathBuf,
    buf: FrameBuffer,
}

impl GifSink {
    /// Create a sink writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            buf: FrameBuffer::default(),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> MotionResult<()> {
        self.buf.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MotionResult<()> {
        self.buf.push(idx, frame)
    }

    fn end(&mut self) -> MotionResult<()> {
        let (cfg, frames) = self.buf.take()?;
        ensure_parent_dir(&self.out_path)?;

        let partial = PartialOutput::for_dest(&self.out_path);
        let gif_err = |e: image::ImageError| {
            MotionError::export(format!("encode gif '{}': {e}", self.out_path.display()))
        };
        {
            let f = File::create(partial.tmp_path()).map_err(|e| {
                MotionError::export(format!("create '{}': {e}", self.out_path.display()))
            })?;
            let mut enc = GifEncoder::new(BufWriter::new(f));
            enc.set_repeat(Repeat::Infinite).map_err(gif_err)?;
            // GIF delays have centisecond resolution; the encoder rounds.
            let delay = Delay::from_numer_denom_ms(1000 * cfg.fps.den, cfg.fps.num);
            for rgba in frames {
                let img = to_image(&cfg, rgba)?;
                enc.encode_frame(Frame::from_parts(img, 0, 0, delay))
                    .map_err(gif_err)?;
            }
        }
        partial.commit()
    }
}

/// Numbered PNG stills: `out.png` becomes `out_00000.png`, `out_00001.png`, ….
///
/// Stills are written only in `end`. If moving any of them into place fails, the ones already
/// moved are removed again. Numbered stills past the new last frame (left by a longer earlier
/// export to the same path) are deleted after a successful write.
#[derive(Debug)]
pub struct PngSequenceSink {
    out_path: PathBuf,
    buf: FrameBuffer,
}

impl PngSequenceSink {
    /// Create a sink deriving file names from `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            buf: FrameBuffer::default(),
        }
    }

    /// File name of frame `k`.
    pub fn frame_path(&self, k: usize) -> PathBuf {
        numbered_path(&self.out_path, k)
    }
}

fn numbered_path(base: &Path, k: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_owned());
    base.with_file_name(format!("{stem}_{k:05}.png"))
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> MotionResult<()> {
        self.buf.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MotionResult<()> {
        self.buf.push(idx, frame)
    }

    fn end(&mut self) -> MotionResult<()> {
        let (cfg, frames) = self.buf.take()?;
        ensure_parent_dir(&self.out_path)?;

        let mut partials = Vec::with_capacity(frames.len());
        for (k, rgba) in frames.into_iter().enumerate() {
            let partial = PartialOutput::for_dest(&self.frame_path(k));
            let img = to_image(&cfg, rgba)?;
            img.save_with_format(partial.tmp_path(), image::ImageFormat::Png)
                .map_err(|e| {
                    MotionError::export(format!(
                        "write png '{}': {e}",
                        self.frame_path(k).display()
                    ))
                })?;
            partials.push(partial);
        }
        // Every still encoded; only now do they take their final names.
        let total = partials.len();
        for (k, partial) in partials.into_iter().enumerate() {
            if let Err(e) = partial.commit() {
                for done in 0..k {
                    let _ = std::fs::remove_file(self.frame_path(done));
                }
                return Err(e);
            }
        }
        self.remove_stale_from(total);
        Ok(())
    }
}

impl PngSequenceSink {
    /// Remove numbered stills left by an earlier, longer export, starting at index `first`.
    fn remove_stale_from(&self, first: usize) {
        let mut k = first;
        loop {
            let path = self.frame_path(k);
            if !path.is_file() || std::fs::remove_file(&path).is_err() {
                break;
            }
            tracing::debug!(path = %path.display(), "removed stale still");
            k += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/image_seq.rs"]
mod tests;
