use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
use crate::encode::image_seq::{GifSink, PngSequenceSink};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{MotionError, MotionResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order. Sinks that
/// write files must not leave a partial artifact behind when any call fails.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> MotionResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MotionResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> MotionResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MotionResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MotionResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> MotionResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Output kinds selectable from a file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkKind {
    /// Animated GIF.
    Gif,
    /// Numbered PNG stills.
    PngSequence,
    /// Video through the system `ffmpeg`.
    Ffmpeg,
}

impl SinkKind {
    /// Classify `path` by extension (case-insensitive).
    pub fn from_path(path: &Path) -> MotionResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| {
                MotionError::export(format!(
                    "output path '{}' has no extension (expected .gif, .png, .mp4, .mov, .mkv or .webm)",
                    path.display()
                ))
            })?;
        match ext.as_str() {
            "gif" => Ok(Self::Gif),
            "png" => Ok(Self::PngSequence),
            "mp4" | "mov" | "mkv" | "webm" => Ok(Self::Ffmpeg),
            other => Err(MotionError::export(format!(
                "unsupported output extension '.{other}' (expected .gif, .png, .mp4, .mov, .mkv or .webm)"
            ))),
        }
    }
}

/// Build the sink matching `path`'s extension.
///
/// Backend availability is checked here, before any frame is rendered: video extensions fail
/// with an export error when `ffmpeg` is not on `PATH`.
pub fn sink_for_path(path: &Path, bg_rgba: [u8; 4]) -> MotionResult<Box<dyn FrameSink>> {
    match SinkKind::from_path(path)? {
        SinkKind::Gif => Ok(Box::new(GifSink::new(path))),
        SinkKind::PngSequence => Ok(Box::new(PngSequenceSink::new(path))),
        SinkKind::Ffmpeg => {
            if !is_ffmpeg_on_path() {
                return Err(MotionError::export(format!(
                    "ffmpeg is required to write '{}', but was not found on PATH",
                    path.display()
                )));
            }
            let mut opts = FfmpegSinkOpts::new(path);
            opts.bg_rgba = bg_rgba;
            Ok(Box::new(FfmpegSink::new(opts)))
        }
    }
}

/// Sibling temp path that is deleted on drop unless committed into its final location.
pub(crate) struct PartialOutput {
    tmp: Option<PathBuf>,
    dest: PathBuf,
}

impl PartialOutput {
    pub(crate) fn for_dest(dest: &Path) -> Self {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_owned());
        let tmp = dest.with_file_name(format!(".{name}.partial-{}", std::process::id()));
        Self {
            tmp: Some(tmp),
            dest: dest.to_path_buf(),
        }
    }

    pub(crate) fn tmp_path(&self) -> &Path {
        self.tmp.as_deref().unwrap_or(&self.dest)
    }

    /// Move the finished temp file over the destination.
    pub(crate) fn commit(mut self) -> MotionResult<()> {
        if let Some(tmp) = self.tmp.take() {
            std::fs::rename(&tmp, &self.dest).map_err(|e| {
                let _ = std::fs::remove_file(&tmp);
                MotionError::export(format!(
                    "move finished output into '{}': {e}",
                    self.dest.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Drop for PartialOutput {
    fn drop(&mut self) {
        if let Some(path) = self.tmp.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
