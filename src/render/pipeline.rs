use std::iter::FusedIterator;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8Premul};
use crate::foundation::error::{MotionError, MotionResult};
use crate::render::composite::draw_scene;
use crate::render::frame::FrameRGBA;
use crate::render::surface::Surface;
use crate::scene::scene::Scene;

/// Slack added to the duration so the boundary frame survives floating-point error.
pub const SAMPLE_EPSILON: f64 = 1e-9;

/// Largest number of samples a single pass (or a single-frame replay) may take.
///
/// About 3.8 days of output at 30 fps.
pub const MAX_FRAMES: u64 = 10_000_000;

/// Output settings for a render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOpts {
    /// Output dimensions.
    pub canvas: Canvas,
    /// Sampling rate; frame `k` is sampled at `k / fps`.
    pub fps: Fps,
    /// Background color every frame is cleared to (straight RGBA8).
    pub bg_rgba: [u8; 4],
    /// Overrides the scene's total duration when set.
    pub duration: Option<f64>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 640,
                height: 480,
            },
            fps: Fps { num: 30, den: 1 },
            bg_rgba: [255, 255, 255, 255],
            duration: None,
        }
    }
}

impl RenderOpts {
    /// Reject zero-sized canvases, zero fps and bad duration overrides.
    pub fn validate(&self) -> MotionResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        if let Some(d) = self.duration
            && (!d.is_finite() || d < 0.0)
        {
            return Err(MotionError::export(format!(
                "duration override must be finite and >= 0 (got {d})"
            )));
        }
        Ok(())
    }

    /// Duration to sample: the override if any, else the scene's total duration.
    pub fn resolve_duration(&self, scene: &Scene) -> f64 {
        self.duration.unwrap_or_else(|| scene.total_duration())
    }

    /// Number of frames a pass over `scene` yields, rejecting passes above [`MAX_FRAMES`].
    pub fn frames_for(&self, scene: &Scene) -> MotionResult<u64> {
        self.validate()?;
        checked_frame_count("duration", self.resolve_duration(scene), self.fps)
    }

    fn bg_premul(&self) -> Rgba8Premul {
        let [r, g, b, a] = self.bg_rgba;
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}

/// Time of sample `k`, computed directly as `k / fps`.
pub fn sample_time(k: u64, fps: Fps) -> f64 {
    fps.frames_to_secs(k)
}

/// Number of samples `t_k = k / fps` with `t_k <= duration + SAMPLE_EPSILON`.
///
/// Equals `floor(duration * fps) + 1` for any non-negative duration; saturates at `u64::MAX`.
pub fn frame_count(duration: f64, fps: Fps) -> u64 {
    let limit = duration.max(0.0) + SAMPLE_EPSILON;
    let mut last = (limit * fps.as_f64()).floor().max(0.0) as u64;
    while let Some(next) = last.checked_add(1)
        && sample_time(next, fps) <= limit
    {
        last = next;
    }
    while last > 0 && sample_time(last, fps) > limit {
        last -= 1;
    }
    last.saturating_add(1)
}

fn checked_frame_count(what: &str, secs: f64, fps: Fps) -> MotionResult<u64> {
    let count = frame_count(secs, fps);
    if count > MAX_FRAMES {
        return Err(MotionError::export(format!(
            "{what} {secs}s at {}/{} fps needs {count} samples (limit {MAX_FRAMES})",
            fps.num, fps.den
        )));
    }
    Ok(count)
}

/// Lazy, finite frame sequence produced by [`render`].
///
/// Borrows the scene mutably for its whole life and cannot be restarted; call [`render`] again
/// for a fresh pass.
pub struct Frames<'a> {
    scene: &'a mut Scene,
    canvas: Canvas,
    bg: Rgba8Premul,
    fps: Fps,
    next: u64,
    count: u64,
}

impl Frames<'_> {
    /// Total number of frames this pass yields.
    pub fn total(&self) -> u64 {
        self.count
    }
}

impl Iterator for Frames<'_> {
    type Item = (FrameIndex, FrameRGBA);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let k = self.next;
        self.next += 1;

        let mut surface = Surface::new(self.canvas, self.bg);
        draw_scene(self.scene, &mut surface, sample_time(k, self.fps));
        Some((FrameIndex(k), surface.into_frame()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.count - self.next).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}

/// Start a render pass over `scene`.
///
/// Sprites are reset to their load-time state first, so repeated passes are identical.
pub fn render<'a>(scene: &'a mut Scene, opts: &RenderOpts) -> MotionResult<Frames<'a>> {
    let count = opts.frames_for(scene)?;
    let duration = opts.resolve_duration(scene);
    tracing::debug!(duration, frames = count, "sampling scene");

    scene.reset();
    Ok(Frames {
        scene,
        canvas: opts.canvas,
        bg: opts.bg_premul(),
        fps: opts.fps,
        next: 0,
        count,
    })
}

/// Render a single frame at time `t`.
///
/// The sampling grid before `t` is replayed first so values frozen by earlier samples match
/// what a full export shows at the same time.
pub fn render_frame_at(scene: &mut Scene, opts: &RenderOpts, t: f64) -> MotionResult<FrameRGBA> {
    opts.validate()?;
    if !t.is_finite() || t < 0.0 {
        return Err(MotionError::export(format!(
            "sample time must be finite and >= 0 (got {t})"
        )));
    }
    checked_frame_count("sample time", t, opts.fps)?;

    scene.reset();
    let mut k = 0u64;
    while sample_time(k, opts.fps) < t {
        scene.update(sample_time(k, opts.fps));
        k += 1;
    }

    let mut surface = Surface::new(opts.canvas, opts.bg_premul());
    draw_scene(scene, &mut surface, t);
    Ok(surface.into_frame())
}

/// Counters reported by [`export`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExportStats {
    /// Frames handed to the sink.
    pub frames: u64,
    /// Sampled duration in seconds.
    pub duration_secs: f64,
}

/// Render every frame of `scene` into `sink`.
#[tracing::instrument(skip(scene, sink), fields(sprites = scene.len()))]
pub fn export(
    scene: &mut Scene,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> MotionResult<ExportStats> {
    let duration_secs = opts.resolve_duration(scene);
    let frames = render(scene, opts)?;
    let total = frames.total();

    sink.begin(SinkConfig {
        width: opts.canvas.width,
        height: opts.canvas.height,
        fps: opts.fps,
    })?;
    for (idx, frame) in frames {
        sink.push_frame(idx, &frame)?;
    }
    sink.end()?;

    tracing::info!(frames = total, duration_secs, "export finished");
    Ok(ExportStats {
        frames: total,
        duration_secs,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
