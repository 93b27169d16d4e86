use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::assets::store::AssetCache;
use crate::encode::sink::sink_for_path;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::MotionResult;
use crate::render::frame::FrameRGBA;
use crate::render::pipeline::{ExportStats, RenderOpts, export, render_frame_at};
use crate::scene::scene::Scene;

/// Output settings for an [`Animation`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationOpts {
    /// Output dimensions (default 640x480).
    pub canvas: Canvas,
    /// Frame rate (default 30).
    pub fps: Fps,
    /// Background color, straight RGBA8 (default opaque white).
    pub bg_rgba: [u8; 4],
}

impl Default for AnimationOpts {
    fn default() -> Self {
        let d = RenderOpts::default();
        Self {
            canvas: d.canvas,
            fps: d.fps,
            bg_rgba: d.bg_rgba,
        }
    }
}

/// A loaded scene plus its output settings: load once, export to any supported path.
#[derive(Debug)]
pub struct Animation {
    scene: Scene,
    assets: AssetCache,
    scene_path: PathBuf,
    opts: AnimationOpts,
}

impl Animation {
    /// Load `scene_path`, resolving sprite images against `assets_dir`.
    pub fn new(
        assets_dir: impl Into<PathBuf>,
        scene_path: impl AsRef<Path>,
        opts: AnimationOpts,
    ) -> MotionResult<Self> {
        let scene_path = scene_path.as_ref().to_path_buf();
        let mut assets = AssetCache::new(assets_dir);
        let scene = Scene::from_path(&scene_path, &mut assets)?;
        Ok(Self {
            scene,
            assets,
            scene_path,
            opts,
        })
    }

    /// Wrap an already-built scene.
    pub fn from_scene(scene: Scene, assets: AssetCache, opts: AnimationOpts) -> Self {
        Self {
            scene,
            assets,
            scene_path: PathBuf::new(),
            opts,
        }
    }

    /// The loaded scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Image cache the scene was loaded through.
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    /// Output settings.
    pub fn opts(&self) -> &AnimationOpts {
        &self.opts
    }

    /// Scene duration in seconds, as computed at load.
    pub fn scene_duration(&self) -> f64 {
        self.scene.total_duration()
    }

    fn render_opts(&self, duration: Option<f64>) -> RenderOpts {
        RenderOpts {
            canvas: self.opts.canvas,
            fps: self.opts.fps,
            bg_rgba: self.opts.bg_rgba,
            duration,
        }
    }

    /// Render every frame and write them to `out_path`; the format follows the extension.
    ///
    /// `duration` overrides the scene duration. Options and the sink are resolved before any
    /// frame is rendered, so an unsupported extension, missing encoder or oversized pass writes
    /// nothing.
    #[tracing::instrument(
        skip_all,
        fields(scene = %self.scene_path.display(), out = %out_path.as_ref().display())
    )]
    pub fn export(
        &mut self,
        out_path: impl AsRef<Path>,
        duration: Option<f64>,
    ) -> MotionResult<ExportStats> {
        let out_path = out_path.as_ref();
        let opts = self.render_opts(duration);
        opts.frames_for(&self.scene)?;
        let mut sink = sink_for_path(out_path, self.opts.bg_rgba)?;
        export(&mut self.scene, &opts, sink.as_mut())
    }

    /// Render the single frame at time `t`.
    pub fn frame_at(&mut self, t: f64) -> MotionResult<FrameRGBA> {
        let opts = self.render_opts(None);
        render_frame_at(&mut self.scene, &opts, t)
    }

    /// Human-readable description of canvas, timing and sprites.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Canvas: {}x{} @ {} FPS",
            self.opts.canvas.width,
            self.opts.canvas.height,
            format_fps(self.opts.fps)
        );
        let _ = writeln!(out, "Sprites: {}", self.scene.len());
        let _ = write!(out, "Duration: {:.3}s", self.scene.total_duration());
        for sprite in self.scene.sprites() {
            let (w, h) = sprite.natural_size();
            let p = sprite.initial_position();
            let _ = write!(
                out,
                "\n - {}: size={w}x{h}, pos=({}, {})",
                sprite.name(),
                p.x,
                p.y
            );
        }
        out
    }
}

fn format_fps(fps: Fps) -> String {
    if fps.den == 1 {
        fps.num.to_string()
    } else {
        format!("{}/{}", fps.num, fps.den)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/animation.rs"]
mod tests;
