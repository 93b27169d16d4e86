//! spritemotion renders declaratively described 2D sprite animations to video or image files.
//!
//! A scene is a set of named sprites, each owning an ordered list of time-windowed
//! [`Instruction`]s (entry, exit, move, fade). Rendering samples the timeline at a fixed frame
//! rate and composites every visible sprite onto a fresh canvas per frame.
//!
//! # Pipeline overview
//!
//! 1. **Load**: scene JSON + image directory -> [`Scene`] (images decoded once into an [`AssetCache`])
//! 2. **Sample**: for `t_k = k / fps`, every sprite applies its instructions in declaration order
//! 3. **Composite**: sprites are drawn in name order onto a [`Surface`] cleared to the background
//! 4. **Export**: frames stream into a [`FrameSink`] (GIF, PNG sequence, or `ffmpeg` video)
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce identical frames; draw order never depends on
//!   declaration or hash order.
//! - **Fail early**: all validation happens at load and export boundaries; sampling is infallible.
//! - **Premultiplied RGBA8** inside the renderer; sinks convert at the edge.
//!
//! # Example
//!
//! ```no_run
//! use spritemotion::{Animation, AnimationOpts};
//!
//! # fn main() -> spritemotion::MotionResult<()> {
//! let mut anim = Animation::new("assets", "scene.json", AnimationOpts::default())?;
//! println!("{}", anim.summary());
//! anim.export("out.gif", None)?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod foundation;
mod render;
mod scene;
mod session;

/// Frame sinks and output-format dispatch.
pub mod encode;

pub use animation::ease::Ease;
pub use animation::instruction::{Instruction, InstructionKind};
pub use assets::color::parse_hex_rgba;
pub use assets::decode::{decode_image, decode_image_file};
pub use assets::store::{AssetCache, PreparedImage};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::image_seq::{GifSink, PngSequenceSink};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig, SinkKind, sink_for_path};
pub use foundation::core::{Canvas, Fps, FrameIndex, Rgba8Premul, Vec2};
pub use foundation::error::{MotionError, MotionResult};
pub use render::composite::{PremulRgba8, draw_scene, over};
pub use render::frame::FrameRGBA;
pub use render::pipeline::{
    ExportStats, Frames, MAX_FRAMES, RenderOpts, SAMPLE_EPSILON, export, frame_count, render,
    render_frame_at, sample_time,
};
pub use render::surface::Surface;
pub use scene::dsl::SceneBuilder;
pub use scene::model::{InstructionDef, SceneDef, SpriteDef};
pub use scene::scene::Scene;
pub use scene::sprite::{Sprite, SpriteState};
pub use session::animation::{Animation, AnimationOpts};
