use crate::animation::ease::Ease;
use crate::foundation::core::Vec2;
use crate::foundation::error::{MotionError, MotionResult};
use crate::foundation::math::lerp;
use crate::scene::sprite::SpriteState;

/// What an [`Instruction`] does to its sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InstructionKind {
    /// Put the sprite on the canvas at `position`.
    Entry {
        /// Position written when the entry fires.
        position: Vec2,
    },
    /// Take the sprite off the canvas.
    Exit,
    /// Interpolate position from `from` to `to` across the window.
    Move {
        /// Position at progress 0.
        from: Vec2,
        /// Position at progress 1.
        to: Vec2,
    },
    /// Interpolate opacity from `from` to `to` across the window.
    Fade {
        /// Opacity at progress 0.
        from: u8,
        /// Opacity at progress 1.
        to: u8,
    },
}

impl InstructionKind {
    /// Lowercase name as used in scene JSON.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Entry { .. } => "entry",
            Self::Exit => "exit",
            Self::Move { .. } => "move",
            Self::Fade { .. } => "fade",
        }
    }
}

/// A time-windowed change applied to one sprite.
///
/// Instructions are immutable once built. The window is `[start, start + duration]`; a
/// zero-duration instruction is an instantaneous event at `start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instruction {
    kind: InstructionKind,
    start: f64,
    duration: f64,
    ease: Ease,
}

impl Instruction {
    /// Build a validated instruction. `start` and `duration` must be finite and `>= 0`.
    pub fn new(kind: InstructionKind, start: f64, duration: f64) -> MotionResult<Self> {
        if !start.is_finite() || start < 0.0 {
            return Err(MotionError::scene_load(format!(
                "{} instruction start must be finite and >= 0 (got {start})",
                kind.name()
            )));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(MotionError::scene_load(format!(
                "{} instruction duration must be finite and >= 0 (got {duration})",
                kind.name()
            )));
        }
        Ok(Self {
            kind,
            start,
            duration,
            ease: Ease::Linear,
        })
    }

    /// Instantaneous entry at `start`.
    pub fn entry(start: f64, position: Vec2) -> MotionResult<Self> {
        Self::new(InstructionKind::Entry { position }, start, 0.0)
    }

    /// Instantaneous exit at `start`.
    pub fn exit(start: f64) -> MotionResult<Self> {
        Self::new(InstructionKind::Exit, start, 0.0)
    }

    /// Linear move over `[start, start + duration]`.
    pub fn move_between(start: f64, duration: f64, from: Vec2, to: Vec2) -> MotionResult<Self> {
        Self::new(InstructionKind::Move { from, to }, start, duration)
    }

    /// Opacity fade over `[start, start + duration]`.
    pub fn fade(start: f64, duration: f64, from: u8, to: u8) -> MotionResult<Self> {
        Self::new(InstructionKind::Fade { from, to }, start, duration)
    }

    /// Replace the progress remap (default [`Ease::Linear`]).
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Instruction payload.
    pub fn kind(&self) -> &InstructionKind {
        &self.kind
    }

    /// Window start in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Window length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Window end in seconds (`start + duration`).
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Progress remap.
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Normalized progress `u` at `t`, or `None` before `start`.
    ///
    /// Zero-duration instructions report `u = 1` for every `t >= start`.
    pub fn progress(&self, t: f64) -> Option<f64> {
        if t < self.start {
            return None;
        }
        if self.duration == 0.0 {
            return Some(1.0);
        }
        Some(((t - self.start) / self.duration).clamp(0.0, 1.0))
    }

    /// Whether `t` lies inside the closed window `[start, start + duration]`.
    pub fn in_window(&self, t: f64) -> bool {
        self.start <= t && t <= self.end()
    }

    /// Apply this instruction to `state` at time `t`.
    ///
    /// Entry/Exit latch for every `t >= start`. Move/Fade only write inside their window, so
    /// outside it the state keeps whatever was last written.
    pub fn apply(&self, state: &mut SpriteState, t: f64) {
        let Some(u) = self.progress(t) else {
            return;
        };

        match self.kind {
            InstructionKind::Entry { position } => {
                state.on_canvas = true;
                state.position = position;
            }
            InstructionKind::Exit => {
                state.on_canvas = false;
            }
            InstructionKind::Move { from, to } => {
                if !self.in_window(t) {
                    return;
                }
                let e = self.ease.apply(u);
                state.position = Vec2::new(lerp(from.x, to.x, e), lerp(from.y, to.y, e));
            }
            InstructionKind::Fade { from, to } => {
                if !self.in_window(t) {
                    return;
                }
                let e = self.ease.apply(u);
                let v = lerp(f64::from(from), f64::from(to), e).round();
                state.opacity = v.clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/instruction.rs"]
mod tests;
