use std::sync::Arc;

use crate::animation::instruction::Instruction;
use crate::assets::store::PreparedImage;
use crate::foundation::core::Vec2;
use crate::render::surface::Surface;

/// Mutable per-sprite state written by instructions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteState {
    pub(crate) position: Vec2,
    pub(crate) opacity: u8,
    pub(crate) on_canvas: bool,
}

impl Default for SpriteState {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

impl SpriteState {
    /// Off-canvas, fully opaque state at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            opacity: 255,
            on_canvas: false,
        }
    }

    /// Top-left corner in canvas pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Opacity in `[0, 255]`.
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// Whether the sprite is drawn at all.
    pub fn on_canvas(&self) -> bool {
        self.on_canvas
    }
}

/// A named image plus the ordered instructions that animate it.
#[derive(Clone, Debug)]
pub struct Sprite {
    name: String,
    image: Arc<PreparedImage>,
    initial: SpriteState,
    state: SpriteState,
    instructions: Vec<Instruction>,
}

impl Sprite {
    /// Create an off-canvas sprite at `initial_position` with no instructions.
    pub fn new(name: impl Into<String>, image: Arc<PreparedImage>, initial_position: Vec2) -> Self {
        let initial = SpriteState::at(initial_position);
        Self {
            name: name.into(),
            image,
            initial,
            state: initial,
            instructions: Vec::new(),
        }
    }

    /// Append an instruction. Declaration order is the tie-break for overlapping windows.
    pub(crate) fn push_instruction(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    /// Unique sprite name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared source pixels.
    pub fn image(&self) -> &Arc<PreparedImage> {
        &self.image
    }

    /// Natural image size `(width, height)`.
    pub fn natural_size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// Current state.
    pub fn state(&self) -> &SpriteState {
        &self.state
    }

    /// Position the sprite was declared with.
    pub fn initial_position(&self) -> Vec2 {
        self.initial.position
    }

    /// Owned instructions in declaration order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Latest `start + duration` among this sprite's instructions.
    pub fn end_time(&self) -> f64 {
        self.instructions
            .iter()
            .map(Instruction::end)
            .fold(0.0, f64::max)
    }

    /// Restore the load-time state.
    pub fn reset(&mut self) {
        self.state = self.initial;
    }

    /// Apply every instruction at time `t`, in declaration order. Later writes win.
    pub fn update(&mut self, t: f64) {
        for inst in &self.instructions {
            inst.apply(&mut self.state, t);
        }
    }

    /// Composite onto `surface` at the current position, alpha scaled by opacity.
    ///
    /// Positions are truncated toward zero to whole pixels. No-op while off canvas.
    pub fn draw(&self, surface: &mut Surface) {
        if !self.state.on_canvas {
            return;
        }
        let x = self.state.position.x.trunc() as i64;
        let y = self.state.position.y.trunc() as i64;
        surface.draw_image(&self.image, x, y, self.state.opacity);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/sprite.rs"]
mod tests;
