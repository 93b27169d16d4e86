use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::animation::instruction::Instruction;
use crate::foundation::core::Vec2;
use crate::foundation::error::{MotionError, MotionResult};

/// JSON-facing scene description.
///
/// ```json
/// {
///   "sprites": [
///     {"name": "hero1", "image": "hero.png", "initial_position": [0, 100]}
///   ],
///   "instructions": [
///     {"type": "entry", "target": "hero1", "start": 0.0},
///     {"type": "move", "target": "hero1", "from": [0, 100], "to": [300, 100], "start": 0.0, "duration": 2.0}
///   ]
/// }
/// ```
///
/// `animations` is accepted as a legacy spelling of `instructions`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    /// Declared sprites.
    #[serde(default)]
    pub sprites: Vec<SpriteDef>,
    /// Instructions in declaration order.
    #[serde(default, alias = "animations")]
    pub instructions: Vec<InstructionDef>,
}

/// One declared sprite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteDef {
    /// Unique name.
    pub name: String,
    /// Image file name, relative to the assets directory.
    pub image: String,
    /// Top-left corner before any instruction runs.
    #[serde(default)]
    pub initial_position: [f64; 2],
}

impl SpriteDef {
    pub(crate) fn initial_position(&self) -> Vec2 {
        Vec2::new(self.initial_position[0], self.initial_position[1])
    }
}

/// One declared instruction. `from`/`to` are interpreted per `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstructionDef {
    /// `move`, `fade`, `entry` or `exit`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Name of the sprite this instruction drives.
    pub target: String,
    /// Window start in seconds.
    pub start: f64,
    /// Window length in seconds.
    #[serde(default)]
    pub duration: f64,
    /// Start value (`move`: `[x, y]`, `fade`: `0..=255`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<serde_json::Value>,
    /// End value (`move`: `[x, y]`, `fade`: `0..=255`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<serde_json::Value>,
    /// Entry position; defaults to the sprite's initial position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    /// Progress remap for `move`/`fade`.
    #[serde(default)]
    pub ease: Ease,
}

impl InstructionDef {
    /// Validate and convert into an [`Instruction`].
    pub(crate) fn to_instruction(&self, initial_position: Vec2) -> MotionResult<Instruction> {
        let inst = match self.kind.as_str() {
            "entry" => {
                let position = self
                    .position
                    .map(|p| Vec2::new(p[0], p[1]))
                    .unwrap_or(initial_position);
                Instruction::entry(self.start, position)?
            }
            "exit" => Instruction::exit(self.start)?,
            "move" => {
                let from = self.vec2_param("from", self.from.as_ref())?;
                let to = self.vec2_param("to", self.to.as_ref())?;
                Instruction::move_between(self.start, self.duration, from, to)?
            }
            "fade" => {
                let from = self.opacity_param("from", self.from.as_ref())?;
                let to = self.opacity_param("to", self.to.as_ref())?;
                Instruction::fade(self.start, self.duration, from, to)?
            }
            other => {
                return Err(MotionError::scene_load(format!(
                    "unknown instruction type '{other}' (expected move, fade, entry or exit)"
                )));
            }
        };
        Ok(inst.with_ease(self.ease))
    }

    fn vec2_param(&self, key: &str, v: Option<&serde_json::Value>) -> MotionResult<Vec2> {
        let v = v.ok_or_else(|| {
            MotionError::scene_load(format!("{} instruction requires '{key}'", self.kind))
        })?;
        let [x, y]: [f64; 2] = serde_json::from_value(v.clone()).map_err(|e| {
            MotionError::scene_load(format!(
                "{} '{key}' must be a [x, y] number pair: {e}",
                self.kind
            ))
        })?;
        if !x.is_finite() || !y.is_finite() {
            return Err(MotionError::scene_load(format!(
                "{} '{key}' must be finite",
                self.kind
            )));
        }
        Ok(Vec2::new(x, y))
    }

    fn opacity_param(&self, key: &str, v: Option<&serde_json::Value>) -> MotionResult<u8> {
        let v = v.ok_or_else(|| {
            MotionError::scene_load(format!("{} instruction requires '{key}'", self.kind))
        })?;
        let n = v.as_i64().ok_or_else(|| {
            MotionError::scene_load(format!("{} '{key}' must be an integer", self.kind))
        })?;
        u8::try_from(n).map_err(|_| {
            MotionError::scene_load(format!(
                "{} '{key}' must be in [0, 255] (got {n})",
                self.kind
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
