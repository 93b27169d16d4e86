use std::collections::BTreeMap;
use std::sync::Arc;

use crate::animation::instruction::Instruction;
use crate::assets::store::PreparedImage;
use crate::foundation::core::Vec2;
use crate::foundation::error::{MotionError, MotionResult};
use crate::scene::scene::Scene;
use crate::scene::sprite::Sprite;

/// Programmatic scene construction with the same validation as the JSON loader.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    sprites: BTreeMap<String, Sprite>,
}

impl SceneBuilder {
    /// Start an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a sprite. Names must be unique.
    pub fn sprite(
        mut self,
        name: &str,
        image: Arc<PreparedImage>,
        initial_position: Vec2,
    ) -> MotionResult<Self> {
        if name.is_empty() {
            return Err(MotionError::scene_load("sprite name must be non-empty"));
        }
        if self.sprites.contains_key(name) {
            return Err(MotionError::scene_load(format!(
                "duplicate sprite name '{name}'"
            )));
        }
        self.sprites
            .insert(name.to_owned(), Sprite::new(name, image, initial_position));
        Ok(self)
    }

    /// Attach an instruction to a declared sprite, after any it already has.
    pub fn instruction(mut self, target: &str, inst: Instruction) -> MotionResult<Self> {
        let sprite = self.sprites.get_mut(target).ok_or_else(|| {
            MotionError::scene_load(format!(
                "target sprite '{target}' not declared in 'sprites'"
            ))
        })?;
        sprite.push_instruction(inst);
        Ok(self)
    }

    pub(crate) fn initial_position(&self, name: &str) -> Option<Vec2> {
        self.sprites.get(name).map(Sprite::initial_position)
    }

    /// Finish the scene and fix its total duration.
    pub fn build(self) -> MotionResult<Scene> {
        Ok(Scene::from_parts(self.sprites))
    }
}
