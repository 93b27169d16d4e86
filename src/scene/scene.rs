use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::assets::store::AssetCache;
use crate::foundation::error::{MotionError, MotionResult};
use crate::scene::dsl::SceneBuilder;
use crate::scene::model::SceneDef;
use crate::scene::sprite::Sprite;

/// Named sprites plus the total animation length.
///
/// Sprites are keyed by name in a sorted map, so iteration (and therefore draw order) is
/// lexicographic by name regardless of declaration order.
#[derive(Clone, Debug)]
pub struct Scene {
    sprites: BTreeMap<String, Sprite>,
    total_duration: f64,
}

impl Scene {
    pub(crate) fn from_parts(sprites: BTreeMap<String, Sprite>) -> Self {
        let total_duration = sprites.values().map(Sprite::end_time).fold(0.0, f64::max);
        Self {
            sprites,
            total_duration,
        }
    }

    /// Parse scene JSON from `r`, resolving images through `assets`.
    pub fn from_reader<R: std::io::Read>(r: R, assets: &mut AssetCache) -> MotionResult<Self> {
        let def: SceneDef = serde_json::from_reader(r)
            .map_err(|e| MotionError::scene_load(format!("parse scene JSON: {e}")))?;
        Self::from_def(&def, assets)
    }

    /// Load scene JSON from `path`, resolving images through `assets`.
    #[tracing::instrument(skip(assets), fields(assets_root = %assets.root().display()))]
    pub fn from_path(path: &Path, assets: &mut AssetCache) -> MotionResult<Self> {
        let f = File::open(path).map_err(|e| {
            MotionError::scene_load(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        let scene = Self::from_reader(BufReader::new(f), assets)?;
        tracing::debug!(
            sprites = scene.len(),
            images = assets.len(),
            duration = scene.total_duration,
            "scene loaded"
        );
        Ok(scene)
    }

    /// Build from an already-parsed description.
    pub fn from_def(def: &SceneDef, assets: &mut AssetCache) -> MotionResult<Self> {
        let mut b = SceneBuilder::new();
        for s in &def.sprites {
            let image = assets.load(&s.image)?;
            b = b.sprite(&s.name, image, s.initial_position())?;
        }
        for (i, d) in def.instructions.iter().enumerate() {
            let initial = b.initial_position(&d.target).ok_or_else(|| {
                MotionError::scene_load(format!(
                    "instruction {i}: target sprite '{}' not declared in 'sprites'",
                    d.target
                ))
            })?;
            let inst = d.to_instruction(initial).map_err(|e| match e {
                MotionError::SceneLoad(msg) => {
                    MotionError::scene_load(format!("instruction {i}: {msg}"))
                }
                other => other,
            })?;
            b = b.instruction(&d.target, inst)?;
        }
        b.build()
    }

    /// Sprites in name order.
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.values()
    }

    /// Sprite by name.
    pub fn sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    /// Number of sprites.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether the scene has no sprites.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// `max(start + duration)` over all instructions, fixed at load.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// Apply every sprite's instructions at `t`.
    pub fn update(&mut self, t: f64) {
        for sprite in self.sprites.values_mut() {
            sprite.update(t);
        }
    }

    /// Restore every sprite to its load-time state.
    pub fn reset(&mut self) {
        for sprite in self.sprites.values_mut() {
            sprite.reset();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scene.rs"]
mod tests;
