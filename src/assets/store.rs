use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::assets::decode::decode_image_file;
use crate::foundation::error::MotionResult;

/// Decoded raster image in premultiplied RGBA8 form. Never mutated after decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

impl PreparedImage {
    /// Build an image filled with a single premultiplied color.
    pub fn solid(width: u32, height: u32, rgba8_premul: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&rgba8_premul);
        }
        Self {
            width,
            height,
            rgba8_premul: data,
        }
    }
}

/// Image cache keyed by the exact `image` string from the scene description.
///
/// Sprites that name the same file share one [`Arc<PreparedImage>`]; IO and decoding happen
/// once, at scene load.
#[derive(Clone, Debug)]
pub struct AssetCache {
    root: PathBuf,
    images: HashMap<String, Arc<PreparedImage>>,
}

impl AssetCache {
    /// Create an empty cache resolving file names against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    /// Directory image names are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the cached image for `name`, decoding `root/name` on first use.
    pub fn load(&mut self, name: &str) -> MotionResult<Arc<PreparedImage>> {
        if let Some(img) = self.images.get(name) {
            return Ok(Arc::clone(img));
        }
        let path = self.root.join(name);
        let img = Arc::new(decode_image_file(&path)?);
        tracing::debug!(
            image = name,
            width = img.width,
            height = img.height,
            "decoded sprite image"
        );
        self.images.insert(name.to_owned(), Arc::clone(&img));
        Ok(img)
    }

    /// Register an already-decoded image under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, img: PreparedImage) -> Arc<PreparedImage> {
        let img = Arc::new(img);
        self.images.insert(name.into(), Arc::clone(&img));
        img
    }

    /// Cached image for `name`, if loaded.
    pub fn get(&self, name: &str) -> Option<&Arc<PreparedImage>> {
        self.images.get(name)
    }

    /// Number of distinct images held.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
