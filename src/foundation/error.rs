/// Convenience result type used across spritemotion.
pub type MotionResult<T> = Result<T, MotionError>;

/// Top-level error taxonomy.
///
/// Every variant is raised at a load or export boundary. Frame sampling itself never fails.
#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    /// Malformed scene JSON, missing fields, unknown instruction types or unresolved targets.
    #[error("scene load error: {0}")]
    SceneLoad(String),

    /// Image file missing or undecodable.
    #[error("asset error: {0}")]
    Asset(String),

    /// Frame sink unavailable or failing (unsupported extension, missing encoder, IO).
    #[error("export error: {0}")]
    Export(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    /// Build a [`MotionError::SceneLoad`] value.
    pub fn scene_load(msg: impl Into<String>) -> Self {
        Self::SceneLoad(msg.into())
    }

    /// Build a [`MotionError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`MotionError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
