//! Error types
//!
//! Scene loading and world lifecycle are the only fallible surfaces; the
//! per-tick simulation itself never fails.

use thiserror::Error;

/// Errors produced while turning a scene description into a simulation.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown entity kind `{0}`")]
    UnknownKind(String),

    #[error("scene declares more than one pegasus (second at entity {index})")]
    DuplicatePegasus { index: usize },

    #[error("entity {index} has a negative size component")]
    NegativeSize { index: usize },

    #[error("entity {index}: parameter `{name}` is not finite")]
    NonFinite { index: usize, name: String },

    #[error("world speed must be finite, got {0}")]
    InvalidSpeed(f64),

    #[error("failed to parse scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from driving a [`World`](crate::sim::World).
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world has been disposed")]
    Disposed,

    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Errors from loading [`Settings`](crate::Settings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}
