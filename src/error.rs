//! Error types for the arena.
//!
//! Geometry never produces errors (degenerate contacts are simply "no
//! collision"); these only surface at API edges.

use std::path::PathBuf;

use thiserror::Error;

use crate::physics::BodyHandle;

/// Rigid-body world errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Handle refers to a body that was removed or never existed
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(BodyHandle),

    /// Mass must be a positive, finite number
    #[error("Invalid body mass: {0}")]
    InvalidMass(f32),
}

/// Configuration loading / validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level errors raised while bringing the game up
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error("SDL2: {0}")]
    Sdl(String),

    #[error("Window: {0}")]
    Window(String),

    #[error("Shader: {0}")]
    Shader(String),
}
