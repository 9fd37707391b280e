//! Pegasus Flight - a 2D flight game simulation
//!
//! Core modules:
//! - `sim`: Simulation engine (entities, aerodynamics, collisions, world loop)
//! - `settings`: Runtime configuration
//! - `error`: Error types for scene loading and world lifecycle

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SceneError, SettingsError, WorldError};
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Pacing sleep between simulation ticks (milliseconds)
    pub const TICK_INTERVAL_MS: u64 = 16;
    /// One FPS accounting window
    pub const FPS_WINDOW: std::time::Duration = std::time::Duration::from_secs(1);
    /// Frames buffered for a presenter that renders every frame
    pub const FRAME_QUEUE_CAPACITY: usize = 64;

    /// World defaults
    pub const DEFAULT_GRAVITY: (f64, f64) = (0.0, 0.1);
    pub const DEFAULT_WORLD_SPEED: f64 = 1.0;

    /// Pegasus defaults
    pub const DEFAULT_AGILITY: f64 = 0.05;
    pub const DEFAULT_DRAG: (f64, f64) = (0.01, 0.1);
    pub const DEFAULT_LIFT: f64 = 0.005;

    /// Cloud default bounciness
    pub const DEFAULT_BOUNCE: f64 = 0.01;

    /// Camera follow factor per tick
    pub const DEFAULT_CAMERA_SPEED: f64 = 0.1;

    /// Name that marks the finish hoop
    pub const FINISH_NAME: &str = "Finish";
}

/// Wrap an angle into (-π, π] by adding or subtracting one full turn.
///
/// Assumes the angle overshot by less than a full turn, which holds for any
/// per-tick steering delta.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    if angle > PI {
        angle - TAU
    } else if angle <= -PI {
        angle + TAU
    } else {
        angle
    }
}

/// Bearing of a vector, counter-clockwise positive in y-down space.
///
/// The zero vector has bearing 0 so coincident bodies never produce NaN.
#[inline]
pub fn direction(v: DVec2) -> f64 {
    if v == DVec2::ZERO {
        0.0
    } else {
        -v.y.atan2(v.x)
    }
}

/// Unit vector for a bearing, inverse of [`direction`]
#[inline]
pub fn unit_at(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), -angle.sin())
}
