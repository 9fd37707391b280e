//! Simulation engine
//!
//! All gameplay logic lives here:
//! - Entities share one `Body` and differ only in their `EntityKind`
//! - Stable update order: player, pegasus, then entities in scene order
//! - Entities get the world state as call parameters, never store it
//! - No rendering dependencies; presentation receives frame snapshots

pub mod camera;
pub mod cloud;
pub mod course;
pub mod entity;
pub mod hoop;
pub mod pegasus;
pub mod player;
pub mod present;
pub mod scene;
pub mod session;
pub mod simulation;
pub mod world;

pub use camera::Camera;
pub use cloud::Cloud;
pub use course::generate_course;
pub use entity::{
    Body, Entity, EntityKind, are_nearby, distance, ellipse_radius, ellipse_radius_at_angle,
};
pub use hoop::Hoop;
pub use pegasus::Pegasus;
pub use player::{Controls, InputHandle, Key, Player};
pub use present::{
    EntityView, FrameQueue, HudView, Presenter, RecordingPresenter, RenderFrame, RenderItem,
    ViewKind,
};
pub use scene::{EntityDescription, EntityFactory, EntityRegistry, Params, SceneDescription};
pub use session::GameSession;
pub use simulation::{Environment, Score, Simulation};
pub use world::{RunGate, World};
