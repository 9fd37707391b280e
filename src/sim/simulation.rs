//! Single-threaded simulation state and the per-tick update
//!
//! Update order each tick: player input, then the pegasus, then every other
//! entity in collection order. Obstacles therefore always see the pegasus
//! state already advanced for the current tick.

use glam::DVec2;
use serde::Serialize;

use super::entity::{Body, Entity, EntityKind};
use super::player::Player;
use super::present::{EntityView, HudView, RenderFrame, RenderItem, ViewKind};
use crate::SceneError;
use crate::consts::{DEFAULT_GRAVITY, DEFAULT_WORLD_SPEED};

/// World-wide physical constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Environment {
    /// Constant force added to the pegasus each tick
    pub gravity: DVec2,
    /// Time scale applied to every integration step
    pub speed: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: DVec2::new(DEFAULT_GRAVITY.0, DEFAULT_GRAVITY.1),
            speed: DEFAULT_WORLD_SPEED,
        }
    }
}

/// Score counter shared by all hoops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub points: u64,
    /// Set once the finish hoop has been passed
    pub finished: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub env: Environment,
    entities: Vec<Entity>,
    /// Index of the single pegasus, if the scene has one
    pegasus: Option<usize>,
    #[serde(skip)]
    player: Option<Player>,
    pub score: Score,
    /// Completed ticks
    pub ticks: u64,
}

impl Simulation {
    pub fn new(env: Environment, entities: Vec<Entity>) -> Result<Self, SceneError> {
        if !env.speed.is_finite() {
            return Err(SceneError::InvalidSpeed(env.speed));
        }
        let mut pegasus = None;
        for (index, entity) in entities.iter().enumerate() {
            if matches!(entity.kind, EntityKind::Pegasus(_)) {
                if pegasus.is_some() {
                    return Err(SceneError::DuplicatePegasus { index });
                }
                pegasus = Some(index);
            }
        }
        Ok(Self {
            env,
            entities,
            pegasus,
            player: None,
            score: Score::default(),
            ticks: 0,
        })
    }

    pub fn set_player(&mut self, player: Player) {
        self.player = Some(player);
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn pegasus(&self) -> Option<&Entity> {
        self.pegasus.map(|i| &self.entities[i])
    }

    /// Look up an entity by its scene name
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
    }

    /// Advance the whole world by one tick
    pub fn tick(&mut self) {
        self.ticks += 1;

        // Everything else reacts to the pegasus; without one nothing moves
        let Some(p) = self.pegasus else {
            return;
        };
        let (before, rest) = self.entities.split_at_mut(p);
        let Some((pegasus, after)) = rest.split_first_mut() else {
            return;
        };
        let Entity {
            body: pegasus_body,
            kind: EntityKind::Pegasus(params),
            ..
        } = pegasus
        else {
            return;
        };

        if let Some(player) = &self.player {
            player.simulate(params, pegasus_body);
        }
        params.simulate(pegasus_body, &self.env);

        for (index, other) in before.iter_mut().enumerate() {
            simulate_other(index, other, pegasus_body, &self.env, &mut self.score);
        }
        for (offset, other) in after.iter_mut().enumerate() {
            simulate_other(p + 1 + offset, other, pegasus_body, &self.env, &mut self.score);
        }
    }

    /// Snapshot for the presentation layer: HUD, pegasus, then the rest
    pub fn frame(&self, fps: Option<u32>) -> RenderFrame {
        let mut items = Vec::with_capacity(self.entities.len() + 1);
        if self.player.is_some() {
            items.push(RenderItem::Hud(HudView {
                score: self.score.points,
                finished: self.score.finished,
                fps,
            }));
        }
        if let Some(p) = self.pegasus {
            items.push(RenderItem::Entity(view(p, &self.entities[p])));
        }
        items.extend(
            self.entities
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != self.pegasus)
                .map(|(i, e)| RenderItem::Entity(view(i, e))),
        );
        RenderFrame {
            tick: self.ticks,
            items,
        }
    }
}

fn simulate_other(
    index: usize,
    other: &mut Entity,
    pegasus: &mut Body,
    env: &Environment,
    score: &mut Score,
) {
    let Entity { name, body, kind } = other;
    match kind {
        EntityKind::Cloud(cloud) => cloud.simulate(body, pegasus, env),
        EntityKind::Hoop(hoop) => {
            if hoop.simulate(body, pegasus) {
                score.points += 1;
                if hoop.is_finish {
                    score.finished = true;
                    log::info!("Finish hoop passed, score {}", score.points);
                } else {
                    log::info!(
                        "Hoop {} ({}) passed, score {}",
                        index,
                        name.as_deref().unwrap_or("unnamed"),
                        score.points
                    );
                }
            }
        }
        EntityKind::Camera(camera) => camera.simulate(body, pegasus),
        // Only one pegasus exists; it was simulated above
        EntityKind::Pegasus(_) => {}
    }
}

fn view(index: usize, entity: &Entity) -> EntityView {
    let kind = match &entity.kind {
        EntityKind::Pegasus(p) => ViewKind::Pegasus {
            facing_left: p.facing_left,
            wings_spread: p.wings_spread,
        },
        EntityKind::Cloud(_) => ViewKind::Cloud,
        EntityKind::Hoop(h) => ViewKind::Hoop {
            visited: h.is_visited,
            finish: h.is_finish,
        },
        EntityKind::Camera(_) => ViewKind::Camera,
    };
    EntityView {
        index,
        name: entity.name.clone(),
        position: entity.body.position,
        angle: entity.body.angle,
        size: entity.body.size(),
        kind,
    }
}
