//! Player-flown pegasus: aerodynamic force model
//!
//! Forces are evaluated in the body frame (forward along the heading, "up"
//! perpendicular to it on the back side of the wings) and integrated with
//! one explicit Euler step per tick, scaled by the world speed.

use glam::DVec2;
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

use super::entity::Body;
use super::simulation::Environment;
use crate::consts::{DEFAULT_AGILITY, DEFAULT_DRAG, DEFAULT_LIFT};
use crate::{normalize_angle, unit_at};

#[derive(Debug, Clone, Serialize)]
pub struct Pegasus {
    /// Heading change per tick of held steering input (radians)
    pub agility: f64,
    /// Quadratic drag coefficients (forward, lateral)
    pub drag: DVec2,
    /// Lift coefficient against forward speed squared
    pub lift: f64,
    /// Per-component velocity clamp
    pub max_speed: Option<f64>,
    pub wings_spread: bool,
    /// Derived from the heading after each tick; read by the next tick
    pub facing_left: bool,
}

impl Default for Pegasus {
    fn default() -> Self {
        Self {
            agility: DEFAULT_AGILITY,
            drag: DVec2::new(DEFAULT_DRAG.0, DEFAULT_DRAG.1),
            lift: DEFAULT_LIFT,
            max_speed: None,
            wings_spread: false,
            facing_left: false,
        }
    }
}

impl Pegasus {
    /// Net force on the body for the current heading and velocity
    pub fn force(&self, body: &Body, env: &Environment) -> DVec2 {
        let u_fw = unit_at(body.angle);
        let side = if self.facing_left { -1.0 } else { 1.0 };
        let u_up = unit_at(body.angle + side * FRAC_PI_2);

        let v_fw = body.velocity.dot(u_fw);
        let v_up = body.velocity.dot(-u_up);

        let f_drag = -u_fw * v_fw * v_fw.abs() * self.drag.x + u_up * v_up * v_up.abs() * self.drag.y;
        let f_lift = u_up * v_fw * v_fw * self.lift;

        f_drag + env.gravity + f_lift
    }

    /// Advance one tick
    pub fn simulate(&mut self, body: &mut Body, env: &Environment) {
        let mut velocity = body.velocity + self.force(body, env) * env.speed;

        if velocity.x.is_nan() {
            velocity.x = 0.0;
        }
        if velocity.y.is_nan() {
            velocity.y = 0.0;
        }
        if let Some(max) = self.max_speed {
            velocity = velocity.clamp(DVec2::splat(-max), DVec2::splat(max));
        }

        body.velocity = velocity;
        body.position += velocity * env.speed;
        body.angle = normalize_angle(body.angle);

        self.facing_left = body.angle < -FRAC_PI_2 || body.angle > FRAC_PI_2;
    }
}
