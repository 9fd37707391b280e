//! Clouds: immovable obstacles that bounce the pegasus away

use serde::Serialize;

use super::entity::{Body, are_nearby, distance};
use super::simulation::Environment;
use crate::consts::DEFAULT_BOUNCE;

#[derive(Debug, Clone, Serialize)]
pub struct Cloud {
    /// Impulse per unit of penetration depth
    pub bounce: f64,
}

impl Default for Cloud {
    fn default() -> Self {
        Self {
            bounce: DEFAULT_BOUNCE,
        }
    }
}

impl Cloud {
    /// Push an overlapping pegasus out along the center line.
    ///
    /// The impulse grows with penetration depth; the cloud itself never moves.
    pub fn simulate(&self, body: &Body, pegasus: &mut Body, env: &Environment) {
        if !are_nearby(Some(body), Some(pegasus)) {
            return;
        }
        let distance = distance(Some(body), Some(pegasus));
        if distance > 0.0 {
            return;
        }
        pegasus.velocity += (pegasus.position - body.position) * -distance * self.bounce * env.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn env() -> Environment {
        Environment {
            gravity: DVec2::ZERO,
            speed: 1.0,
        }
    }

    #[test]
    fn test_overlap_pushes_pegasus_away() {
        let cloud = Cloud { bounce: 1.0 };
        let body = Body::new(DVec2::ZERO, DVec2::new(100.0, 100.0), 0.0);
        let mut pegasus = Body::new(DVec2::new(5.0, 0.0), DVec2::new(20.0, 20.0), 0.0);

        cloud.simulate(&body, &mut pegasus, &env());
        assert!(pegasus.velocity.x > 0.0);
        // (5, 0) * 55 penetration
        assert!((pegasus.velocity.x - 275.0).abs() < 1e-9);
        assert!(pegasus.velocity.y.abs() < 1e-9);
        assert_eq!(body.position, DVec2::ZERO);
    }

    #[test]
    fn test_separated_pegasus_untouched() {
        let cloud = Cloud { bounce: 1.0 };
        let body = Body::new(DVec2::ZERO, DVec2::new(100.0, 100.0), 0.0);
        let mut pegasus = Body::new(DVec2::new(200.0, 0.0), DVec2::new(20.0, 20.0), 0.0);

        cloud.simulate(&body, &mut pegasus, &env());
        assert_eq!(pegasus.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_nearby_but_not_touching_untouched() {
        // Bounding circles overlap at the corner, ellipses do not
        let cloud = Cloud { bounce: 1.0 };
        let body = Body::new(DVec2::ZERO, DVec2::new(100.0, 10.0), 0.0);
        let mut pegasus = Body::new(DVec2::new(0.0, 40.0), DVec2::new(20.0, 20.0), 0.0);

        assert!(are_nearby(Some(&body), Some(&pegasus)));
        cloud.simulate(&body, &mut pegasus, &env());
        assert_eq!(pegasus.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_impulse_scales_with_world_speed() {
        let cloud = Cloud { bounce: 0.5 };
        let body = Body::new(DVec2::ZERO, DVec2::new(100.0, 100.0), 0.0);
        let mut slow = Body::new(DVec2::new(5.0, 0.0), DVec2::new(20.0, 20.0), 0.0);
        let mut fast = slow.clone();

        let slow_env = Environment { speed: 0.5, ..env() };
        cloud.simulate(&body, &mut slow, &slow_env);
        cloud.simulate(&body, &mut fast, &env());
        assert!((fast.velocity.x - 2.0 * slow.velocity.x).abs() < 1e-9);
    }
}
