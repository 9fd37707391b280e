//! Follow camera: eases toward the pegasus, no physics

use serde::Serialize;

use super::entity::Body;
use crate::consts::DEFAULT_CAMERA_SPEED;

#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    /// Fraction of the remaining gap closed each tick, in (0, 1)
    pub speed: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            speed: DEFAULT_CAMERA_SPEED,
        }
    }
}

impl Camera {
    pub fn simulate(&self, body: &mut Body, pegasus: &Body) {
        body.position += (pegasus.position - body.position) * self.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_closes_fraction_of_gap() {
        let camera = Camera { speed: 0.25 };
        let mut body = Body::new(DVec2::ZERO, DVec2::ZERO, 0.0);
        let pegasus = Body::new(DVec2::new(100.0, -40.0), DVec2::new(20.0, 20.0), 0.0);

        camera.simulate(&mut body, &pegasus);
        assert_eq!(body.position, DVec2::new(25.0, -10.0));
        camera.simulate(&mut body, &pegasus);
        assert_eq!(body.position, DVec2::new(43.75, -17.5));
    }

    #[test]
    fn test_converges_without_overshoot() {
        let camera = Camera::default();
        let mut body = Body::new(DVec2::ZERO, DVec2::ZERO, 0.0);
        let pegasus = Body::new(DVec2::new(10.0, 0.0), DVec2::ZERO, 0.0);
        for _ in 0..200 {
            camera.simulate(&mut body, &pegasus);
            assert!(body.position.x <= 10.0);
        }
        assert!((body.position.x - 10.0).abs() < 1e-6);
        assert_eq!(body.velocity, DVec2::ZERO);
    }
}
