//! Procedural course generation
//!
//! Lays out a left-to-right course: the pegasus at the start with the
//! camera on it, a wavy line of hoops ending in the finish hoop, and clouds
//! scattered between them. Deterministic per seed.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::scene::{EntityDescription, SceneDescription};
use crate::consts::FINISH_NAME;

/// Horizontal spacing between consecutive hoops
pub const HOOP_SPACING: f64 = 600.0;
/// Maximum vertical offset of a hoop from the start line
pub const HOOP_AMPLITUDE: f64 = 250.0;
/// Clouds placed between each pair of hoops
pub const CLOUDS_PER_GAP: usize = 2;

const HOOP_SIZE: DVec2 = DVec2::new(24.0, 140.0);
const PEGASUS_SIZE: DVec2 = DVec2::new(64.0, 32.0);

/// Generate a course with `hoops` hoops (at least one, the finish)
pub fn generate_course(seed: u64, hoops: usize) -> SceneDescription {
    let mut rng = Pcg32::seed_from_u64(seed);
    let hoops = hoops.max(1);

    let mut entities = vec![
        EntityDescription::new("pegasus", DVec2::ZERO, PEGASUS_SIZE).named("Pegasus"),
        EntityDescription::new("camera", DVec2::ZERO, DVec2::ZERO).named("Camera"),
    ];

    let mut previous = DVec2::ZERO;
    for i in 0..hoops {
        let x = (i + 1) as f64 * HOOP_SPACING;
        let y = rng.random_range(-HOOP_AMPLITUDE..=HOOP_AMPLITUDE);
        let position = DVec2::new(x, y);

        // Clouds sit off the straight line between hoops so a direct path stays open
        for _ in 0..CLOUDS_PER_GAP {
            let t = rng.random_range(0.35..0.65);
            let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let along = previous.lerp(position, t);
            let offset = rng.random_range(140.0..260.0) * side;
            let size = DVec2::new(rng.random_range(120.0..260.0), rng.random_range(60.0..120.0));
            entities.push(
                EntityDescription::new("cloud", along + DVec2::new(0.0, offset), size)
                    .with_param("bounce", rng.random_range(0.005..0.02)),
            );
        }

        let mut hoop = EntityDescription::new("hoop", position, HOOP_SIZE)
            .with_angle(rng.random_range(-0.3..0.3));
        hoop = if i + 1 == hoops {
            hoop.named(FINISH_NAME)
        } else {
            hoop.named(format!("Hoop{}", i + 1))
        };
        entities.push(hoop);
        previous = position;
    }

    log::debug!("Generated course: seed {seed}, {hoops} hoops, {} entities", entities.len());

    SceneDescription {
        entities,
        ..Default::default()
    }
}
