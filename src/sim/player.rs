//! Player input: held-key latches turned into steering each tick
//!
//! Key events arrive on the presentation thread while the simulation thread
//! reads the latches, so they are plain atomics shared through an `Arc`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::entity::Body;
use super::pegasus::Pegasus;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    Escape,
    Other,
}

#[derive(Debug, Default)]
struct Latches {
    left: AtomicBool,
    right: AtomicBool,
    space: AtomicBool,
}

/// Cloneable, thread-safe sink for key events
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    latches: Arc<Latches>,
}

impl InputHandle {
    pub fn key_down(&self, key: Key) {
        self.set(key, true);
    }

    pub fn key_up(&self, key: Key) {
        self.set(key, false);
    }

    /// Release every held key (e.g. on focus loss)
    pub fn release_all(&self) {
        self.set(Key::Left, false);
        self.set(Key::Right, false);
        self.set(Key::Space, false);
    }

    fn set(&self, key: Key, down: bool) {
        let latch = match key {
            Key::Left => &self.latches.left,
            Key::Right => &self.latches.right,
            Key::Space => &self.latches.space,
            Key::Escape | Key::Other => return,
        };
        latch.store(down, Ordering::Relaxed);
    }
}

/// Current state of the flight keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub space: bool,
}

/// Steers the pegasus from the latched controls
#[derive(Debug, Clone, Default)]
pub struct Player {
    input: InputHandle,
}

impl Player {
    pub fn new(input: InputHandle) -> Self {
        Self { input }
    }

    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    pub fn controls(&self) -> Controls {
        let latches = &self.input.latches;
        Controls {
            left: latches.left.load(Ordering::Relaxed),
            right: latches.right.load(Ordering::Relaxed),
            space: latches.space.load(Ordering::Relaxed),
        }
    }

    /// Runs before the pegasus integrates, so turns apply to this tick.
    ///
    /// Left and right are independent: holding both applies both deltas.
    pub fn simulate(&self, pegasus: &mut Pegasus, body: &mut Body) {
        let controls = self.controls();
        if controls.left {
            body.angle += pegasus.agility;
        }
        if controls.right {
            body.angle -= pegasus.agility;
        }
        pegasus.wings_spread = controls.space;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn setup() -> (Player, Pegasus, Body) {
        let pegasus = Pegasus {
            agility: 0.1,
            ..Default::default()
        };
        let body = Body::new(DVec2::ZERO, DVec2::new(20.0, 10.0), 0.0);
        (Player::default(), pegasus, body)
    }

    #[test]
    fn test_latches_follow_key_events() {
        let (player, _, _) = setup();
        let input = player.input().clone();
        input.key_down(Key::Left);
        input.key_down(Key::Space);
        assert_eq!(
            player.controls(),
            Controls {
                left: true,
                right: false,
                space: true
            }
        );
        input.key_up(Key::Left);
        input.key_down(Key::Escape);
        assert_eq!(
            player.controls(),
            Controls {
                left: false,
                right: false,
                space: true
            }
        );
        input.release_all();
        assert_eq!(player.controls(), Controls::default());
    }

    #[test]
    fn test_steering_and_wings() {
        let (player, mut pegasus, mut body) = setup();
        player.input().key_down(Key::Right);
        player.input().key_down(Key::Space);
        player.simulate(&mut pegasus, &mut body);
        assert!((body.angle + 0.1).abs() < 1e-12);
        assert!(pegasus.wings_spread);

        player.input().key_up(Key::Space);
        player.simulate(&mut pegasus, &mut body);
        assert!(!pegasus.wings_spread);
    }

    #[test]
    fn test_both_directions_apply_additively() {
        let (player, mut pegasus, mut body) = setup();
        body.angle = 0.3;
        player.input().key_down(Key::Left);
        player.input().key_down(Key::Right);
        player.simulate(&mut pegasus, &mut body);
        assert_eq!(body.angle, 0.3 + 0.1 - 0.1);
    }

    #[test]
    fn test_input_from_another_thread() {
        let (player, _, _) = setup();
        let input = player.input().clone();
        std::thread::spawn(move || input.key_down(Key::Right))
            .join()
            .unwrap();
        assert!(player.controls().right);
    }
}
