//! Hoops: one-shot scoring gates

use serde::Serialize;

use super::entity::{Body, are_nearby};
use crate::direction;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Hoop {
    /// Passing this hoop completes the course
    pub is_finish: bool,
    /// Latched on the first pass; visited hoops stay inert
    pub is_visited: bool,
}

impl Hoop {
    pub fn finish() -> Self {
        Self {
            is_finish: true,
            is_visited: false,
        }
    }

    /// Returns true on the tick the pegasus first passes through.
    pub fn simulate(&mut self, body: &Body, pegasus: &Body) -> bool {
        if self.is_visited || !are_nearby(Some(body), Some(pegasus)) {
            return false;
        }
        let offset = pegasus.position - body.position;
        if offset.length() < body.radius_toward(direction(offset)) {
            self.is_visited = true;
            return true;
        }
        false
    }
}
