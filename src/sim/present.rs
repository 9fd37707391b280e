//! Presentation hand-off
//!
//! The simulation thread never touches the presentation layer directly.
//! After each tick it snapshots everything a renderer needs into a
//! [`RenderFrame`] and posts it into a bounded buffer; the presentation
//! thread drains the buffer on its own schedule and feeds each item to a
//! [`Presenter`]. A presenter that falls behind loses the oldest frames.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use glam::DVec2;

/// Visual state of one entity for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    /// Index in the world's entity collection
    pub index: usize,
    pub name: Option<String>,
    pub position: DVec2,
    pub angle: f64,
    pub size: DVec2,
    pub kind: ViewKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewKind {
    Pegasus { facing_left: bool, wings_spread: bool },
    Cloud,
    Hoop { visited: bool, finish: bool },
    Camera,
}

/// Player overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudView {
    pub score: u64,
    pub finished: bool,
    /// Present only when the FPS counter is enabled
    pub fps: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    Hud(HudView),
    Entity(EntityView),
}

/// Everything rendered for one completed tick, in draw order:
/// HUD, pegasus, then the remaining entities in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub tick: u64,
    pub items: Vec<RenderItem>,
}

/// Presentation-side consumer of render items
pub trait Presenter {
    fn render(&mut self, item: &RenderItem);

    /// Called once after all items of a frame
    fn end_frame(&mut self, _tick: u64) {}
}

/// Presenter that records frames, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub items: Vec<RenderItem>,
    pub frames: Vec<u64>,
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, item: &RenderItem) {
        self.items.push(item.clone());
    }

    fn end_frame(&mut self, tick: u64) {
        self.frames.push(tick);
    }
}

/// Bounded frame buffer shared by the simulation and presentation threads.
/// Holds at most `capacity` frames; posting to a full buffer evicts the oldest.
pub(crate) fn channel(capacity: usize) -> (FrameSender, FrameQueue) {
    let capacity = capacity.max(1);
    let buffer = Arc::new(Mutex::new(VecDeque::with_capacity(capacity)));
    (
        FrameSender {
            buffer: Arc::downgrade(&buffer),
            capacity,
        },
        FrameQueue { buffer },
    )
}

type FrameBuffer = Mutex<VecDeque<RenderFrame>>;

fn lock(buffer: &FrameBuffer) -> MutexGuard<'_, VecDeque<RenderFrame>> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Simulation-side end of the frame buffer
#[derive(Debug)]
pub(crate) struct FrameSender {
    buffer: Weak<FrameBuffer>,
    capacity: usize,
}

impl FrameSender {
    /// Post a frame without waiting. Returns false once the queue is gone.
    pub(crate) fn post(&self, frame: RenderFrame) -> bool {
        let Some(buffer) = self.buffer.upgrade() else {
            return false;
        };
        let mut frames = lock(&buffer);
        while frames.len() >= self.capacity {
            if let Some(stale) = frames.pop_front() {
                log::trace!("Presentation behind, frame {} dropped", stale.tick);
            }
        }
        frames.push_back(frame);
        true
    }
}

/// Presentation-side end of the frame buffer
#[derive(Debug)]
pub struct FrameQueue {
    buffer: Arc<FrameBuffer>,
}

impl FrameQueue {
    /// Render every queued frame in order. Returns the number of frames.
    pub fn drain(&self, presenter: &mut impl Presenter) -> usize {
        let frames = self.take();
        for frame in &frames {
            present(frame, presenter);
        }
        frames.len()
    }

    /// Render only the newest queued frame, dropping older ones.
    pub fn drain_latest(&self, presenter: &mut impl Presenter) -> Option<u64> {
        let frame = self.take().pop_back()?;
        present(&frame, presenter);
        Some(frame.tick)
    }

    /// Frames waiting to be presented
    pub fn pending(&self) -> usize {
        lock(&self.buffer).len()
    }

    // Rendering happens outside the lock so posting never waits on a presenter
    fn take(&self) -> VecDeque<RenderFrame> {
        std::mem::take(&mut *lock(&self.buffer))
    }
}

fn present(frame: &RenderFrame, presenter: &mut impl Presenter) {
    for item in &frame.items {
        presenter.render(item);
    }
    presenter.end_frame(frame.tick);
}
