//! Threaded world: runs the simulation at a fixed pace on its own thread
//!
//! The simulation thread is the only writer of entity state. Lifecycle calls
//! (start/stop/dispose) come from the presentation thread and talk to the
//! loop exclusively through the [`RunGate`]. Rendering is handed back as
//! frame snapshots through a bounded buffer, so the loop never waits on
//! presentation.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use super::player::{InputHandle, Player};
use super::present::{self, FrameQueue, FrameSender, Presenter};
use super::scene::SceneDescription;
use super::simulation::{Score, Simulation};
use crate::consts::{FPS_WINDOW, FRAME_QUEUE_CAPACITY};
use crate::{Settings, WorldError};

#[derive(Debug, Default)]
struct GateState {
    open: bool,
    disposed: bool,
}

/// Binary pause/resume signal. Blocks the loop while closed.
#[derive(Debug, Default)]
pub struct RunGate {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl RunGate {
    pub fn open(&self) -> Result<(), WorldError> {
        self.update(|s| s.open = true)
    }

    pub fn close(&self) -> Result<(), WorldError> {
        self.update(|s| s.open = false)
    }

    /// Release every waiter for good. Idempotent.
    pub fn dispose(&self) {
        let mut state = self.lock();
        state.disposed = true;
        state.open = false;
        self.changed.notify_all();
    }

    pub fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    /// Block until the gate is open. Returns false once disposed.
    pub fn wait(&self) -> bool {
        let mut state = self.lock();
        loop {
            if state.disposed {
                return false;
            }
            if state.open {
                return true;
            }
            state = match self.changed.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    fn update(&self, f: impl FnOnce(&mut GateState)) -> Result<(), WorldError> {
        let mut state = self.lock();
        if state.disposed {
            return Err(WorldError::Disposed);
        }
        f(&mut state);
        self.changed.notify_all();
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Once-per-second tick counter
#[derive(Debug)]
struct FpsCounter {
    epoch: Instant,
    ticks: u32,
}

impl FpsCounter {
    fn new(epoch: Instant) -> Self {
        Self { epoch, ticks: 0 }
    }

    /// Move the window start; ticks already counted stay in the next report
    fn restart(&mut self, epoch: Instant) {
        self.epoch = epoch;
    }

    /// Count one tick at `now`. Returns the completed count when a second
    /// has elapsed since the epoch; the epoch then advances by exactly one
    /// window so slow ticks never accumulate drift.
    fn record(&mut self, now: Instant) -> Option<u32> {
        self.ticks += 1;
        if now.duration_since(self.epoch) > FPS_WINDOW {
            let fps = self.ticks;
            self.ticks = 0;
            self.epoch += FPS_WINDOW;
            Some(fps)
        } else {
            None
        }
    }
}

/// State shared between the world handle and its simulation thread
#[derive(Debug)]
struct Shared {
    gate: RunGate,
    simulation: Mutex<Simulation>,
    /// Set by `start` so the loop moves its FPS window
    epoch: Mutex<Option<Instant>>,
    fps: AtomicU32,
    running: AtomicBool,
    show_fps: bool,
}

impl Shared {
    fn lock_simulation(&self) -> MutexGuard<'_, Simulation> {
        self.simulation.lock().unwrap_or_else(|poisoned| {
            log::warn!("Simulation lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// A populated world with its own simulation thread
#[derive(Debug)]
pub struct World {
    shared: Arc<Shared>,
    input: InputHandle,
    frames: FrameQueue,
    coalesce_frames: bool,
    thread: Option<JoinHandle<()>>,
}

impl World {
    /// Build the world from a scene and park its thread until [`World::start`].
    pub fn new(scene: &SceneDescription, settings: &Settings) -> Result<Self, WorldError> {
        let mut simulation = scene.build()?;
        let input = InputHandle::default();
        simulation.set_player(Player::new(input.clone()));
        Self::with_simulation_state(simulation, input, settings)
    }

    /// Wrap an already-built simulation. Its player, if any, keeps its own input.
    pub fn from_simulation(simulation: Simulation, settings: &Settings) -> Result<Self, WorldError> {
        let input = simulation
            .player()
            .map(|p| p.input().clone())
            .unwrap_or_default();
        Self::with_simulation_state(simulation, input, settings)
    }

    fn with_simulation_state(
        simulation: Simulation,
        input: InputHandle,
        settings: &Settings,
    ) -> Result<Self, WorldError> {
        log::info!(
            "World created: {} entities, pegasus {}",
            simulation.entities().len(),
            if simulation.pegasus().is_some() { "present" } else { "absent" }
        );

        let shared = Arc::new(Shared {
            gate: RunGate::default(),
            simulation: Mutex::new(simulation),
            epoch: Mutex::new(None),
            fps: AtomicU32::new(0),
            running: AtomicBool::new(false),
            show_fps: settings.show_fps,
        });
        let capacity = if settings.coalesce_frames {
            1
        } else {
            FRAME_QUEUE_CAPACITY
        };
        let (sender, frames) = present::channel(capacity);
        let interval = Duration::from_millis(settings.tick_interval_ms);

        let loop_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("pegasus-sim".into())
            .spawn(move || run_loop(&loop_shared, &sender, interval))
            .map_err(WorldError::Spawn)?;

        Ok(Self {
            shared,
            input,
            frames,
            coalesce_frames: settings.coalesce_frames,
            thread: Some(thread),
        })
    }

    /// Resume ticking; the FPS window restarts from now
    pub fn start(&self) -> Result<(), WorldError> {
        if self.shared.gate.is_disposed() {
            return Err(WorldError::Disposed);
        }
        *self
            .shared
            .epoch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Instant::now());
        self.shared.gate.open()?;
        self.shared.running.store(true, Ordering::Release);
        log::debug!("World started");
        Ok(())
    }

    /// Pause after the tick in progress, if any
    pub fn stop(&self) -> Result<(), WorldError> {
        self.shared.gate.close()?;
        self.shared.running.store(false, Ordering::Release);
        log::debug!("World stopped");
        Ok(())
    }

    /// Stop the simulation thread for good and wait for it to exit
    pub fn dispose(&mut self) {
        self.shared.gate.dispose();
        self.shared.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Simulation thread panicked");
            }
            log::debug!("World disposed");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.gate.is_disposed()
    }

    /// Ticks completed during the last full second
    pub fn fps(&self) -> u32 {
        self.shared.fps.load(Ordering::Relaxed)
    }

    pub fn score(&self) -> Score {
        self.shared.lock_simulation().score
    }

    /// Key event sink for the player
    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    /// Inspect the simulation between ticks
    pub fn with_simulation<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.shared.lock_simulation())
    }

    /// Render queued frames on the calling (presentation) thread.
    ///
    /// With frame coalescing enabled only the newest frame is rendered.
    pub fn present(&self, presenter: &mut impl Presenter) -> usize {
        if self.coalesce_frames {
            self.frames.drain_latest(presenter).map_or(0, |_| 1)
        } else {
            self.frames.drain(presenter)
        }
    }

    pub fn frames(&self) -> &FrameQueue {
        &self.frames
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Ask the OS for the highest priority available to the calling thread.
/// Returns false when the request is refused; the loop runs either way.
fn raise_priority() -> bool {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use thread_priority::{ThreadPriority, set_current_thread_priority};
        match set_current_thread_priority(ThreadPriority::Max) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not raise simulation thread priority: {e:?}");
                false
            }
        }
    }
    #[cfg(target_arch = "wasm32")]
    {
        false
    }
}

fn run_loop(shared: &Shared, sender: &FrameSender, interval: Duration) {
    if raise_priority() {
        log::debug!("Simulation thread priority raised");
    }
    let mut fps = FpsCounter::new(Instant::now());
    while shared.gate.wait() {
        let now = Instant::now();
        if let Some(epoch) = shared
            .epoch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            fps.restart(epoch);
        }

        let frame = {
            let mut simulation = shared.lock_simulation();
            simulation.tick();
            let shown = shared.show_fps.then(|| shared.fps.load(Ordering::Relaxed));
            simulation.frame(shown)
        };
        if !sender.post(frame) {
            log::trace!("Frame queue closed, frame dropped");
        }

        if let Some(count) = fps.record(now) {
            shared.fps.store(count, Ordering::Relaxed);
            log::debug!("{count} FPS");
        }

        std::thread::sleep(interval);
    }
    log::debug!("Simulation thread exiting");
}
