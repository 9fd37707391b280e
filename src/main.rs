//! Pegasus Flight native entry point
//!
//! Headless driver: builds a world from a scene file (or a generated course),
//! flies a short scripted input sequence and presents frames on the main
//! thread through a logging presenter.
//!
//! Usage: `pegasus-flight [scene.json] [seconds]`

use std::time::{Duration, Instant};

use pegasus_flight::Settings;
use pegasus_flight::sim::{
    GameSession, Key, Presenter, RenderItem, SceneDescription, ViewKind, generate_course,
};

const SETTINGS_PATH: &str = "pegasus-settings.json";
const DEFAULT_SECONDS: u64 = 5;
const COURSE_HOOPS: usize = 6;

/// Logs the HUD and pegasus once per presented frame
#[derive(Default)]
struct LogPresenter {
    frames: u64,
}

impl Presenter for LogPresenter {
    fn render(&mut self, item: &RenderItem) {
        match item {
            RenderItem::Hud(hud) => log::trace!(
                "HUD score={} finished={} fps={:?}",
                hud.score,
                hud.finished,
                hud.fps
            ),
            RenderItem::Entity(view) => {
                if let ViewKind::Pegasus {
                    facing_left,
                    wings_spread,
                } = view.kind
                {
                    log::trace!(
                        "Pegasus at ({:.1}, {:.1}) angle {:.2} facing {} wings {}",
                        view.position.x,
                        view.position.y,
                        view.angle,
                        if facing_left { "left" } else { "right" },
                        if wings_spread { "spread" } else { "folded" }
                    );
                }
            }
        }
    }

    fn end_frame(&mut self, _tick: u64) {
        self.frames += 1;
    }
}

/// Scripted input: (seconds from start, key, pressed)
const SCRIPT: &[(f64, Key, bool)] = &[
    (0.5, Key::Space, true),
    (1.0, Key::Left, true),
    (1.4, Key::Left, false),
    (2.5, Key::Right, true),
    (2.8, Key::Right, false),
    (3.5, Key::Space, false),
];

fn main() {
    env_logger::init();
    log::info!("Pegasus Flight (native) starting...");

    let mut args = std::env::args().skip(1);
    let scene = match args.next() {
        Some(path) => match SceneDescription::load(&path) {
            Ok(scene) => scene,
            Err(e) => {
                log::error!("Could not load scene {path}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            let seed = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            log::info!("No scene given, generating course with seed {seed}");
            generate_course(seed, COURSE_HOOPS)
        }
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let settings = Settings::load_or_default(SETTINGS_PATH);
    let frame_pause = Duration::from_millis(settings.tick_interval_ms.max(1));
    let mut session = GameSession::new(settings);
    if let Err(e) = session.new_game(&scene) {
        log::error!("Could not start game: {e}");
        std::process::exit(1);
    }

    let mut presenter = LogPresenter::default();
    let started = Instant::now();
    let mut script = SCRIPT.iter().peekable();
    while started.elapsed() < Duration::from_secs(seconds) {
        let t = started.elapsed().as_secs_f64();
        while let Some(&&(at, key, pressed)) = script.peek() {
            if at > t {
                break;
            }
            if pressed {
                if let Err(e) = session.handle_key_down(key) {
                    log::warn!("Key {key:?} ignored: {e}");
                }
            } else {
                session.handle_key_up(key);
            }
            script.next();
        }

        session.present(&mut presenter);
        std::thread::sleep(frame_pause);
    }

    if let Some(world) = session.world() {
        let score = world.score();
        log::info!(
            "Flight over: score {}, finished {}, {} FPS, {} frames presented",
            score.points,
            score.finished,
            world.fps(),
            presenter.frames
        );
        world.with_simulation(|sim| match serde_json::to_string(sim) {
            Ok(json) => log::debug!("Final state: {json}"),
            Err(e) => log::warn!("Could not serialize final state: {e}"),
        });
    }
    session.destroy_scene();
}
