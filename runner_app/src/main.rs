//! Headless runner simulation
//!
//! Drives a full session with a fixed-step clock and a simple autopilot in
//! place of a renderer, physics engine and player. Useful for tuning spawn
//! and speed settings without a window.
//!
//! Usage: `runner_sim [config.toml|config.ron] [max_seconds]`

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runner_engine::foundation::logging;
use runner_engine::prelude::*;

/// Horizontal position of the runner on screen
const PLAYER_X: f32 = -6.0;
/// Half width of the runner's hit box
const PLAYER_REACH: f32 = 0.6;
/// How far ahead the autopilot looks for obstacles
const LOOKAHEAD: f32 = 3.0;
/// Seconds a jump keeps the runner off the ground
const AIRTIME: f32 = 0.9;

#[derive(thiserror::Error, Debug)]
enum SimError {
    #[error(transparent)]
    Config(#[from] runner_engine::config::ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Invalid duration '{0}'")]
    Duration(String),
}

/// Host side of the session: nothing to open or reload without a window
struct HeadlessHost {
    quit_requested: bool,
}

impl HostServices for HeadlessHost {
    fn open_url(&mut self, url: &str) {
        log::info!("Would open {url}");
    }

    fn quit(&mut self) {
        self.quit_requested = true;
    }

    fn reload_scene(&mut self) {
        log::info!("Scene reload requested");
    }
}

/// Per-user data directory for the high score and preferences
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("runner_sim")
}

/// What the host's trigger colliders would report this frame
fn overlaps(session: &GameSession, airborne: bool) -> Vec<InstanceHandle> {
    let pool = session.pool();
    pool.active_instances()
        .filter(|(_, instance)| (instance.position.x - PLAYER_X).abs() <= PLAYER_REACH)
        .filter(|(_, instance)| {
            let is_obstacle = pool
                .prototype(instance.prototype)
                .is_some_and(|p| matches!(p.kind, EntityKind::Obstacle));
            !(is_obstacle && airborne)
        })
        .map(|(handle, _)| handle)
        .collect()
}

fn obstacle_ahead(session: &GameSession) -> bool {
    let pool = session.pool();
    let ahead = pool.active_instances().any(|(_, instance)| {
        let distance = instance.position.x - PLAYER_X;
        distance > PLAYER_REACH
            && distance < LOOKAHEAD
            && pool
                .prototype(instance.prototype)
                .is_some_and(|p| matches!(p.kind, EntityKind::Obstacle))
    });
    ahead
}

fn run() -> Result<(), SimError> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map_or_else(|| data_dir().join("runner.toml"), PathBuf::from);
    let max_seconds = match args.next() {
        Some(raw) => raw.parse::<f32>().map_err(|_| SimError::Duration(raw))?,
        None => 300.0,
    };

    let config = RunnerConfig::load_or_default(&config_path)?;
    logging::init(&config.engine.log_level);
    log::info!("Starting runner simulation ({} s max)", max_seconds);

    let step = config.engine.fixed_timestep;
    let mut autopilot = config
        .engine
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let mut session = GameSession::new(config, Box::new(SilentBackend))?;
    session.set_high_score_store(HighScoreStore::new(data_dir().join("high_score.ron")));
    session.set_preferences_store(PreferencesStore::new(data_dir().join("preferences.toml")));

    let recorder = EventRecorder::attach(
        session.bus_mut(),
        &[
            EventKind::CoinCollected,
            EventKind::PlayerHitObstacle,
            EventKind::PowerupPicked,
            EventKind::PlayerJumped,
            EventKind::PlayerDoubleJumped,
        ],
    );

    let mut host = HeadlessHost { quit_requested: false };
    if let Some(command) = session.handle_ui(UiAction::Start) {
        command.dispatch(&mut host);
    }

    let mut elapsed = 0.0;
    let mut airtime = 0.0_f32;
    let mut spawns = 0_usize;
    while elapsed < max_seconds && session.phase() != GamePhase::GameOver && !host.quit_requested {
        if session.tick(step).is_some() {
            spawns += 1;
        }
        elapsed += step;

        airtime = (airtime - step).max(0.0);
        session.set_grounded(airtime <= 0.0);
        if obstacle_ahead(&session) && airtime <= 0.0 && autopilot.gen_bool(0.08) {
            if let JumpOutcome::Jump(_) = session.jump(true) {
                airtime = AIRTIME;
            }
        }

        for handle in overlaps(&session, airtime > 0.0) {
            session.overlap(handle);
        }
    }

    let stats = session.stats();
    let recorder = recorder.borrow();
    log::info!(
        "Ran {:.1} s: {} spawns, {} coins, {} hits, {} power-ups, {} jumps",
        elapsed,
        spawns,
        recorder.count(EventKind::CoinCollected),
        recorder.count(EventKind::PlayerHitObstacle),
        recorder.count(EventKind::PowerupPicked),
        recorder.count(EventKind::PlayerJumped) + recorder.count(EventKind::PlayerDoubleJumped),
    );
    log::info!(
        "Final: score {} ({} m, {} coins), lives {}, best {}",
        stats.score,
        stats.distance.floor(),
        stats.coin_score,
        stats.lives,
        session.best_score()
    );
    if session.phase() == GamePhase::GameOver {
        let hud = session.hud();
        log::info!("{} / {}", hud.final_score_text(), hud.high_score_text());
    }
    if session.handler_faults() > 0 {
        log::warn!("{} handler faults during the run", session.handler_faults());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("runner_sim: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_session() -> GameSession {
        let mut config = RunnerConfig::default();
        config.engine.seed = Some(3);
        config.spawn.coin_interval = 1.0e6;
        config.spawn.power_up_interval = 1.0e6;
        config.spawn.obstacle_interval = 1.0e6;
        let mut session = GameSession::new(config, Box::new(SilentBackend)).unwrap();
        session.start().unwrap();
        session
    }

    #[test]
    fn test_autopilot_sees_obstacles_in_range() {
        let mut session = running_session();
        assert!(!obstacle_ahead(&session));

        session.place("coin", Vec2::new(PLAYER_X + 1.5, -2.5)).unwrap();
        assert!(!obstacle_ahead(&session));

        session.place("rock", Vec2::new(PLAYER_X + LOOKAHEAD + 2.0, -2.5)).unwrap();
        assert!(!obstacle_ahead(&session));

        session.place("rock", Vec2::new(PLAYER_X + 1.5, -2.5)).unwrap();
        assert!(obstacle_ahead(&session));
    }

    #[test]
    fn test_airborne_runner_clears_obstacles() {
        let mut session = running_session();
        let rock = session.place("rock", Vec2::new(PLAYER_X, -2.5)).unwrap();
        let coin = session.place("coin", Vec2::new(PLAYER_X + 0.2, -2.5)).unwrap();

        assert_eq!(overlaps(&session, true), vec![coin]);
        let mut grounded = overlaps(&session, false);
        grounded.sort();
        let mut expected = vec![rock, coin];
        expected.sort();
        assert_eq!(grounded, expected);
    }
}
