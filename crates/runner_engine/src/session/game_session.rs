//! Per-frame driver and phase machine

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{GamePhase, SessionError};
use crate::audio::{AudioBackend, AudioDirector};
use crate::core::RunnerConfig;
use crate::entities;
use crate::events::{EventBus, EventKind, GameEvent, HandlerResult, Outbox, SharedHandler};
use crate::foundation::collections::InstanceHandle;
use crate::foundation::math::Vec2;
use crate::persistence::{HighScoreStore, PreferencesStore};
use crate::player::{JumpOutcome, Locomotion};
use crate::pool::{ObjectPool, Prototype};
use crate::spawn::{SpawnRecord, SpawnScheduler};
use crate::stats::{SessionStats, StatsTracker};
use crate::ui::{HostCommand, HudModel, PowerUpTimers, UiAction};
use crate::world::WorldScroller;

/// One play session: every component plus the bus connecting them
///
/// The host calls [`GameSession::tick`] once per frame and forwards overlaps,
/// jump presses and widget interactions. Everything else happens through
/// events published on the session's bus.
pub struct GameSession {
    config: RunnerConfig,
    bus: EventBus,
    phase: GamePhase,

    pool: Rc<RefCell<ObjectPool>>,
    scheduler: Rc<RefCell<SpawnScheduler>>,
    scroller: Rc<RefCell<WorldScroller>>,
    stats: Rc<RefCell<StatsTracker>>,
    player: Rc<RefCell<Locomotion>>,
    audio: Rc<RefCell<AudioDirector>>,
    hud: Rc<RefCell<HudModel>>,
    timers: Rc<RefCell<PowerUpTimers>>,

    high_scores: Option<HighScoreStore>,
    best_score: u32,
    game_over_signal: Rc<Cell<bool>>,
    handler_faults: usize,
}

impl GameSession {
    /// Build every component from `config` and subscribe it to a fresh bus
    pub fn new(config: RunnerConfig, audio_backend: Box<dyn AudioBackend>) -> Result<Self, SessionError> {
        config.validate()?;

        let mut pool = ObjectPool::new();
        for settings in &config.pools.prototypes {
            let id = pool.register_prototype(Prototype::new(settings.name.clone(), settings.kind.clone()));
            pool.initialize_pool(id, settings.initial_count);
        }

        let rng = match config.engine.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut scheduler = SpawnScheduler::new(config.spawn.clone(), rng)?;
        scheduler.register_variants(&pool);

        let mut session = Self {
            bus: EventBus::new(),
            phase: GamePhase::MainMenu,
            pool: Rc::new(RefCell::new(pool)),
            scheduler: Rc::new(RefCell::new(scheduler)),
            scroller: Rc::new(RefCell::new(WorldScroller::new(config.scroller.clone()))),
            stats: Rc::new(RefCell::new(StatsTracker::new(config.stats.clone()))),
            player: Rc::new(RefCell::new(Locomotion::new(config.player.clone()))),
            audio: Rc::new(RefCell::new(AudioDirector::new(config.audio.clone(), audio_backend))),
            hud: Rc::new(RefCell::new(HudModel::new(config.hud.clone(), config.stats.starting_lives))),
            timers: Rc::new(RefCell::new(PowerUpTimers::new())),
            high_scores: None,
            best_score: 0,
            game_over_signal: Rc::new(Cell::new(false)),
            handler_faults: 0,
            config,
        };
        session.wire_subscriptions();
        session.audio.borrow_mut().play_menu_music();

        log::info!(
            "Session ready with {} prototypes",
            session.config.pools.prototypes.len()
        );
        Ok(session)
    }

    /// Persist and compare the best score through `store`
    pub fn set_high_score_store(&mut self, store: HighScoreStore) {
        self.best_score = store.load();
        self.high_scores = Some(store);
    }

    /// Restore volumes from `store` and save slider changes to it
    pub fn set_preferences_store(&mut self, store: PreferencesStore) {
        self.audio.borrow_mut().set_preferences(store);
    }

    fn wire_subscriptions(&mut self) {
        use EventKind as K;

        let pool: SharedHandler = self.pool.clone();
        self.bus.subscribe_all(&[K::ObjectReturnToPool, K::GameRestart], &pool);

        let scheduler: SharedHandler = self.scheduler.clone();
        self.bus
            .subscribe_all(&[K::GameStart, K::GameOver, K::GameRestart], &scheduler);

        let scroller: SharedHandler = self.scroller.clone();
        self.bus.subscribe_all(
            &[K::GameStart, K::GameOver, K::GameRestart, K::ScoreBoostCollected],
            &scroller,
        );

        let stats: SharedHandler = self.stats.clone();
        self.bus.subscribe_all(
            &[
                K::GameStart,
                K::GameRestart,
                K::CoinCollected,
                K::DistanceUpdated,
                K::PlayerHitObstacle,
                K::PowerupPicked,
            ],
            &stats,
        );

        let player: SharedHandler = self.player.clone();
        self.bus.subscribe_all(&[K::GameRestart], &player);

        let audio: SharedHandler = self.audio.clone();
        self.bus.subscribe_all(
            &[
                K::GameStart,
                K::GameRestart,
                K::CoinCollected,
                K::PlayerHitObstacle,
                K::PlayerJumped,
                K::PlayerDoubleJumped,
                K::ScoreBoostCollected,
                K::ShieldCollected,
                K::BgmAudioLevelChanged,
                K::SfxAudioLevelChanged,
            ],
            &audio,
        );

        let hud: SharedHandler = self.hud.clone();
        self.bus.subscribe_all(
            &[
                K::GameStart,
                K::GamePaused,
                K::GameResumed,
                K::GameRestart,
                K::CoinScoreChanged,
                K::DistanceUpdated,
                K::LifeUpdated,
                K::PlayerDied,
                K::ShieldCollected,
                K::GameOverUiUpdate,
            ],
            &hud,
        );

        let timers: SharedHandler = self.timers.clone();
        self.bus.subscribe_all(&[K::PowerupPicked, K::GameRestart], &timers);

        let signal = Rc::clone(&self.game_over_signal);
        self.bus
            .subscribe_fn(K::GameOver, move |_: &GameEvent, _: &mut Outbox| -> HandlerResult {
                signal.set(true);
                Ok(())
            });
    }

    /// Leave the main menu and start running
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.transition("start", &[GamePhase::MainMenu], GamePhase::Running)?;
        self.publish(GameEvent::GameStart);
        Ok(())
    }

    /// Freeze time
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.transition("pause", &[GamePhase::Running], GamePhase::Paused)?;
        self.publish(GameEvent::GamePaused);
        Ok(())
    }

    /// Unfreeze time
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.transition("resume", &[GamePhase::Paused], GamePhase::Running)?;
        self.publish(GameEvent::GameResumed);
        Ok(())
    }

    /// Reset counters, pools and world and run again
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.transition(
            "restart",
            &[GamePhase::Paused, GamePhase::GameOver],
            GamePhase::Running,
        )?;
        self.game_over_signal.set(false);
        self.publish(GameEvent::GameRestart);
        Ok(())
    }

    fn transition(
        &mut self,
        action: &'static str,
        from: &[GamePhase],
        to: GamePhase,
    ) -> Result<(), SessionError> {
        if !from.contains(&self.phase) {
            return Err(SessionError::InvalidTransition { action, phase: self.phase });
        }
        log::info!("Session {:?} -> {to:?}", self.phase);
        self.phase = to;
        Ok(())
    }

    /// Advance one frame
    ///
    /// Nothing advances while paused or after game over. On the main menu
    /// only the ground idles. Returns the spawn that fired this frame, if
    /// any, so the host can place sprites for the new instances.
    pub fn tick(&mut self, delta_time: f32) -> Option<SpawnRecord> {
        let mut outbox = Outbox::new();
        match self.phase {
            GamePhase::MainMenu => {
                self.scroller.borrow_mut().tick(delta_time, &mut outbox);
                self.publish_outbox(&mut outbox);
                return None;
            }
            GamePhase::Paused | GamePhase::GameOver => return None,
            GamePhase::Running => {}
        }

        let world_speed = {
            let mut scroller = self.scroller.borrow_mut();
            scroller.tick(delta_time, &mut outbox);
            scroller.speed()
        };
        let world_step = outbox
            .events()
            .iter()
            .find_map(|event| match event {
                GameEvent::WorldSpeedUpdate(step) => Some(*step),
                _ => None,
            })
            .unwrap_or(0.0);

        let spawned = {
            let mut pool = self.pool.borrow_mut();
            let despawned = pool.scroll_active(world_step, self.config.objects.despawn_x);
            if despawned > 0 {
                log::trace!("{despawned} instances scrolled off screen");
            }
            self.scheduler.borrow_mut().tick(delta_time, &mut pool)
        };

        self.stats.borrow_mut().tick(delta_time, &mut outbox);
        self.hud.borrow_mut().tick(delta_time);
        self.timers.borrow_mut().tick(delta_time);
        self.player.borrow_mut().update_animation(world_speed);

        self.publish_outbox(&mut outbox);
        spawned
    }

    /// The player touched a pooled instance
    ///
    /// Ignored unless a run is in progress. Returns whether the instance
    /// reacted.
    pub fn overlap(&mut self, handle: InstanceHandle) -> bool {
        if self.phase != GamePhase::Running {
            log::debug!("Overlap ignored while {:?}", self.phase);
            return false;
        }
        let mut outbox = Outbox::new();
        let activated = entities::activate(&self.pool.borrow(), handle, &mut outbox);
        self.publish_outbox(&mut outbox);
        activated
    }

    /// Take an instance of the named prototype out of its pool at `position`
    ///
    /// For hand-placed level pieces; the spawn scheduler does this on its own
    /// during a run. Unknown names are logged and yield `None`.
    pub fn place(&mut self, prototype: &str, position: Vec2) -> Option<InstanceHandle> {
        let mut pool = self.pool.borrow_mut();
        let Some(id) = pool.find_prototype(prototype) else {
            log::warn!("No prototype named '{prototype}'");
            return None;
        };
        Some(pool.acquire(id, position))
    }

    /// The jump button went down; `grounded` is the host's ground probe
    pub fn jump(&mut self, grounded: bool) -> JumpOutcome {
        if self.phase != GamePhase::Running {
            return JumpOutcome::Ignored;
        }
        let mut outbox = Outbox::new();
        let outcome = self.player.borrow_mut().jump_pressed(grounded, &mut outbox);
        self.publish_outbox(&mut outbox);
        outcome
    }

    /// Report the host's ground probe between jump presses
    pub fn set_grounded(&mut self, grounded: bool) {
        self.player.borrow_mut().set_grounded(grounded);
    }

    /// Apply a widget interaction
    ///
    /// Phase changes requested by the UI go through the same checks as the
    /// direct calls; rejected ones are logged and dropped. Returns the request
    /// the host must carry out, if any.
    pub fn handle_ui(&mut self, action: UiAction) -> Option<HostCommand> {
        let mut outbox = Outbox::new();
        let command = self.hud.borrow_mut().handle_action(action, &mut outbox);

        for event in outbox.drain().collect::<Vec<_>>() {
            let result = match event {
                GameEvent::GameStart => self.start(),
                GameEvent::GamePaused => self.pause(),
                GameEvent::GameResumed => self.resume(),
                GameEvent::GameRestart => self.restart(),
                other => {
                    self.publish(other);
                    Ok(())
                }
            };
            if let Err(e) = result {
                log::warn!("UI action {action:?} dropped: {e}");
            }
        }
        command
    }

    fn publish(&mut self, event: GameEvent) {
        let report = self.bus.publish(event);
        self.after_publish(report.faults);
    }

    fn publish_outbox(&mut self, outbox: &mut Outbox) {
        if outbox.is_empty() {
            return;
        }
        let report = self.bus.publish_all(outbox);
        self.after_publish(report.faults);
    }

    fn after_publish(&mut self, faults: usize) {
        self.handler_faults += faults;
        if self.game_over_signal.replace(false) {
            self.finish_game();
        }
    }

    fn finish_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;

        let score = self.stats.borrow().score();
        self.best_score = match &self.high_scores {
            Some(store) => store.submit(score).unwrap_or_else(|e| {
                log::warn!("High score not saved: {e}");
                self.best_score.max(score)
            }),
            None => self.best_score.max(score),
        };
        log::info!("Game over with score {score}, best {}", self.best_score);

        self.publish(GameEvent::GameOverUiUpdate {
            score: score.to_string(),
            high_score: self.best_score.to_string(),
        });
    }

    /// Current phase
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current counters
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().snapshot()
    }

    /// Best score known to this session
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Handler invocations that failed since the session was created
    pub fn handler_faults(&self) -> usize {
        self.handler_faults
    }

    /// Configuration the session was built from
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The session's bus, for attaching extra observers
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Pooled objects
    pub fn pool(&self) -> Ref<'_, ObjectPool> {
        self.pool.borrow()
    }

    /// Ground segments and scroll state
    pub fn scroller(&self) -> Ref<'_, WorldScroller> {
        self.scroller.borrow()
    }

    /// Spawn timers
    pub fn scheduler(&self) -> Ref<'_, SpawnScheduler> {
        self.scheduler.borrow()
    }

    /// Runner jump and animation state
    pub fn player(&self) -> Ref<'_, Locomotion> {
        self.player.borrow()
    }

    /// HUD view model
    pub fn hud(&self) -> Ref<'_, HudModel> {
        self.hud.borrow()
    }

    /// Power-up indicators
    pub fn power_up_timers(&self) -> Ref<'_, PowerUpTimers> {
        self.timers.borrow()
    }

    /// Audio cue state
    pub fn audio(&self) -> Ref<'_, AudioDirector> {
        self.audio.borrow()
    }
}
