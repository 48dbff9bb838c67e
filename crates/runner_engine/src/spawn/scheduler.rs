//! Spawn scheduler
//!
//! # Architecture
//!
//! ```text
//! tick(dt) → Idle: accumulate category timers
//!               ├── none ready → stay Idle
//!               └── ready set  → pick one uniformly → acquire from pool
//!                                 → reset that timer → Spawning(cooldown)
//!            Spawning: count the cooldown down → Idle
//! ```
//!
//! Categories that were ready but not picked keep their accumulated time and
//! are reconsidered once the cooldown is over. Timers only run while the game
//! is running and the scheduler is idle.

use crate::config::ConfigError;
use crate::core::SpawnSettings;
use crate::entities::SpawnCategory;
use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox};
use crate::foundation::collections::InstanceHandle;
use crate::foundation::math::Vec2;
use crate::foundation::time::{Countdown, IntervalTimer};
use crate::pool::{ObjectPool, PrototypeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    /// Waiting for a category timer to mature
    Idle,
    /// A spawn just fired; nothing is evaluated until the cooldown ends
    Spawning(Countdown),
}

/// What a single spawn decision produced
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRecord {
    /// Category that won the draw
    pub category: SpawnCategory,
    /// Instances placed in the world
    pub instances: Vec<InstanceHandle>,
}

/// Pick one category uniformly among the ready ones
pub fn choose_category<R: Rng + ?Sized>(ready: &[SpawnCategory], rng: &mut R) -> Option<SpawnCategory> {
    ready.choose(rng).copied()
}

/// Timer-driven spawner for coins, power-ups and obstacles
pub struct SpawnScheduler {
    settings: SpawnSettings,
    timers: HashMap<SpawnCategory, IntervalTimer>,
    variants: HashMap<SpawnCategory, Vec<PrototypeId>>,
    state: SchedulerState,
    running: bool,
    rng: StdRng,
}

impl SpawnScheduler {
    /// Create a scheduler with no variants registered
    ///
    /// Fails when the intervals or the coin line range are unusable.
    pub fn new(settings: SpawnSettings, rng: StdRng) -> Result<Self, ConfigError> {
        settings.validate()?;
        let timers = Self::fresh_timers(&settings);
        Ok(Self {
            settings,
            timers,
            variants: HashMap::new(),
            state: SchedulerState::Idle,
            running: false,
            rng,
        })
    }

    /// Register every prototype in the pool under its kind's category
    pub fn register_variants(&mut self, pool: &ObjectPool) {
        for id in pool.prototype_ids() {
            if let Some(prototype) = pool.prototype(id) {
                self.add_variant(prototype.kind.category(), id);
            }
        }
    }

    /// Add one prototype to a category's variant list
    pub fn add_variant(&mut self, category: SpawnCategory, prototype: PrototypeId) {
        self.variants.entry(category).or_default().push(prototype);
    }

    /// Advance the scheduler by one frame
    ///
    /// Returns the spawn that fired this frame, if any.
    pub fn tick(&mut self, delta_time: f32, pool: &mut ObjectPool) -> Option<SpawnRecord> {
        if !self.running {
            return None;
        }

        if let SchedulerState::Spawning(cooldown) = &mut self.state {
            if cooldown.is_finished() || cooldown.tick(delta_time) {
                self.state = SchedulerState::Idle;
            }
            return None;
        }

        for timer in self.timers.values_mut() {
            timer.accumulate(delta_time);
        }

        let ready = self.ready_categories();
        let category = choose_category(&ready, &mut self.rng)?;
        let instances = self.spawn(category, pool);
        if let Some(timer) = self.timers.get_mut(&category) {
            timer.reset();
        }
        self.state = SchedulerState::Spawning(Countdown::new(self.settings.cooldown));

        log::debug!("Spawned {category:?} ({} instances), ready set was {ready:?}", instances.len());
        Some(SpawnRecord { category, instances })
    }

    /// Categories whose timer has reached its interval, in fixed order
    pub fn ready_categories(&self) -> Vec<SpawnCategory> {
        SpawnCategory::ALL
            .into_iter()
            .filter(|category| self.timers.get(category).is_some_and(IntervalTimer::is_ready))
            .collect()
    }

    /// Accumulated seconds for a category
    pub fn elapsed(&self, category: SpawnCategory) -> f32 {
        self.timers.get(&category).map_or(0.0, IntervalTimer::elapsed)
    }

    /// Current state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether timers are accumulating
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start or stop the timers
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Clear all timers and any pending cooldown
    pub fn reset(&mut self) {
        self.timers = Self::fresh_timers(&self.settings);
        self.state = SchedulerState::Idle;
    }

    fn spawn(&mut self, category: SpawnCategory, pool: &mut ObjectPool) -> Vec<InstanceHandle> {
        let Some(prototype) = self
            .variants
            .get(&category)
            .and_then(|variants| variants.choose(&mut self.rng))
            .copied()
        else {
            log::warn!("No prototypes registered for {category:?}, nothing spawned");
            return Vec::new();
        };

        let origin = self.settings.spawn_point();
        match category {
            SpawnCategory::Coin => {
                let count = self
                    .rng
                    .gen_range(self.settings.coin_count_min..=self.settings.coin_count_max);
                (0..count)
                    .map(|i| {
                        let offset = Vec2::new(i as f32 * self.settings.coin_spacing, 0.0);
                        pool.acquire(prototype, origin + offset)
                    })
                    .collect()
            }
            SpawnCategory::PowerUp | SpawnCategory::Obstacle => vec![pool.acquire(prototype, origin)],
        }
    }

    fn fresh_timers(settings: &SpawnSettings) -> HashMap<SpawnCategory, IntervalTimer> {
        HashMap::from([
            (SpawnCategory::Coin, IntervalTimer::new(settings.coin_interval)),
            (SpawnCategory::PowerUp, IntervalTimer::new(settings.power_up_interval)),
            (SpawnCategory::Obstacle, IntervalTimer::new(settings.obstacle_interval)),
        ])
    }
}

impl EventHandler for SpawnScheduler {
    fn on_event(&mut self, event: &GameEvent, _outbox: &mut Outbox) -> HandlerResult {
        match event {
            GameEvent::GameStart => self.set_running(true),
            GameEvent::GameOver => self.set_running(false),
            GameEvent::GameRestart => {
                self.reset();
                self.set_running(true);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityKind;
    use crate::events::{PowerUpData, PowerUpKind};
    use crate::pool::Prototype;
    use rand::SeedableRng;

    fn setup(settings: SpawnSettings) -> (SpawnScheduler, ObjectPool) {
        let mut pool = ObjectPool::new();
        pool.register_prototype(Prototype::new("coin", EntityKind::Coin { value: 1 }));
        pool.register_prototype(Prototype::new("rock", EntityKind::Obstacle));
        pool.register_prototype(Prototype::new(
            "shield",
            EntityKind::PowerUp(PowerUpData::new(PowerUpKind::Shield, 5.0, "shield")),
        ));
        let mut scheduler = SpawnScheduler::new(settings, StdRng::seed_from_u64(7)).unwrap();
        scheduler.register_variants(&pool);
        scheduler.set_running(true);
        (scheduler, pool)
    }

    #[test]
    fn test_timers_do_not_run_before_game_start() {
        let (mut scheduler, mut pool) = setup(SpawnSettings::default());
        scheduler.set_running(false);
        for _ in 0..100 {
            assert!(scheduler.tick(0.1, &mut pool).is_none());
        }
        assert_eq!(scheduler.elapsed(SpawnCategory::Coin), 0.0);
    }

    #[test]
    fn test_coin_line_shape() {
        let (mut scheduler, mut pool) = setup(SpawnSettings::default());
        // Only the coin timer (2s) is ready after 2.5s
        let record = scheduler.tick(2.5, &mut pool).unwrap();
        assert_eq!(record.category, SpawnCategory::Coin);
        assert!((3..=5).contains(&record.instances.len()));

        let origin = SpawnSettings::default().spawn_point();
        for (i, handle) in record.instances.iter().enumerate() {
            let position = pool.instance(*handle).unwrap().position;
            assert_eq!(position, origin + Vec2::new(i as f32 * 1.5, 0.0));
        }
    }

    #[test]
    fn test_cooldown_blocks_and_freezes_timers() {
        let (mut scheduler, mut pool) = setup(SpawnSettings::default());
        scheduler.tick(2.5, &mut pool).unwrap();
        let obstacle_before = scheduler.elapsed(SpawnCategory::Obstacle);

        assert!(matches!(scheduler.state(), SchedulerState::Spawning(_)));
        assert!(scheduler.tick(1.0, &mut pool).is_none());
        assert_eq!(scheduler.elapsed(SpawnCategory::Obstacle), obstacle_before);

        // Cooldown ends on this tick; evaluation resumes on the next
        assert!(scheduler.tick(1.5, &mut pool).is_none());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_unchosen_ready_categories_keep_their_time() {
        let settings = SpawnSettings {
            coin_interval: 1.0,
            power_up_interval: 1.0,
            obstacle_interval: 1.0,
            cooldown: 0.5,
            ..SpawnSettings::default()
        };
        let (mut scheduler, mut pool) = setup(settings);
        let first = scheduler.tick(1.0, &mut pool).unwrap().category;

        assert_eq!(scheduler.elapsed(first), 0.0);
        let still_ready = scheduler.ready_categories();
        assert_eq!(still_ready.len(), 2);
        assert!(!still_ready.contains(&first));
    }

    #[test]
    fn test_choice_is_uniform_over_ready_set() {
        let mut rng = StdRng::seed_from_u64(2024);
        let ready = SpawnCategory::ALL;
        let draws = 10_000;
        let mut counts: HashMap<SpawnCategory, usize> = HashMap::new();
        for _ in 0..draws {
            *counts.entry(choose_category(&ready, &mut rng).unwrap()).or_default() += 1;
        }
        for category in SpawnCategory::ALL {
            let share = counts[&category] as f64 / f64::from(draws);
            assert!((share - 1.0 / 3.0).abs() < 0.05, "{category:?} share {share}");
        }
    }

    #[test]
    fn test_scheduler_fairness_when_all_ready_every_time() {
        let settings = SpawnSettings {
            coin_interval: 0.0,
            power_up_interval: 0.0,
            obstacle_interval: 0.0,
            cooldown: 0.0,
            ..SpawnSettings::default()
        };
        let (mut scheduler, mut pool) = setup(settings);
        let mut counts: HashMap<SpawnCategory, usize> = HashMap::new();
        let mut spawns = 0usize;
        for _ in 0..10_000 {
            assert_eq!(scheduler.state(), SchedulerState::Idle);
            assert_eq!(scheduler.ready_categories().len(), 3);
            if let Some(record) = scheduler.tick(0.016, &mut pool) {
                *counts.entry(record.category).or_default() += 1;
                spawns += 1;
                pool.reset_all();
            }
            // Leave the zero-length cooldown
            scheduler.tick(0.016, &mut pool);
        }
        assert_eq!(spawns, 10_000);
        for category in SpawnCategory::ALL {
            let share = counts[&category] as f64 / spawns as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.05, "{category:?} share {share}");
        }
    }

    #[test]
    fn test_unusable_settings_rejected() {
        let inverted = SpawnSettings { coin_count_min: 5, coin_count_max: 3, ..SpawnSettings::default() };
        assert!(matches!(
            SpawnScheduler::new(inverted, StdRng::seed_from_u64(1)),
            Err(ConfigError::Invalid(_))
        ));

        let nan_cooldown = SpawnSettings { cooldown: f32::NAN, ..SpawnSettings::default() };
        assert!(SpawnScheduler::new(nan_cooldown, StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_missing_variants_spawn_nothing() {
        let mut pool = ObjectPool::new();
        let mut scheduler =
            SpawnScheduler::new(SpawnSettings::default(), StdRng::seed_from_u64(1)).unwrap();
        scheduler.set_running(true);
        let record = scheduler.tick(2.5, &mut pool).unwrap();
        assert!(record.instances.is_empty());
        assert_eq!(scheduler.elapsed(SpawnCategory::Coin), 0.0);
    }

    #[test]
    fn test_restart_clears_timers_and_resumes() {
        let (mut scheduler, mut pool) = setup(SpawnSettings::default());
        scheduler.tick(1.0, &mut pool);
        let mut outbox = Outbox::new();
        scheduler.on_event(&GameEvent::GameOver, &mut outbox).unwrap();
        assert!(!scheduler.is_running());

        scheduler.on_event(&GameEvent::GameRestart, &mut outbox).unwrap();
        assert!(scheduler.is_running());
        assert_eq!(scheduler.elapsed(SpawnCategory::PowerUp), 0.0);
    }
}
