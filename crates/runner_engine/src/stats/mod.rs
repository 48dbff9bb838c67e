//! Session statistics
//!
//! Owns lives, coins, distance score and the timed power-up flags. Other
//! components only observe these values through the events published here.

use crate::core::StatsSettings;
use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox, PowerUpData, PowerUpKind};
use crate::foundation::time::Countdown;

/// Read-only snapshot of the session counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    /// Coins collected
    pub coin_score: u32,
    /// Distance score (already scaled by any score boost)
    pub distance: f32,
    /// Lives left
    pub lives: u32,
    /// Combined score, `floor(distance) + coins`
    pub score: u32,
    /// Whether hits are currently ignored
    pub shield_active: bool,
    /// Whether a score booster is running
    pub booster_active: bool,
}

#[derive(Debug, Clone)]
struct ActivePowerUp {
    data: PowerUpData,
    countdown: Countdown,
}

/// Tracks score and lives for one session
pub struct StatsTracker {
    settings: StatsSettings,
    coin_score: u32,
    distance: f32,
    lives: u32,
    score: u32,
    shield: Option<ActivePowerUp>,
    booster: Option<ActivePowerUp>,
}

impl StatsTracker {
    /// Create a tracker at initial values
    pub fn new(settings: StatsSettings) -> Self {
        Self {
            lives: settings.starting_lives,
            settings,
            coin_score: 0,
            distance: 0.0,
            score: 0,
            shield: None,
            booster: None,
        }
    }

    /// Current counters
    pub fn snapshot(&self) -> SessionStats {
        SessionStats {
            coin_score: self.coin_score,
            distance: self.distance,
            lives: self.lives,
            score: self.score,
            shield_active: self.shield.is_some(),
            booster_active: self.booster.is_some(),
        }
    }

    /// Coins collected
    pub fn coin_score(&self) -> u32 {
        self.coin_score
    }

    /// Lives left
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Combined score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether hits are currently ignored
    pub fn is_shield_active(&self) -> bool {
        self.shield.is_some()
    }

    /// Advance power-up timers, announcing any that ran out
    pub fn tick(&mut self, delta_time: f32, outbox: &mut Outbox) {
        for slot in [&mut self.shield, &mut self.booster] {
            let expired = slot.as_mut().is_some_and(|active| {
                active.countdown.tick(delta_time);
                active.countdown.is_finished()
            });
            if expired {
                if let Some(active) = slot.take() {
                    log::debug!("{:?} expired", active.data.kind);
                    outbox.push(GameEvent::PowerupExpired(active.data));
                }
            }
        }
    }

    /// Back to initial values, announcing them so views can redraw
    pub fn reset(&mut self, outbox: &mut Outbox) {
        self.reset_silently();
        outbox.push(GameEvent::CoinScoreChanged(0));
        outbox.push(GameEvent::LifeUpdated(self.lives));
        outbox.push(GameEvent::ScoreUpdated(0));
    }

    fn reset_silently(&mut self) {
        self.coin_score = 0;
        self.distance = 0.0;
        self.lives = self.settings.starting_lives;
        self.score = 0;
        self.shield = None;
        self.booster = None;
    }

    fn add_coins(&mut self, amount: u32, outbox: &mut Outbox) {
        self.coin_score = self.coin_score.saturating_add(amount);
        outbox.push(GameEvent::CoinScoreChanged(self.coin_score));
        self.refresh_score(outbox);
    }

    fn update_distance(&mut self, distance: f32, outbox: &mut Outbox) {
        self.distance = distance.max(0.0);
        self.refresh_score(outbox);
    }

    fn register_hit(&mut self, outbox: &mut Outbox) {
        if self.shield.is_some() {
            log::debug!("Hit absorbed by shield");
            return;
        }
        if self.lives == 0 {
            return;
        }

        self.lives -= 1;
        outbox.push(GameEvent::LifeUpdated(self.lives));
        if self.lives == 0 {
            log::info!("Out of lives, final score {}", self.score);
            outbox.push(GameEvent::PlayerDied);
            outbox.push(GameEvent::GameOver);
        }
    }

    fn apply_power_up(&mut self, data: &PowerUpData, outbox: &mut Outbox) {
        let active = ActivePowerUp {
            data: data.clone(),
            countdown: Countdown::new(data.duration),
        };
        match data.kind {
            PowerUpKind::Shield => {
                self.shield = Some(active);
                outbox.push(GameEvent::ShieldCollected(data.duration));
            }
            PowerUpKind::ScoreBooster => {
                self.booster = Some(active);
                outbox.push(GameEvent::ScoreBoostCollected(data.duration));
            }
        }
    }

    fn refresh_score(&mut self, outbox: &mut Outbox) {
        let score = (self.distance.floor() as u32).saturating_add(self.coin_score);
        if score != self.score {
            self.score = score;
            outbox.push(GameEvent::ScoreUpdated(score));
        }
    }
}

impl EventHandler for StatsTracker {
    fn on_event(&mut self, event: &GameEvent, outbox: &mut Outbox) -> HandlerResult {
        match event {
            GameEvent::GameStart => self.reset_silently(),
            GameEvent::GameRestart => self.reset(outbox),
            GameEvent::CoinCollected(amount) => self.add_coins(*amount, outbox),
            GameEvent::DistanceUpdated(distance) => self.update_distance(*distance, outbox),
            GameEvent::PlayerHitObstacle => self.register_hit(outbox),
            GameEvent::PowerupPicked(data) => self.apply_power_up(data, outbox),
            _ => {}
        }
        Ok(())
    }
}
