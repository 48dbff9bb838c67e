//! Event system
//!
//! Typed publish/subscribe hub that decouples producers (collisions, timers,
//! UI) from consumers (stats, audio, HUD, scrolling). Key principles:
//! - Closed set of event kinds, payloads carried in the variant
//! - Registration system (only notify interested handlers, in subscription order)
//! - Synchronous delivery, follow-up events queued on an [`Outbox`]
//! - One faulty handler never hides an event from its siblings

mod bus;
mod recorder;

pub use bus::{EventBus, EventHandler, HandlerError, HandlerResult, Outbox, PublishReport, SharedHandler};
pub use recorder::EventRecorder;

use crate::foundation::collections::InstanceHandle;
use serde::{Deserialize, Serialize};

/// Power-up flavours the stats and scroller react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Temporarily multiplies distance gain
    ScoreBooster,
    /// Temporarily ignores obstacle hits
    Shield,
}

/// Descriptor carried by a power-up prototype and its pick/expire events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpData {
    /// Effect duration in seconds
    pub duration: f32,
    /// Which effect
    pub kind: PowerUpKind,
    /// Icon asset name the HUD shows while the effect runs
    pub icon: String,
}

impl PowerUpData {
    /// Create a power-up descriptor
    pub fn new(kind: PowerUpKind, duration: f32, icon: impl Into<String>) -> Self {
        Self {
            duration,
            kind,
            icon: icon.into(),
        }
    }
}

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Session started from the main menu
    GameStart,
    /// Session ended (lives exhausted)
    GameOver,
    /// Session restarted from pause or game-over
    GameRestart,
    /// Time advance halted
    GamePaused,
    /// Time advance resumed
    GameResumed,
    /// Player touched a coin
    CoinCollected,
    /// Coin total changed
    CoinScoreChanged,
    /// Score booster effect started
    ScoreBoostCollected,
    /// Shield effect started
    ShieldCollected,
    /// Cumulative distance changed
    DistanceUpdated,
    /// Combined score changed
    ScoreUpdated,
    /// Player touched an obstacle
    PlayerHitObstacle,
    /// Lives exhausted
    PlayerDied,
    /// Remaining lives changed
    LifeUpdated,
    /// A pooled instance asks to go back to its pool
    ObjectReturnToPool,
    /// Player jumped from the ground
    PlayerJumped,
    /// Player used the mid-air jump
    PlayerDoubleJumped,
    /// Player touched a power-up
    PowerupPicked,
    /// A power-up effect ran out
    PowerupExpired,
    /// World moved this frame
    WorldSpeedUpdate,
    /// Music volume slider changed
    BgmAudioLevelChanged,
    /// Effects volume slider changed
    SfxAudioLevelChanged,
    /// Game-over panel texts are ready
    GameOverUiUpdate,
}

/// Event with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Session started from the main menu
    GameStart,
    /// Session ended (lives exhausted)
    GameOver,
    /// Session restarted from pause or game-over
    GameRestart,
    /// Time advance halted
    GamePaused,
    /// Time advance resumed
    GameResumed,
    /// Player touched a coin worth `amount`
    CoinCollected(u32),
    /// New coin total
    CoinScoreChanged(u32),
    /// Score booster started for the given seconds
    ScoreBoostCollected(f32),
    /// Shield started for the given seconds
    ShieldCollected(f32),
    /// Cumulative distance
    DistanceUpdated(f32),
    /// Combined score
    ScoreUpdated(u32),
    /// Player touched an obstacle
    PlayerHitObstacle,
    /// Lives exhausted
    PlayerDied,
    /// Remaining lives
    LifeUpdated(u32),
    /// Return this instance to its pool
    ObjectReturnToPool(InstanceHandle),
    /// Player jumped from the ground
    PlayerJumped,
    /// Player used the mid-air jump
    PlayerDoubleJumped,
    /// Player touched a power-up
    PowerupPicked(PowerUpData),
    /// A power-up effect ran out
    PowerupExpired(PowerUpData),
    /// Distance the world moved this frame (speed times delta)
    WorldSpeedUpdate(f32),
    /// Music volume, 0 to 1
    BgmAudioLevelChanged(f32),
    /// Effects volume, 0 to 1
    SfxAudioLevelChanged(f32),
    /// Game-over panel texts
    GameOverUiUpdate {
        /// Final score of the session
        score: String,
        /// Best score on record
        high_score: String,
    },
}

impl GameEvent {
    /// The registration key this event is delivered under
    pub fn kind(&self) -> EventKind {
        match self {
            Self::GameStart => EventKind::GameStart,
            Self::GameOver => EventKind::GameOver,
            Self::GameRestart => EventKind::GameRestart,
            Self::GamePaused => EventKind::GamePaused,
            Self::GameResumed => EventKind::GameResumed,
            Self::CoinCollected(_) => EventKind::CoinCollected,
            Self::CoinScoreChanged(_) => EventKind::CoinScoreChanged,
            Self::ScoreBoostCollected(_) => EventKind::ScoreBoostCollected,
            Self::ShieldCollected(_) => EventKind::ShieldCollected,
            Self::DistanceUpdated(_) => EventKind::DistanceUpdated,
            Self::ScoreUpdated(_) => EventKind::ScoreUpdated,
            Self::PlayerHitObstacle => EventKind::PlayerHitObstacle,
            Self::PlayerDied => EventKind::PlayerDied,
            Self::LifeUpdated(_) => EventKind::LifeUpdated,
            Self::ObjectReturnToPool(_) => EventKind::ObjectReturnToPool,
            Self::PlayerJumped => EventKind::PlayerJumped,
            Self::PlayerDoubleJumped => EventKind::PlayerDoubleJumped,
            Self::PowerupPicked(_) => EventKind::PowerupPicked,
            Self::PowerupExpired(_) => EventKind::PowerupExpired,
            Self::WorldSpeedUpdate(_) => EventKind::WorldSpeedUpdate,
            Self::BgmAudioLevelChanged(_) => EventKind::BgmAudioLevelChanged,
            Self::SfxAudioLevelChanged(_) => EventKind::SfxAudioLevelChanged,
            Self::GameOverUiUpdate { .. } => EventKind::GameOverUiUpdate,
        }
    }
}
