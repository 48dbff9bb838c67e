//! # Runner Engine
//!
//! Gameplay core for a side-scrolling endless runner, independent of any
//! renderer, physics engine or input device.
//!
//! ## Features
//!
//! - **Object Pooling**: FIFO reuse of coins, obstacles and power-ups with O(1) release
//! - **Event Bus**: Typed publish/subscribe with isolated, ordered delivery
//! - **Spawning**: Timer-driven, uniformly fair choice between ready categories
//! - **World Scrolling**: Accelerating ground strip with segment recycling
//! - **Scoring**: Lives, coins, distance, shields and score boosts
//! - **Persistence**: High score and volume preferences per user
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runner_engine::prelude::*;
//!
//! fn main() -> Result<(), SessionError> {
//!     let config = RunnerConfig::default();
//!     let mut session = GameSession::new(config, Box::new(SilentBackend))?;
//!     session.start()?;
//!
//!     loop {
//!         if let Some(spawned) = session.tick(1.0 / 60.0) {
//!             // Place sprites for spawned.instances
//!             let _ = spawned;
//!         }
//!         // Forward overlaps reported by the host's physics:
//!         // session.overlap(handle);
//!         if session.phase() == GamePhase::GameOver {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

pub mod audio;
pub mod config;
pub mod core;
pub mod entities;
pub mod events;
pub mod foundation;
pub mod persistence;
pub mod player;
pub mod pool;
pub mod session;
pub mod spawn;
pub mod stats;
pub mod ui;
pub mod world;

#[cfg(test)]
mod tests;

/// Common imports for hosts
pub mod prelude {
    pub use crate::{
        audio::{AudioBackend, Channel, SilentBackend},
        config::Config,
        core::RunnerConfig,
        entities::{EntityKind, SpawnCategory},
        events::{EventBus, EventHandler, EventKind, EventRecorder, GameEvent, Outbox},
        foundation::{collections::InstanceHandle, math::Vec2},
        persistence::{HighScoreStore, PreferencesStore},
        player::JumpOutcome,
        pool::ObjectPool,
        session::{GamePhase, GameSession, SessionError},
        spawn::SpawnRecord,
        ui::{HostCommand, HostServices, Panel, UiAction},
    };
}
