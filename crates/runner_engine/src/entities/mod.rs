//! Interactable entity kinds
//!
//! Every spawned object is one of three kinds. The kind lives on the
//! prototype, so all instances of a prototype behave the same way.

mod behavior;

pub use behavior::activate;

use crate::events::PowerUpData;
use serde::{Deserialize, Serialize};

/// What touching an entity does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Adds `value` to the coin total
    Coin {
        /// Coins awarded per pickup
        value: u32,
    },
    /// Costs a life unless shielded
    Obstacle,
    /// Starts a timed effect
    PowerUp(PowerUpData),
}

impl EntityKind {
    /// Spawn category this kind is scheduled under
    pub fn category(&self) -> SpawnCategory {
        match self {
            Self::Coin { .. } => SpawnCategory::Coin,
            Self::Obstacle => SpawnCategory::Obstacle,
            Self::PowerUp(_) => SpawnCategory::PowerUp,
        }
    }
}

/// Scheduler categories, each with its own spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnCategory {
    /// Lines of coins
    Coin,
    /// Single power-up
    PowerUp,
    /// Single obstacle
    Obstacle,
}

impl SpawnCategory {
    /// All categories in a fixed order
    pub const ALL: [Self; 3] = [Self::Coin, Self::PowerUp, Self::Obstacle];
}
