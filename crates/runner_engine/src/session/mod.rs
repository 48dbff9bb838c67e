//! Session orchestration
//!
//! [`GameSession`] wires every gameplay component to one event bus and drives
//! them from the host's frame callback.

mod game_session;

pub use game_session::GameSession;

use crate::config::ConfigError;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Main menu, the world idles
    MainMenu,
    /// A run is in progress
    Running,
    /// Time is frozen on the pause panel
    Paused,
    /// Lives ran out, waiting for restart
    GameOver,
}

/// Session errors
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// Configuration could not be used
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Requested phase change does not apply to the current phase
    #[error("Cannot {action} while in {phase:?}")]
    InvalidTransition {
        /// What was requested
        action: &'static str,
        /// Phase at the time of the request
        phase: GamePhase,
    },
}
