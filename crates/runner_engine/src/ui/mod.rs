//! UI view models
//!
//! Layout and drawing belong to the host. This module keeps what the widgets
//! show and turns widget interactions into events or host calls.
//!
//! - [`HudModel`]: score texts, lives, panel visibility, game-over texts
//! - [`PowerUpTimers`]: radial countdown per active power-up
//! - [`UiAction`] / [`HostCommand`]: clicks in, host requests out

mod actions;
mod hud;
mod timers;

pub use actions::{HostCommand, HostServices, UiAction};
pub use hud::{HudModel, Panel};
pub use timers::{PowerUpTimer, PowerUpTimers};
