//! Power-up countdown indicators

use std::collections::HashMap;

use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox, PowerUpData, PowerUpKind};
use crate::foundation::time::Countdown;

/// One visible power-up indicator
#[derive(Debug, Clone)]
pub struct PowerUpTimer {
    /// Power-up being tracked
    pub data: PowerUpData,
    countdown: Countdown,
}

impl PowerUpTimer {
    /// Radial fill, 1 when picked down to 0 when expired
    pub fn fill(&self) -> f32 {
        self.countdown.fraction_remaining()
    }
}

/// Indicators for the power-ups currently running
#[derive(Debug, Default)]
pub struct PowerUpTimers {
    active: HashMap<PowerUpKind, PowerUpTimer>,
}

impl PowerUpTimers {
    /// No indicators visible
    pub fn new() -> Self {
        Self::default()
    }

    /// Show (or restart) the indicator for `data`
    pub fn start(&mut self, data: &PowerUpData) {
        self.active.insert(
            data.kind,
            PowerUpTimer {
                data: data.clone(),
                countdown: Countdown::new(data.duration),
            },
        );
    }

    /// Advance every indicator, hiding those that ran out
    pub fn tick(&mut self, delta_time: f32) {
        self.active.retain(|_, timer| {
            timer.countdown.tick(delta_time);
            !timer.countdown.is_finished()
        });
    }

    /// Indicator for `kind`, if visible
    pub fn get(&self, kind: PowerUpKind) -> Option<&PowerUpTimer> {
        self.active.get(&kind)
    }

    /// Whether the indicator for `kind` is visible
    pub fn is_visible(&self, kind: PowerUpKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Hide everything
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl EventHandler for PowerUpTimers {
    fn on_event(&mut self, event: &GameEvent, _outbox: &mut Outbox) -> HandlerResult {
        match event {
            GameEvent::PowerupPicked(data) => self.start(data),
            GameEvent::GameRestart => self.clear(),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fill_drains_then_hides() {
        let mut timers = PowerUpTimers::new();
        timers.start(&PowerUpData::new(PowerUpKind::Shield, 4.0, "shield"));
        assert_abs_diff_eq!(timers.get(PowerUpKind::Shield).unwrap().fill(), 1.0);

        timers.tick(1.0);
        assert_abs_diff_eq!(timers.get(PowerUpKind::Shield).unwrap().fill(), 0.75);

        timers.tick(3.0);
        assert!(!timers.is_visible(PowerUpKind::Shield));
    }

    #[test]
    fn test_repick_restarts_only_that_kind() {
        let mut timers = PowerUpTimers::new();
        timers.start(&PowerUpData::new(PowerUpKind::Shield, 2.0, "shield"));
        timers.start(&PowerUpData::new(PowerUpKind::ScoreBooster, 2.0, "boost"));
        timers.tick(1.5);
        timers.start(&PowerUpData::new(PowerUpKind::Shield, 2.0, "shield"));
        timers.tick(1.0);

        assert!(timers.is_visible(PowerUpKind::Shield));
        assert!(!timers.is_visible(PowerUpKind::ScoreBooster));
    }

    #[test]
    fn test_restart_hides_all() {
        let mut timers = PowerUpTimers::new();
        timers.start(&PowerUpData::new(PowerUpKind::Shield, 2.0, "shield"));
        timers.on_event(&GameEvent::GameRestart, &mut Outbox::new()).unwrap();
        assert!(!timers.is_visible(PowerUpKind::Shield));
    }
}
