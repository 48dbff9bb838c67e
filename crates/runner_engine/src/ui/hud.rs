//! Heads-up display model

use std::collections::HashSet;

use super::{HostCommand, UiAction};
use crate::core::HudSettings;
use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox};
use crate::foundation::time::Countdown;

/// Top-level UI panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Title artwork over the menu
    Title,
    /// Main menu buttons
    MainMenu,
    /// Volume sliders
    Settings,
    /// Leaderboard
    Leaderboard,
    /// Exit confirmation
    Exit,
    /// In-run HUD (scores, lives, pause button)
    GameUi,
    /// Pause menu
    Pause,
    /// Game-over panel
    GameOver,
}

/// What the HUD widgets currently show
pub struct HudModel {
    settings: HudSettings,
    starting_lives: u32,
    coin_text: String,
    distance_text: String,
    lives: u32,
    shield_decoration: Option<Countdown>,
    final_score_text: String,
    high_score_text: String,
    visible: HashSet<Panel>,
}

impl HudModel {
    /// Main menu showing, counters at their initial values
    pub fn new(settings: HudSettings, starting_lives: u32) -> Self {
        Self {
            settings,
            starting_lives,
            coin_text: "0".to_string(),
            distance_text: distance_text(0.0),
            lives: starting_lives,
            shield_decoration: None,
            final_score_text: String::new(),
            high_score_text: String::new(),
            visible: [Panel::Title, Panel::MainMenu].into_iter().collect(),
        }
    }

    /// Coin counter text
    pub fn coin_text(&self) -> &str {
        &self.coin_text
    }

    /// Distance counter text, e.g. `"42m"`
    pub fn distance_text(&self) -> &str {
        &self.distance_text
    }

    /// Health bar value
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Whether the shielded health bar decoration is showing
    pub fn shield_decoration_visible(&self) -> bool {
        self.shield_decoration.is_some()
    }

    /// Game-over score line
    pub fn final_score_text(&self) -> &str {
        &self.final_score_text
    }

    /// Game-over best score line
    pub fn high_score_text(&self) -> &str {
        &self.high_score_text
    }

    /// Whether `panel` is showing
    pub fn is_visible(&self, panel: Panel) -> bool {
        self.visible.contains(&panel)
    }

    /// Advance the shield decoration
    pub fn tick(&mut self, delta_time: f32) {
        if let Some(countdown) = &mut self.shield_decoration {
            countdown.tick(delta_time);
            if countdown.is_finished() {
                self.shield_decoration = None;
            }
        }
    }

    /// Apply a widget interaction
    ///
    /// Gameplay consequences go to `outbox`; anything only the host can do is
    /// returned. Phase requests only ask: the panels change when the matching
    /// event comes back from the bus.
    pub fn handle_action(&mut self, action: UiAction, outbox: &mut Outbox) -> Option<HostCommand> {
        match action {
            UiAction::Start => outbox.push(GameEvent::GameStart),
            UiAction::OpenSettings => self.show(Panel::Settings),
            UiAction::OpenLeaderboard => self.show(Panel::Leaderboard),
            UiAction::OpenExit => self.show(Panel::Exit),
            UiAction::QuitApplication => return Some(HostCommand::Quit),
            UiAction::Pause => outbox.push(GameEvent::GamePaused),
            UiAction::Resume => outbox.push(GameEvent::GameResumed),
            UiAction::Restart => outbox.push(GameEvent::GameRestart),
            UiAction::QuitToMenu => return Some(HostCommand::ReloadScene),
            UiAction::Support => return Some(HostCommand::OpenUrl(self.settings.support_url.clone())),
            UiAction::MusicVolume(volume) => outbox.push(GameEvent::BgmAudioLevelChanged(volume)),
            UiAction::EffectsVolume(volume) => outbox.push(GameEvent::SfxAudioLevelChanged(volume)),
        }
        None
    }

    fn reset_counters(&mut self) {
        self.coin_text = "0".to_string();
        self.distance_text = distance_text(0.0);
        self.lives = self.starting_lives;
        self.shield_decoration = None;
    }

    fn show(&mut self, panel: Panel) {
        self.visible.insert(panel);
    }

    fn hide(&mut self, panels: &[Panel]) {
        for panel in panels {
            self.visible.remove(panel);
        }
    }
}

fn distance_text(distance: f32) -> String {
    format!("{}m", distance.max(0.0).floor() as u32)
}

impl EventHandler for HudModel {
    fn on_event(&mut self, event: &GameEvent, _outbox: &mut Outbox) -> HandlerResult {
        match event {
            GameEvent::CoinScoreChanged(coins) => self.coin_text = coins.to_string(),
            GameEvent::DistanceUpdated(distance) => self.distance_text = distance_text(*distance),
            GameEvent::LifeUpdated(lives) => self.lives = *lives,
            GameEvent::GameStart => {
                self.hide(&[Panel::Title, Panel::MainMenu, Panel::Pause]);
                self.show(Panel::GameUi);
            }
            GameEvent::GamePaused => self.show(Panel::Pause),
            GameEvent::GameResumed => self.hide(&[Panel::Pause]),
            GameEvent::GameRestart => {
                self.reset_counters();
                self.hide(&[Panel::GameOver, Panel::Pause]);
                self.show(Panel::GameUi);
            }
            GameEvent::PlayerDied => {
                self.hide(&[Panel::GameUi]);
                self.show(Panel::GameOver);
            }
            GameEvent::ShieldCollected(duration) => self.shield_decoration = Some(Countdown::new(*duration)),
            GameEvent::GameOverUiUpdate { score, high_score } => {
                self.final_score_text = format!("Score : {score}");
                self.high_score_text = format!("HighScore : {high_score}");
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hud() -> HudModel {
        HudModel::new(HudSettings::default(), 3)
    }

    fn send(hud: &mut HudModel, event: GameEvent) {
        hud.on_event(&event, &mut Outbox::new()).unwrap();
    }

    #[test]
    fn test_counters_follow_events() {
        let mut hud = hud();
        send(&mut hud, GameEvent::CoinScoreChanged(7));
        send(&mut hud, GameEvent::DistanceUpdated(42.9));
        send(&mut hud, GameEvent::LifeUpdated(1));
        assert_eq!(hud.coin_text(), "7");
        assert_eq!(hud.distance_text(), "42m");
        assert_eq!(hud.lives(), 1);
    }

    #[test]
    fn test_start_swaps_menu_for_game_ui() {
        let mut hud = hud();
        send(&mut hud, GameEvent::GameStart);
        assert!(!hud.is_visible(Panel::MainMenu));
        assert!(!hud.is_visible(Panel::Title));
        assert!(hud.is_visible(Panel::GameUi));
    }

    #[test]
    fn test_phase_requests_leave_panels_alone() {
        let mut hud = hud();
        send(&mut hud, GameEvent::CoinScoreChanged(4));
        let mut outbox = Outbox::new();
        for action in [UiAction::Start, UiAction::Pause, UiAction::Resume, UiAction::Restart] {
            assert!(hud.handle_action(action, &mut outbox).is_none());
        }
        assert_eq!(
            outbox.events(),
            &[GameEvent::GameStart, GameEvent::GamePaused, GameEvent::GameResumed, GameEvent::GameRestart]
        );
        assert!(hud.is_visible(Panel::MainMenu));
        assert!(!hud.is_visible(Panel::GameUi));
        assert!(!hud.is_visible(Panel::Pause));
        assert_eq!(hud.coin_text(), "4");
    }

    #[test]
    fn test_pause_panel_follows_events() {
        let mut hud = hud();
        send(&mut hud, GameEvent::GameStart);
        send(&mut hud, GameEvent::GamePaused);
        assert!(hud.is_visible(Panel::Pause));
        send(&mut hud, GameEvent::GameResumed);
        assert!(!hud.is_visible(Panel::Pause));
        assert!(hud.is_visible(Panel::GameUi));
    }

    #[test]
    fn test_death_swaps_game_ui_for_game_over() {
        let mut hud = hud();
        send(&mut hud, GameEvent::GameStart);
        send(&mut hud, GameEvent::PlayerDied);
        assert!(hud.is_visible(Panel::GameOver));
        assert!(!hud.is_visible(Panel::GameUi));
    }

    #[test]
    fn test_restart_clears_game_over_state() {
        let mut hud = hud();
        send(&mut hud, GameEvent::GameStart);
        send(&mut hud, GameEvent::CoinScoreChanged(5));
        send(&mut hud, GameEvent::LifeUpdated(0));
        send(&mut hud, GameEvent::PlayerDied);
        send(&mut hud, GameEvent::ShieldCollected(5.0));
        assert!(hud.is_visible(Panel::GameOver));

        send(&mut hud, GameEvent::GameRestart);
        assert!(!hud.is_visible(Panel::GameOver));
        assert!(hud.is_visible(Panel::GameUi));
        assert!(!hud.shield_decoration_visible());
        assert_eq!((hud.coin_text(), hud.lives()), ("0", 3));
    }

    #[test]
    fn test_shield_decoration_times_out() {
        let mut hud = hud();
        send(&mut hud, GameEvent::ShieldCollected(2.0));
        hud.tick(1.5);
        assert!(hud.shield_decoration_visible());
        hud.tick(0.5);
        assert!(!hud.shield_decoration_visible());
    }

    #[test]
    fn test_host_requests() {
        let mut hud = hud();
        let mut outbox = Outbox::new();
        assert_eq!(hud.handle_action(UiAction::QuitToMenu, &mut outbox), Some(HostCommand::ReloadScene));
        assert_eq!(hud.handle_action(UiAction::QuitApplication, &mut outbox), Some(HostCommand::Quit));
        assert!(matches!(hud.handle_action(UiAction::Support, &mut outbox), Some(HostCommand::OpenUrl(_))));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_sliders_publish_their_own_channel() {
        let mut hud = hud();
        let mut outbox = Outbox::new();
        hud.handle_action(UiAction::MusicVolume(0.3), &mut outbox);
        hud.handle_action(UiAction::EffectsVolume(0.6), &mut outbox);
        assert_eq!(
            outbox.events(),
            &[GameEvent::BgmAudioLevelChanged(0.3), GameEvent::SfxAudioLevelChanged(0.6)]
        );
    }

    #[test]
    fn test_game_over_texts() {
        let mut hud = hud();
        send(
            &mut hud,
            GameEvent::GameOverUiUpdate { score: "12".into(), high_score: "40".into() },
        );
        assert_eq!(hud.final_score_text(), "Score : 12");
        assert_eq!(hud.high_score_text(), "HighScore : 40");
    }
}
