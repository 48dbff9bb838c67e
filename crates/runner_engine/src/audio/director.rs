//! Event-driven cue playback

use super::{AudioBackend, Channel, Mixer};
use crate::core::AudioSettings;
use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox};
use crate::persistence::{Preferences, PreferencesStore};

/// Plays the configured cue for each gameplay event
pub struct AudioDirector {
    settings: AudioSettings,
    backend: Box<dyn AudioBackend>,
    mixer: Mixer,
    preferences: Option<PreferencesStore>,
    current_music: Option<String>,
}

impl AudioDirector {
    /// Create a director with the configured default volumes
    pub fn new(settings: AudioSettings, backend: Box<dyn AudioBackend>) -> Self {
        let mixer = Mixer::new(settings.default_music_volume, settings.default_effects_volume);
        let mut director = Self {
            settings,
            backend,
            mixer,
            preferences: None,
            current_music: None,
        };
        director.apply_volumes();
        director
    }

    /// Restore volumes from `store` and write future changes back to it
    pub fn set_preferences(&mut self, store: PreferencesStore) {
        let prefs = store.load();
        self.mixer = Mixer::new(prefs.bgm_volume, prefs.sfx_volume);
        self.preferences = Some(store);
        self.apply_volumes();
    }

    /// Current channel levels
    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Track currently looping, if any
    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_deref()
    }

    /// Start the menu track
    pub fn play_menu_music(&mut self) {
        let clip = self.settings.menu_music.clone();
        self.play_music(&clip);
    }

    /// Play a music clip by name; unknown names are logged and skipped
    pub fn play_music(&mut self, name: &str) {
        if !self.settings.music_clips.iter().any(|clip| clip == name) {
            log::warn!("Music clip '{name}' not found");
            return;
        }
        self.backend.play_music(name);
        self.current_music = Some(name.to_string());
    }

    /// Play an effect clip by name; unknown names are logged and skipped
    pub fn play_effect(&mut self, name: &str) {
        if !self.settings.effect_clips.iter().any(|clip| clip == name) {
            log::warn!("Effect clip '{name}' not found");
            return;
        }
        self.backend.play_effect(name);
    }

    /// Change one channel and persist both levels
    pub fn set_volume(&mut self, channel: Channel, volume: f32) {
        let applied = self.mixer.set_volume(channel, volume);
        self.backend.set_volume(channel, applied);

        if let Some(store) = &self.preferences {
            let prefs = Preferences {
                bgm_volume: self.mixer.volume(Channel::Music),
                sfx_volume: self.mixer.volume(Channel::Effects),
            };
            if let Err(e) = store.save(&prefs) {
                log::warn!("Volume change not saved: {e}");
            }
        }
    }

    fn apply_volumes(&mut self) {
        for channel in [Channel::Music, Channel::Effects] {
            self.backend.set_volume(channel, self.mixer.volume(channel));
        }
    }

    fn effect_for(&self, event: &GameEvent) -> Option<&str> {
        let cue = match event {
            GameEvent::CoinCollected(_) => &self.settings.coin,
            GameEvent::PlayerHitObstacle => &self.settings.obstacle_hit,
            GameEvent::PlayerJumped => &self.settings.jump,
            GameEvent::PlayerDoubleJumped => &self.settings.double_jump,
            GameEvent::ScoreBoostCollected(_) => &self.settings.score_boost,
            GameEvent::ShieldCollected(_) => &self.settings.shield,
            _ => return None,
        };
        Some(cue.as_str())
    }
}

impl EventHandler for AudioDirector {
    fn on_event(&mut self, event: &GameEvent, _outbox: &mut Outbox) -> HandlerResult {
        match event {
            GameEvent::GameStart | GameEvent::GameRestart => {
                let clip = self.settings.game_music.clone();
                self.play_music(&clip);
            }
            GameEvent::BgmAudioLevelChanged(volume) => self.set_volume(Channel::Music, *volume),
            GameEvent::SfxAudioLevelChanged(volume) => self.set_volume(Channel::Effects, *volume),
            other => {
                if let Some(cue) = self.effect_for(other).map(str::to_string) {
                    self.play_effect(&cue);
                }
            }
        }
        Ok(())
    }
}
