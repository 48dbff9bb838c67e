//! Volume channels
//!
//! Music and effects are controlled independently; a change to one never
//! touches the other.

/// Volume channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Background music
    Music,
    /// One-shot sound effects
    Effects,
}

/// Per-channel volume levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    music: f32,
    effects: f32,
}

impl Mixer {
    /// Create a mixer with the given levels (clamped to 0..=1)
    pub fn new(music: f32, effects: f32) -> Self {
        Self {
            music: music.clamp(0.0, 1.0),
            effects: effects.clamp(0.0, 1.0),
        }
    }

    /// Set one channel (clamped to 0..=1), returning the applied level
    pub fn set_volume(&mut self, channel: Channel, volume: f32) -> f32 {
        let clamped = volume.clamp(0.0, 1.0);
        match channel {
            Channel::Music => self.music = clamped,
            Channel::Effects => self.effects = clamped,
        }
        clamped
    }

    /// Current level of one channel
    pub fn volume(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Music => self.music,
            Channel::Effects => self.effects,
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_independent() {
        let mut mixer = Mixer::default();
        mixer.set_volume(Channel::Music, 0.3);
        assert_eq!(mixer.volume(Channel::Music), 0.3);
        assert_eq!(mixer.volume(Channel::Effects), 1.0);
    }

    #[test]
    fn test_volume_clamping() {
        let mut mixer = Mixer::default();
        assert_eq!(mixer.set_volume(Channel::Effects, 2.0), 1.0);
        assert_eq!(mixer.set_volume(Channel::Effects, -0.5), 0.0);
    }
}
