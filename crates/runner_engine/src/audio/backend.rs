//! Audio backend abstraction

use super::Channel;

/// Playback device the director drives
///
/// Implementations are single-threaded; the director calls them from the
/// session tick only.
pub trait AudioBackend {
    /// Replace the looping background track
    fn play_music(&mut self, clip: &str);

    /// Fire a one-shot effect
    fn play_effect(&mut self, clip: &str);

    /// Apply a channel volume, 0 to 1
    fn set_volume(&mut self, channel: Channel, volume: f32);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play_music(&mut self, clip: &str) {
        log::trace!("music: {clip}");
    }

    fn play_effect(&mut self, clip: &str) {
        log::trace!("effect: {clip}");
    }

    fn set_volume(&mut self, channel: Channel, volume: f32) {
        log::trace!("{channel:?} volume: {volume:.2}");
    }
}
