//! Audio cues
//!
//! Maps gameplay events onto named music and effect clips and keeps the two
//! volume channels. Playback itself happens behind [`AudioBackend`].

mod backend;
mod director;
mod mixer;

pub use backend::{AudioBackend, SilentBackend};
pub use director::AudioDirector;
pub use mixer::{Channel, Mixer};
