//! # Unified Configuration System
//!
//! All tunables of the runner in one serializable tree. Every section has
//! `#[serde(default)]`, so a config file only needs the values it changes.
//!
//! ## Configuration Categories
//!
//! - **Engine**: log level, RNG seed, fixed timestep for headless hosts
//! - **Pools**: prototypes and how many idle instances to pre-warm
//! - **Spawn**: category intervals, cooldown, coin line shape
//! - **Scroller**: speed ramp, segment layout, viewport, score boost
//! - **Stats / Player / Audio / HUD**: gameplay and presentation glue

use crate::config::{Config, ConfigError};
use crate::entities::EntityKind;
use crate::events::{PowerUpData, PowerUpKind};
use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// # Engine Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Log level for the runner
    pub log_level: String,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Step used by hosts that drive the session at a fixed rate
    pub fixed_timestep: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            seed: None,
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

/// One pooled prototype and its pre-warm count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeSettings {
    /// Unique name
    pub name: String,
    /// Behaviour on contact
    pub kind: EntityKind,
    /// Idle instances created at startup
    pub initial_count: usize,
}

impl PrototypeSettings {
    /// Create prototype settings
    pub fn new(name: impl Into<String>, kind: EntityKind, initial_count: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            initial_count,
        }
    }
}

/// # Pool Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    /// Prototypes in registration order
    pub prototypes: Vec<PrototypeSettings>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            prototypes: vec![
                PrototypeSettings::new("coin", EntityKind::Coin { value: 1 }, 15),
                PrototypeSettings::new("rock", EntityKind::Obstacle, 3),
                PrototypeSettings::new("crate", EntityKind::Obstacle, 3),
                PrototypeSettings::new(
                    "score_booster",
                    EntityKind::PowerUp(PowerUpData::new(PowerUpKind::ScoreBooster, 5.0, "score_boost_icon")),
                    2,
                ),
                PrototypeSettings::new(
                    "shield",
                    EntityKind::PowerUp(PowerUpData::new(PowerUpKind::Shield, 5.0, "shield_icon")),
                    2,
                ),
            ],
        }
    }
}

/// # Spawn Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Seconds between coin lines
    pub coin_interval: f32,
    /// Seconds between power-ups
    pub power_up_interval: f32,
    /// Seconds between obstacles
    pub obstacle_interval: f32,
    /// Pause after every spawn during which nothing is evaluated
    pub cooldown: f32,
    /// Fewest coins in a line
    pub coin_count_min: u32,
    /// Most coins in a line
    pub coin_count_max: u32,
    /// Horizontal gap between coins in a line
    pub coin_spacing: f32,
    /// Where spawned objects appear
    pub spawn_point: [f32; 2],
}

impl SpawnSettings {
    /// Spawn point as a vector
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_point[0], self.spawn_point[1])
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [self.coin_interval, self.power_up_interval, self.obstacle_interval];
        if !intervals.into_iter().all(is_non_negative) {
            return Err(ConfigError::Invalid(format!(
                "spawn intervals {intervals:?} must be non-negative numbers"
            )));
        }
        if !is_non_negative(self.cooldown) {
            return Err(ConfigError::Invalid(format!(
                "spawn cooldown {} must be a non-negative number",
                self.cooldown
            )));
        }
        if self.coin_count_min == 0 || self.coin_count_min > self.coin_count_max {
            return Err(ConfigError::Invalid(format!(
                "coin line size range {}..={} is empty",
                self.coin_count_min, self.coin_count_max
            )));
        }
        Ok(())
    }
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            coin_interval: 2.0,
            power_up_interval: 5.0,
            obstacle_interval: 4.0,
            cooldown: 2.0,
            coin_count_min: 3,
            coin_count_max: 5,
            coin_spacing: 1.5,
            spawn_point: [12.0, -2.5],
        }
    }
}

/// # Scroller Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollerSettings {
    /// Starting speed, also the attract-mode speed
    pub base_speed: f32,
    /// Speed gained per second while running
    pub speed_increase_rate: f32,
    /// Speed cap
    pub max_speed: f32,
    /// Width of one ground segment
    pub segment_width: f32,
    /// Minimum number of segments kept in the window
    pub initial_segment_count: usize,
    /// Center of the first segment
    pub origin: [f32; 2],
    /// Camera x position
    pub viewport_center_x: f32,
    /// Half the visible width
    pub viewport_half_width: f32,
    /// Distance multiplier while a score booster runs
    pub boost_multiplier: f32,
}

impl ScrollerSettings {
    /// Left edge of the visible area
    pub fn viewport_left(&self) -> f32 {
        self.viewport_center_x - self.viewport_half_width
    }

    /// Segment count that covers the viewport plus one spare
    pub fn effective_segment_count(&self) -> usize {
        let viewport_width = self.viewport_half_width * 2.0;
        let needed = (viewport_width / self.segment_width).ceil().max(0.0) as usize + 1;
        self.initial_segment_count.max(needed)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.segment_width) {
            return Err(ConfigError::Invalid("segment width must be positive".into()));
        }
        if !is_non_negative(self.base_speed)
            || !is_non_negative(self.speed_increase_rate)
            || !is_non_negative(self.max_speed - self.base_speed)
        {
            return Err(ConfigError::Invalid(format!(
                "speed range {}..{} at +{}/s is invalid",
                self.base_speed, self.max_speed, self.speed_increase_rate
            )));
        }
        if !is_positive(self.viewport_half_width) {
            return Err(ConfigError::Invalid("viewport width must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ScrollerSettings {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            speed_increase_rate: 0.1,
            max_speed: 15.0,
            segment_width: 10.0,
            initial_segment_count: 3,
            origin: [-10.0, -4.0],
            viewport_center_x: 0.0,
            viewport_half_width: 10.0,
            boost_multiplier: 2.0,
        }
    }
}

/// # Object Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSettings {
    /// Active pooled objects left of this x go back to their pool
    pub despawn_x: f32,
}

impl Default for ObjectSettings {
    fn default() -> Self {
        Self { despawn_x: -15.0 }
    }
}

/// # Stats Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    /// Lives at session start
    pub starting_lives: u32,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self { starting_lives: 3 }
    }
}

/// # Player Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Height of a ground jump
    pub jump_height: f32,
    /// Height of the mid-air jump
    pub double_jump_height: f32,
    /// Gravity magnitude
    pub gravity: f32,
    /// Gravity multiplier applied to the player
    pub gravity_scale: f32,
    /// Run animation speed at the slow end
    pub min_anim_speed: f32,
    /// Run animation speed at the fast end
    pub max_anim_speed: f32,
    /// World speed mapped to `min_anim_speed`
    pub speed_at_min_anim: f32,
    /// World speed mapped to `max_anim_speed`
    pub speed_at_max_anim: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            jump_height: 2.0,
            double_jump_height: 1.5,
            gravity: 9.81,
            gravity_scale: 3.0,
            min_anim_speed: 1.0,
            max_anim_speed: 2.0,
            speed_at_min_anim: 5.0,
            speed_at_max_anim: 30.0,
        }
    }
}

/// # Audio Settings
///
/// Cue names map gameplay moments to clips; the clip lists are what the
/// host actually has loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Music clips available to the host
    pub music_clips: Vec<String>,
    /// Effect clips available to the host
    pub effect_clips: Vec<String>,
    /// Music in the main menu
    pub menu_music: String,
    /// Music while playing
    pub game_music: String,
    /// Coin pickup
    pub coin: String,
    /// Obstacle hit
    pub obstacle_hit: String,
    /// Ground jump
    pub jump: String,
    /// Mid-air jump
    pub double_jump: String,
    /// Score booster pickup
    pub score_boost: String,
    /// Shield pickup
    pub shield: String,
    /// Music volume when no preference is stored
    pub default_music_volume: f32,
    /// Effects volume when no preference is stored
    pub default_effects_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_clips: vec!["BGM1".into(), "BGM2".into()],
            effect_clips: vec![
                "CoinPicked".into(),
                "ObstacleHit".into(),
                "Jump".into(),
                "DoubleJump".into(),
                "ScoreBoostPicked".into(),
                "ShieldPicked".into(),
            ],
            menu_music: "BGM1".into(),
            game_music: "BGM2".into(),
            coin: "CoinPicked".into(),
            obstacle_hit: "ObstacleHit".into(),
            jump: "Jump".into(),
            double_jump: "DoubleJump".into(),
            score_boost: "ScoreBoostPicked".into(),
            shield: "ShieldPicked".into(),
            default_music_volume: 1.0,
            default_effects_volume: 1.0,
        }
    }
}

/// # HUD Settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudSettings {
    /// Page opened by the support button
    pub support_url: String,
}

impl Default for HudSettings {
    fn default() -> Self {
        Self {
            support_url: "https://example.com/runner".to_string(),
        }
    }
}

/// # Complete Runner Configuration
///
/// Top-level configuration that encompasses all runner subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Engine core configuration
    pub engine: EngineSettings,
    /// Pooled prototypes
    pub pools: PoolSettings,
    /// Spawn scheduling
    pub spawn: SpawnSettings,
    /// World scrolling
    pub scroller: ScrollerSettings,
    /// Pooled object movement
    pub objects: ObjectSettings,
    /// Session stats
    pub stats: StatsSettings,
    /// Player locomotion
    pub player: PlayerSettings,
    /// Audio cues
    pub audio: AudioSettings,
    /// HUD wiring
    pub hud: HudSettings,
}

impl RunnerConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn.validate()?;
        self.scroller.validate()?;

        let mut names: Vec<&str> = self.pools.prototypes.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ConfigError::Invalid(format!("duplicate prototype name '{}'", pair[0])));
        }
        if self.stats.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting lives must be at least 1".into()));
        }
        Ok(())
    }
}

impl Config for RunnerConfig {}

/// False for NaN as well as for negatives
fn is_non_negative(value: f32) -> bool {
    value >= 0.0
}

/// False for NaN as well as for zero and negatives
fn is_positive(value: f32) -> bool {
    value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        RunnerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_segment_count_covers_viewport() {
        let settings = ScrollerSettings {
            segment_width: 4.0,
            initial_segment_count: 2,
            viewport_half_width: 9.0,
            ..ScrollerSettings::default()
        };
        // 18 wide viewport needs ceil(18 / 4) + 1 segments
        assert_eq!(settings.effective_segment_count(), 6);
    }

    #[test]
    fn test_duplicate_prototype_names_rejected() {
        let mut config = RunnerConfig::default();
        config.pools.prototypes.push(PrototypeSettings::new("coin", EntityKind::Coin { value: 2 }, 1));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_coin_range_rejected() {
        let mut config = RunnerConfig::default();
        config.spawn.coin_count_min = 6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_settings_rejected() {
        let mut config = RunnerConfig::default();
        config.spawn.obstacle_interval = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RunnerConfig::default();
        config.spawn.cooldown = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RunnerConfig::default();
        config.scroller.max_speed = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RunnerConfig::default();
        config.scroller.base_speed = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RunnerConfig::default();
        config.scroller.segment_width = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RunnerConfig::default();
        config.scroller.viewport_half_width = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RunnerConfig = toml::from_str("[spawn]\ncooldown = 1.0\n").unwrap();
        assert_eq!(config.spawn.cooldown, 1.0);
        assert_eq!(config.spawn.coin_interval, 2.0);
        assert_eq!(config.stats.starting_lives, 3);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = RunnerConfig::default();
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: RunnerConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
