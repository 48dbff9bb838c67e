//! # Core Module
//!
//! Shared configuration for every runner subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration for pools, spawning, scrolling, stats,
//!   audio, player and HUD

pub mod config;

// Re-export commonly used config types
pub use config::{
    AudioSettings,
    EngineSettings,
    HudSettings,
    ObjectSettings,
    PlayerSettings,
    PoolSettings,
    PrototypeSettings,
    RunnerConfig,
    ScrollerSettings,
    SpawnSettings,
    StatsSettings,
};
pub use crate::config::{Config, ConfigError};
