//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the runner core:
//! - 2D math types and interpolation helpers
//! - Handle types for pooled instances and subscriptions
//! - Tick-driven countdown timers
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
