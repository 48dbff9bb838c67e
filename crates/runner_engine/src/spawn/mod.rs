//! Spawn scheduling
//!
//! Timer-driven decisions about when to pull coins, power-ups and obstacles
//! out of the object pool.

mod scheduler;

pub use scheduler::{choose_category, SchedulerState, SpawnRecord, SpawnScheduler};
