//! World scrolling
//!
//! Rolling window of ground segments plus the speed ramp and distance
//! counter that drive scoring.

mod scroller;

pub use scroller::{ScrollMode, Segment, WorldScroller};
