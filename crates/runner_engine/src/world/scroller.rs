//! Ground segment scroller
//!
//! Segments form a FIFO ordered left to right. When the head segment has
//! fully left the viewport it is moved to sit right after the tail, so the
//! same handful of segments covers an endless world.

use crate::core::ScrollerSettings;
use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox};
use crate::foundation::math::Vec2;
use crate::foundation::time::Countdown;
use std::collections::VecDeque;

const MAX_RECYCLES_PER_TICK: usize = 1024;

/// Scroller behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Menu backdrop: constant base speed, no distance tracking
    Idle,
    /// Game running: speed ramps up and distance is published
    Game,
}

/// One ground segment, positioned by its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Stable id, the index it was created with
    pub id: usize,
    /// Center position
    pub position: Vec2,
}

/// Sliding window of ground segments
pub struct WorldScroller {
    settings: ScrollerSettings,
    segments: VecDeque<Segment>,
    mode: ScrollMode,
    speed: f32,
    total_distance: f32,
    multiplier: f32,
    boost: Option<Countdown>,
    recycled: u64,
}

impl WorldScroller {
    /// Create a scroller with its initial segments laid out
    pub fn new(settings: ScrollerSettings) -> Self {
        let mut scroller = Self {
            speed: settings.base_speed,
            settings,
            segments: VecDeque::new(),
            mode: ScrollMode::Idle,
            total_distance: 0.0,
            multiplier: 1.0,
            boost: None,
            recycled: 0,
        };
        scroller.lay_out_segments();
        log::info!(
            "World scroller ready with {} segments of width {}",
            scroller.segments.len(),
            scroller.settings.segment_width
        );
        scroller
    }

    /// Advance one frame
    ///
    /// Returns the distance the world moved this frame.
    pub fn tick(&mut self, delta_time: f32, outbox: &mut Outbox) -> f32 {
        let move_distance = match self.mode {
            ScrollMode::Game => {
                self.speed = (self.speed + self.settings.speed_increase_rate * delta_time)
                    .min(self.settings.max_speed);
                let distance = self.speed * delta_time * self.multiplier;
                self.total_distance += distance;
                outbox.push(GameEvent::DistanceUpdated(self.total_distance));
                outbox.push(GameEvent::WorldSpeedUpdate(self.speed * delta_time));
                distance
            }
            ScrollMode::Idle => self.settings.base_speed * delta_time,
        };

        for segment in &mut self.segments {
            segment.position.x -= move_distance;
        }
        self.recycle_passed_segments();

        if let Some(boost) = &mut self.boost {
            if boost.tick(delta_time) {
                self.multiplier = 1.0;
                self.boost = None;
                log::debug!("Score boost ended");
            }
        }
        move_distance
    }

    /// Start (or restart) the score boost; the latest pickup wins
    pub fn start_boost(&mut self, duration: f32) {
        self.multiplier = self.settings.boost_multiplier;
        self.boost = Some(Countdown::new(duration));
    }

    /// Back to base speed, zero distance and freshly laid segments
    pub fn reset(&mut self, outbox: &mut Outbox) {
        self.speed = self.settings.base_speed;
        self.total_distance = 0.0;
        self.multiplier = 1.0;
        self.boost = None;
        self.lay_out_segments();
        outbox.push(GameEvent::DistanceUpdated(0.0));
    }

    /// Segments from left to right
    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter()
    }

    /// Current scroll speed
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance travelled this session
    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    /// Current distance multiplier
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Seconds of boost left, if one is running
    pub fn boost_remaining(&self) -> Option<f32> {
        self.boost.as_ref().map(Countdown::remaining)
    }

    /// Idle or game
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    /// Total recycle operations so far
    pub fn recycled_count(&self) -> u64 {
        self.recycled
    }

    fn lay_out_segments(&mut self) {
        let count = self.settings.effective_segment_count();
        let origin = Vec2::new(self.settings.origin[0], self.settings.origin[1]);
        self.segments = (0..count)
            .map(|id| Segment {
                id,
                position: origin + Vec2::new(id as f32 * self.settings.segment_width, 0.0),
            })
            .collect();
    }

    fn recycle_passed_segments(&mut self) {
        let half_width = self.settings.segment_width / 2.0;
        let left_edge = self.settings.viewport_left();

        // Bounded so a non-finite position cannot spin forever
        for _ in 0..MAX_RECYCLES_PER_TICK {
            let passed = self
                .segments
                .front()
                .is_some_and(|head| head.position.x + half_width < left_edge);
            if !passed {
                break;
            }
            let Some(tail) = self.segments.back().copied() else {
                break;
            };
            let Some(mut head) = self.segments.pop_front() else {
                break;
            };
            head.position = tail.position + Vec2::new(self.settings.segment_width, 0.0);
            self.segments.push_back(head);
            self.recycled += 1;
        }
    }
}

impl EventHandler for WorldScroller {
    fn on_event(&mut self, event: &GameEvent, outbox: &mut Outbox) -> HandlerResult {
        match event {
            GameEvent::GameStart => self.mode = ScrollMode::Game,
            GameEvent::GameOver => self.mode = ScrollMode::Idle,
            GameEvent::GameRestart => {
                self.reset(outbox);
                self.mode = ScrollMode::Game;
            }
            GameEvent::ScoreBoostCollected(duration) => self.start_boost(*duration),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn settings() -> ScrollerSettings {
        ScrollerSettings {
            base_speed: 5.0,
            speed_increase_rate: 1.0,
            max_speed: 8.0,
            segment_width: 10.0,
            initial_segment_count: 3,
            origin: [-10.0, 0.0],
            viewport_center_x: 0.0,
            viewport_half_width: 10.0,
            boost_multiplier: 2.0,
        }
    }

    fn running(settings: ScrollerSettings) -> WorldScroller {
        let mut scroller = WorldScroller::new(settings);
        scroller.on_event(&GameEvent::GameStart, &mut Outbox::new()).unwrap();
        scroller
    }

    fn assert_evenly_spaced(scroller: &WorldScroller, width: f32) {
        let xs: Vec<f32> = scroller.segments().map(|s| s.position.x).collect();
        for pair in xs.windows(2) {
            assert!(pair[1] > pair[0]);
            assert_abs_diff_eq!(pair[1] - pair[0], width, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_initial_layout_covers_viewport() {
        let scroller = WorldScroller::new(settings());
        // 20 wide viewport / 10 wide segments + 1 spare
        assert_eq!(scroller.segments().count(), 3);
        assert_evenly_spaced(&scroller, 10.0);
    }

    #[test]
    fn test_idle_mode_scrolls_without_distance() {
        let mut scroller = WorldScroller::new(settings());
        let mut outbox = Outbox::new();
        let moved = scroller.tick(1.0, &mut outbox);
        assert_abs_diff_eq!(moved, 5.0);
        assert!(outbox.is_empty());
        assert_eq!(scroller.total_distance(), 0.0);
    }

    #[test]
    fn test_speed_ramps_to_cap() {
        let mut scroller = running(settings());
        let mut outbox = Outbox::new();
        for _ in 0..10 {
            scroller.tick(1.0, &mut outbox);
        }
        assert_abs_diff_eq!(scroller.speed(), 8.0);
    }

    #[test]
    fn test_game_tick_publishes_distance_and_speed() {
        let mut scroller = running(settings());
        let mut outbox = Outbox::new();
        scroller.tick(0.5, &mut outbox);
        // speed 5 + 0.5 = 5.5, distance 5.5 * 0.5
        assert_eq!(
            outbox.events(),
            &[GameEvent::DistanceUpdated(2.75), GameEvent::WorldSpeedUpdate(2.75)]
        );
    }

    #[test]
    fn test_wraparound_keeps_spacing() {
        let mut config = settings();
        config.speed_increase_rate = 0.0;
        let mut scroller = running(config);
        let head_id = scroller.segments().next().unwrap().id;
        let head_x = |s: &WorldScroller| {
            s.segments().find(|seg| seg.id == head_id).unwrap().position.x
        };
        let count = scroller.segments().count() as f32;
        let mut outbox = Outbox::new();
        let mut previous_x = head_x(&scroller);
        let mut head_wrapped = false;

        while scroller.total_distance() < count * 10.0 + 1.0 {
            scroller.tick(0.1, &mut outbox);
            assert_evenly_spaced(&scroller, 10.0);
            let x = head_x(&scroller);
            // Scrolling only moves left, so a jump right is a recycle
            if x > previous_x {
                head_wrapped = true;
            }
            previous_x = x;
        }

        assert!(scroller.recycled_count() >= 1);
        assert!(head_wrapped);
    }

    #[test]
    fn test_large_step_recycles_repeatedly() {
        let mut scroller = running(settings());
        scroller.tick(5.0, &mut Outbox::new());
        assert_evenly_spaced(&scroller, 10.0);
        let head = scroller.segments().next().unwrap();
        assert!(head.position.x + 5.0 >= -10.0);
    }

    #[test]
    fn test_boost_doubles_distance_then_decays() {
        let mut config = settings();
        config.speed_increase_rate = 0.0;
        let mut scroller = running(config);
        let mut outbox = Outbox::new();
        scroller.start_boost(2.0);

        scroller.tick(1.0, &mut outbox);
        assert_abs_diff_eq!(scroller.total_distance(), 10.0);
        scroller.tick(1.0, &mut outbox);
        assert_abs_diff_eq!(scroller.total_distance(), 20.0);
        assert_eq!(scroller.multiplier(), 1.0);
        scroller.tick(1.0, &mut outbox);
        assert_abs_diff_eq!(scroller.total_distance(), 25.0);
    }

    #[test]
    fn test_second_boost_restarts_duration() {
        let mut scroller = running(settings());
        let mut outbox = Outbox::new();
        scroller.start_boost(3.0);
        scroller.tick(2.0, &mut outbox);
        scroller.on_event(&GameEvent::ScoreBoostCollected(3.0), &mut outbox).unwrap();
        scroller.tick(2.0, &mut outbox);

        assert_eq!(scroller.multiplier(), 2.0);
        assert_abs_diff_eq!(scroller.boost_remaining().unwrap(), 1.0);
    }

    #[test]
    fn test_restart_resets_distance_and_layout() {
        let mut scroller = running(settings());
        let mut outbox = Outbox::new();
        for _ in 0..20 {
            scroller.tick(0.5, &mut outbox);
        }
        outbox.clear();

        scroller.on_event(&GameEvent::GameRestart, &mut outbox).unwrap();
        assert_eq!(scroller.total_distance(), 0.0);
        assert_eq!(scroller.speed(), 5.0);
        assert_eq!(scroller.mode(), ScrollMode::Game);
        assert_abs_diff_eq!(scroller.segments().next().unwrap().position.x, -10.0);
        assert_eq!(outbox.events(), &[GameEvent::DistanceUpdated(0.0)]);
    }
}
