//! Player locomotion decisions
//!
//! The host owns the rigid body and ground probe; this module decides what a
//! jump press means and how fast the run cycle should animate.

use crate::core::PlayerSettings;
use crate::events::{EventHandler, GameEvent, HandlerResult, Outbox};
use crate::foundation::math::{inverse_lerp, lerp};

/// Result of a jump press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpOutcome {
    /// Jump from the ground with this upward velocity
    Jump(f32),
    /// Mid-air jump with this upward velocity
    DoubleJump(f32),
    /// Already used the mid-air jump
    Ignored,
}

/// Jump and animation state of the runner
#[derive(Debug, Clone)]
pub struct Locomotion {
    settings: PlayerSettings,
    grounded: bool,
    can_double_jump: bool,
    animation_speed: f32,
}

impl Locomotion {
    /// Create a grounded runner
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            settings,
            grounded: true,
            can_double_jump: true,
            animation_speed: 1.0,
        }
    }

    /// Upward velocity that reaches `height` under the configured gravity
    pub fn launch_velocity(&self, height: f32) -> f32 {
        (height * 2.0 * self.settings.gravity * self.settings.gravity_scale).sqrt()
    }

    /// Report the host's ground probe; landing restores the mid-air jump
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
        if grounded {
            self.can_double_jump = true;
        }
    }

    /// Whether the last probe touched ground
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Handle a jump press given the current ground probe
    pub fn jump_pressed(&mut self, grounded: bool, outbox: &mut Outbox) -> JumpOutcome {
        self.set_grounded(grounded);

        if self.grounded {
            self.grounded = false;
            outbox.push(GameEvent::PlayerJumped);
            JumpOutcome::Jump(self.launch_velocity(self.settings.jump_height))
        } else if self.can_double_jump {
            self.can_double_jump = false;
            outbox.push(GameEvent::PlayerDoubleJumped);
            JumpOutcome::DoubleJump(self.launch_velocity(self.settings.double_jump_height))
        } else {
            JumpOutcome::Ignored
        }
    }

    /// Recompute the run cycle speed from the world scroll speed
    ///
    /// Airborne runners animate at normal speed.
    pub fn update_animation(&mut self, world_speed: f32) -> f32 {
        self.animation_speed = if self.grounded {
            let t = inverse_lerp(
                self.settings.speed_at_min_anim,
                self.settings.speed_at_max_anim,
                world_speed,
            );
            lerp(self.settings.min_anim_speed, self.settings.max_anim_speed, t)
        } else {
            1.0
        };
        self.animation_speed
    }

    /// Current run cycle speed
    pub fn animation_speed(&self) -> f32 {
        self.animation_speed
    }

    /// Back on the ground at normal animation speed
    pub fn reset(&mut self) {
        self.grounded = true;
        self.can_double_jump = true;
        self.animation_speed = 1.0;
    }
}

impl EventHandler for Locomotion {
    fn on_event(&mut self, event: &GameEvent, _outbox: &mut Outbox) -> HandlerResult {
        if matches!(event, GameEvent::GameRestart) {
            self.reset();
        }
        Ok(())
    }
}
