//! Per-screen animation timing
//!
//! Animations are pure functions of (element index, elapsed time). Each screen
//! owns an `AnimationClock`; nothing here keeps global timers.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::consts::*;
use crate::{ease_out_cubic, lerp};

/// 2D transform applied to an element when drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub offset: Vec2,
    /// Radians
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Elapsed time of one running animation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    elapsed: f32,
    /// Total length including the stagger of the last element
    duration: f32,
    running: bool,
}

impl AnimationClock {
    pub fn start(&mut self, duration: f32) {
        self.elapsed = 0.0;
        self.duration = duration;
        self.running = true;
    }

    pub fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.running = false;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Full length of a staggered animation over `count` elements
pub fn staggered_duration(count: usize, delay: f32, duration: f32) -> f32 {
    count.saturating_sub(1) as f32 * delay + duration
}

/// Eased progress (0..=1) of element `index` whose start is delayed by
/// `index * delay`
pub fn stagger_progress(index: usize, elapsed: f32, delay: f32, duration: f32) -> f32 {
    let local = elapsed - index as f32 * delay;
    if duration <= 0.0 {
        return if local >= 0.0 { 1.0 } else { 0.0 };
    }
    ease_out_cubic(local / duration)
}

/// Tumble of die `index` while a roll animates
pub fn dice_roll_transform(index: usize, elapsed: f32) -> Transform {
    let p = stagger_progress(index, elapsed, DICE_STAGGER, DICE_ROLL_DURATION);
    if p >= 1.0 {
        return Transform::IDENTITY;
    }
    // Alternate spin direction so neighbours don't tumble in lockstep
    let dir = if index % 2 == 0 { 1.0 } else { -1.0 };
    let arc = (PI * p).sin();
    Transform {
        offset: Vec2::new(0.0, -20.0 * arc),
        rotation: dir * (1.0 - p) * 2.0 * TAU,
        scale: 1.0 + 0.25 * arc,
    }
}

/// Drawn position of bead `index` sliding home after a reset
pub fn bead_reset_position(index: usize, elapsed: f32, from: f32, to: f32) -> f32 {
    lerp(
        from,
        to,
        stagger_progress(index, elapsed, RESET_STAGGER, RESET_DURATION),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stagger_delays_later_elements() {
        assert_eq!(stagger_progress(0, 0.0, 0.1, 0.5), 0.0);
        assert_eq!(stagger_progress(2, 0.15, 0.1, 0.5), 0.0);
        assert!(stagger_progress(0, 0.25, 0.1, 0.5) > stagger_progress(1, 0.25, 0.1, 0.5));
        assert_eq!(stagger_progress(3, 10.0, 0.1, 0.5), 1.0);
    }

    #[test]
    fn test_zero_duration_snaps() {
        assert_eq!(stagger_progress(0, 0.0, 0.1, 0.0), 1.0);
        assert_eq!(stagger_progress(1, 0.0, 0.1, 0.0), 0.0);
    }

    #[test]
    fn test_dice_transform_settles() {
        let done = staggered_duration(6, DICE_STAGGER, DICE_ROLL_DURATION) + 0.01;
        for i in 0..6 {
            assert_eq!(dice_roll_transform(i, done), Transform::IDENTITY);
        }
        let mid = dice_roll_transform(0, DICE_ROLL_DURATION / 2.0);
        assert!(mid.scale > 1.0);
        assert!(mid.offset.y < 0.0);
    }

    #[test]
    fn test_bead_reset_position_interpolates() {
        assert_eq!(bead_reset_position(0, 0.0, 300.0, 0.0), 300.0);
        assert_eq!(bead_reset_position(0, 100.0, 300.0, 0.0), 0.0);
        let mid = bead_reset_position(0, RESET_DURATION / 2.0, 300.0, 0.0);
        assert!(mid > 0.0 && mid < 300.0);
    }

    #[test]
    fn test_clock_runs_to_duration() {
        let mut clock = AnimationClock::default();
        assert!(!clock.is_running());
        clock.tick(1.0);
        assert_eq!(clock.elapsed(), 0.0);

        clock.start(0.5);
        clock.tick(0.2);
        assert!(clock.is_running());
        assert_eq!(clock.elapsed(), 0.2);
        clock.tick(0.4);
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), 0.5);
    }
}
