//! Snap animation controller
//!
//! Drives an open ratio from its current value to a snap target over a fixed
//! duration. Call `snap_to()` to begin, then `update()` every render pass.

use std::time::Duration;

use tokio::time::Instant;

use super::easing::EasingType;
use super::timing::{clamp_ratio, is_complete, lerp, progress};
use crate::config::SnapConfig;

/// In-flight snap
#[derive(Debug, Clone)]
struct ActiveSnap {
    start: Instant,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone)]
pub struct SnapAnimator {
    animation: Option<ActiveSnap>,
    duration: Duration,
    easing: EasingType,
}

impl SnapAnimator {
    pub fn new(duration: Duration, easing: EasingType) -> Self {
        Self {
            animation: None,
            duration,
            easing,
        }
    }

    pub fn from_config(config: &SnapConfig) -> Self {
        Self::new(Duration::from_millis(config.animation_duration_ms), config.easing)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the in-flight snap, `None` once consumed
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Start animating from `from` toward `target`
    ///
    /// Re-targeting to the value already being animated toward is a no-op so
    /// replayed snap requests do not restart the clock.
    pub fn snap_to(&mut self, from: f64, target: f64, now: Instant) {
        let target = clamp_ratio(target);
        if self.target() == Some(target) {
            return;
        }
        self.animation = Some(ActiveSnap {
            start: now,
            from: clamp_ratio(from),
            to: target,
        });
    }

    /// Advance the animation and return the ratio it dictates
    ///
    /// Returns `None` when no snap is in flight. The final frame returns the
    /// exact target and clears the animation.
    pub fn update(&mut self, now: Instant) -> Option<f64> {
        let anim = self.animation.as_ref()?;
        if is_complete(anim.start, now, self.duration) {
            let to = anim.to;
            self.animation = None;
            return Some(to);
        }
        let t = self.easing.ease(progress(anim.start, now, self.duration));
        Some(clamp_ratio(lerp(anim.from, anim.to, t)))
    }

    /// Abandon any in-flight snap, leaving the ratio where it is
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}
