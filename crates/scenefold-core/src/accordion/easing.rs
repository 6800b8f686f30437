//! Easing curves for snap animations
//!
//! Maps progress in [0, 1] to eased progress in [0, 1].

pub use crate::config::EasingType;

impl EasingType {
    /// Eased progress for linear progress `t`; both in [0, 1]
    ///
    /// All curves except `None` decelerate into the target so a snap lands
    /// softly.
    #[inline]
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            // Jump at the end of the animation
            EasingType::None if t < 1.0 => 0.0,
            EasingType::None => 1.0,
            EasingType::Linear => t,
            EasingType::Cubic => 1.0 - (1.0 - t).powi(3),
            EasingType::Quintic => 1.0 - (1.0 - t).powi(5),
            // 2^-10 is not quite 0, so pin the last frame
            EasingType::EaseOut if t >= 1.0 => 1.0,
            EasingType::EaseOut => 1.0 - 2.0_f64.powf(-10.0 * t),
        }
    }
}
