//! Tab bar styling derived from the drawer ratio
//!
//! Pure functions: the drawer engine owns the ratio, the tab bar only reads it.

use crate::accordion::timing::{clamp_ratio, lerp};
use crate::config::DrawerConfig;

/// Ratio below which labels are fully transparent
const LABEL_FADE_START: f64 = 0.5;
/// Label scale when the drawer is collapsed
const LABEL_MIN_SCALE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabLabelStyle {
    /// 0.0 (hidden) to 1.0 (opaque)
    pub opacity: f64,
    pub scale: f64,
}

impl TabLabelStyle {
    pub fn for_ratio(ratio: f64) -> Self {
        let ratio = clamp_ratio(ratio);
        let opacity = clamp_ratio((ratio - LABEL_FADE_START) / (1.0 - LABEL_FADE_START));
        Self {
            opacity,
            scale: lerp(LABEL_MIN_SCALE, 1.0, ratio),
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Geometry and label style of the tab bar for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabBarLayout {
    pub ratio: f64,
    pub height: f64,
    pub label: TabLabelStyle,
}

impl TabBarLayout {
    pub fn new(ratio: f64, theme: &DrawerConfig) -> Self {
        let ratio = clamp_ratio(ratio);
        Self {
            ratio,
            height: lerp(theme.min_height, theme.max_height, ratio),
            label: TabLabelStyle::for_ratio(ratio),
        }
    }

    /// Whether the drawer is fully collapsed
    pub fn is_collapsed(&self) -> bool {
        self.ratio == 0.0
    }
}
