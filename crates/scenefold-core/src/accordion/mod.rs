//! Accordion open-ratio engine
//!
//! Derives a single open ratio in [0, 1] per accordion from scroll telemetry
//! and settles it to exactly 0 or 1 once a gesture ends.
//!
//! - `easing` - pure easing curves
//! - `timing` - progress, interpolation and ratio clamping helpers
//! - `animation` - snap animator combining the two
//! - `engine` - the render-side reaction pass and its logic-side handle

pub mod animation;
pub mod easing;
pub mod engine;
pub mod timing;

pub use animation::SnapAnimator;
pub use easing::EasingType;
pub use engine::{AccordionCommand, AccordionEngine, AccordionHandle, AccordionKind, RatioScale};
