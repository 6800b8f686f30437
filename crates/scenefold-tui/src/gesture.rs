//! Keyboard-driven scroll gestures
//!
//! A terminal has no touch input, so key presses stand in for fingers: a burst
//! of `j`/`k` presses is one drag, ending once the keys go quiet, and a flick
//! releases the drag with velocity and coasts with friction. Every step is
//! reported through the stack's scroll attachment.

use std::time::Duration;

use scenefold_core::{Offset, ScrollAttachment};
use tokio::time::Instant;
use tracing::trace;

/// Scroll units per terminal row
pub const ROW_UNITS: f64 = 10.0;

/// Quiet time after the last key press that ends a drag
const DRAG_IDLE: Duration = Duration::from_millis(150);
/// Exponential velocity decay per second while coasting
const FRICTION: f64 = 4.0;
/// Coasting stops below this speed (units per second)
const MIN_VELOCITY: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Dragging { last_input: Instant },
    Coasting { velocity: f64, last_step: Instant },
}

/// Scroll position of one list plus the gesture currently moving it
#[derive(Debug)]
pub struct ScrollDriver {
    attachment: ScrollAttachment,
    offset: f64,
    max_offset: f64,
    phase: Phase,
}

impl ScrollDriver {
    pub fn new(attachment: ScrollAttachment) -> Self {
        Self {
            attachment,
            offset: 0.0,
            max_offset: 0.0,
            phase: Phase::Idle,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// First visible row
    pub fn top_row(&self) -> usize {
        (self.offset / ROW_UNITS).floor().max(0.0) as usize
    }

    /// Content rows minus viewport rows
    pub fn set_scroll_range(&mut self, rows: usize) {
        self.max_offset = rows as f64 * ROW_UNITS;
        self.offset = self.offset.min(self.max_offset);
    }

    /// Whether a gesture is still producing callbacks
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    fn position(&self) -> Offset {
        Offset::vertical(self.offset)
    }

    /// Move by `rows` as part of a (possibly new) drag
    pub fn drag_by(&mut self, rows: f64, now: Instant) {
        match self.phase {
            Phase::Dragging { .. } => {}
            Phase::Coasting { .. } => {
                // Touching a coasting list stops it and starts a new drag
                self.attachment.on_momentum_end(self.position());
                self.attachment.on_begin_drag(self.position());
            }
            Phase::Idle => self.attachment.on_begin_drag(self.position()),
        }
        self.offset = (self.offset + rows * ROW_UNITS).clamp(0.0, self.max_offset);
        self.attachment.on_scroll(self.position());
        self.phase = Phase::Dragging { last_input: now };
    }

    /// Drag by `rows`, then let go with `velocity` rows per second
    pub fn flick(&mut self, rows: f64, velocity: f64, now: Instant) {
        self.drag_by(rows, now);
        self.attachment.on_end_drag(self.position());
        self.attachment.on_momentum_begin(self.position());
        trace!(velocity, offset = self.offset, "flick");
        self.phase = Phase::Coasting {
            velocity: velocity * ROW_UNITS,
            last_step: now,
        };
    }

    /// End whatever gesture is in progress right away
    pub fn release(&mut self) {
        match self.phase {
            Phase::Idle => {}
            Phase::Dragging { .. } => self.attachment.on_end_drag(self.position()),
            Phase::Coasting { .. } => self.attachment.on_momentum_end(self.position()),
        }
        self.phase = Phase::Idle;
    }

    /// Advance the gesture to `now`
    pub fn tick(&mut self, now: Instant) {
        match self.phase {
            Phase::Idle => {}
            Phase::Dragging { last_input } => {
                if now.saturating_duration_since(last_input) >= DRAG_IDLE {
                    self.release();
                }
            }
            Phase::Coasting { velocity, last_step } => {
                let dt = now.saturating_duration_since(last_step).as_secs_f64();
                if dt <= 0.0 {
                    return;
                }
                let next = (self.offset + velocity * dt).clamp(0.0, self.max_offset);
                let velocity = velocity * (-FRICTION * dt).exp();
                let hit_edge = next == 0.0 || next == self.max_offset;
                if next != self.offset {
                    self.offset = next;
                    self.attachment.on_scroll(self.position());
                }
                if hit_edge || velocity.abs() < MIN_VELOCITY {
                    self.release();
                } else {
                    self.phase = Phase::Coasting {
                        velocity,
                        last_step: now,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenefold_core::telemetry::GestureKind;
    use scenefold_core::ScrollTelemetryHub;

    fn driver() -> (std::sync::Arc<ScrollTelemetryHub>, ScrollDriver) {
        let hub = ScrollTelemetryHub::new();
        let mut driver = ScrollDriver::new(hub.attach());
        driver.set_scroll_range(100);
        (hub, driver)
    }

    #[test]
    fn test_key_burst_is_one_drag() {
        let (hub, mut driver) = driver();
        let start = Instant::now();
        driver.drag_by(1.0, start);
        let begin = hub.event(GestureKind::DragBegin).unwrap();
        driver.drag_by(1.0, start + Duration::from_millis(50));
        driver.drag_by(1.0, start + Duration::from_millis(100));

        assert_eq!(hub.event(GestureKind::DragBegin), Some(begin));
        assert_eq!(hub.offset(), Offset::vertical(30.0));
        assert_eq!(hub.delta(), Offset::vertical(30.0));
        assert!(hub.event(GestureKind::DragEnd).is_none());
    }

    #[test]
    fn test_quiet_keys_end_drag() {
        let (hub, mut driver) = driver();
        let start = Instant::now();
        driver.drag_by(2.0, start);
        driver.tick(start + Duration::from_millis(100));
        assert!(driver.is_dragging());

        driver.tick(start + DRAG_IDLE);
        assert!(!driver.is_active());
        let end = hub.event(GestureKind::DragEnd).unwrap();
        assert_eq!(end.offset, Offset::vertical(20.0));
    }

    #[test]
    fn test_flick_coasts_then_ends_momentum() {
        let (hub, mut driver) = driver();
        let start = Instant::now();
        driver.flick(1.0, 20.0, start);
        let end = hub.event(GestureKind::DragEnd).unwrap();
        let momentum = hub.event(GestureKind::MomentumBegin).unwrap();
        assert!(end.seq < momentum.seq);

        let mut now = start;
        for _ in 0..200 {
            now += Duration::from_millis(16);
            driver.tick(now);
        }
        assert!(!driver.is_active());
        assert!(hub.event(GestureKind::MomentumEnd).is_some());
        assert!(driver.offset() > 10.0);
    }

    #[test]
    fn test_offset_stays_in_range() {
        let (hub, mut driver) = driver();
        let start = Instant::now();
        driver.drag_by(-5.0, start);
        assert_eq!(driver.offset(), 0.0);
        driver.drag_by(500.0, start);
        assert_eq!(driver.offset(), 1000.0);
        assert_eq!(hub.offset(), Offset::vertical(1000.0));
        assert_eq!(driver.top_row(), 100);
    }
}
