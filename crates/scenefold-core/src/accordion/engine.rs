//! Open-ratio engine
//!
//! One engine per accordion. The engine lives on the render side and runs one
//! synchronous reaction pass per frame: drain logic-thread commands, read the
//! telemetry that changed since the previous pass, derive the ratio, advance
//! any snap, publish. The matching [`AccordionHandle`] is the logic-side view.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::animation::SnapAnimator;
use super::timing::{clamp_ratio, nearest_endpoint};
use crate::config::{AccordionConfig, SnapConfig, SnapStrategy};
use crate::logic::LogicHandle;
use crate::surface::MeasuredHeight;
use crate::telemetry::{GestureEvent, GestureKind, ScrollTelemetryHub, TelemetryReader};

/// Which piece of chrome an engine drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccordionKind {
    /// Bottom tab bar
    Drawer,
    /// Per-scene footer
    Footer,
}

impl AccordionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccordionKind::Drawer => "drawer",
            AccordionKind::Footer => "footer",
        }
    }
}

/// Messages from the logic thread to an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccordionCommand {
    /// Pin the ratio to 1 (true) or release the pin (false)
    SetKeepOpen(bool),
    /// Clear any pin and snap to 1
    ResetRatio,
    /// Delayed settle for the drag released at `drag_end_seq`
    DelayedSnap { drag_end_seq: u64 },
}

/// Scroll distance that moves the ratio across the whole [0, 1] range
#[derive(Debug, Clone)]
pub enum RatioScale {
    /// Fixed distance in scroll units
    Distance(f64),
    /// Measured content height of a surface, `fallback` until it is measured
    Measured { height: MeasuredHeight, fallback: f64 },
}

impl RatioScale {
    fn distance(&self) -> f64 {
        let distance = match self {
            RatioScale::Distance(d) => *d,
            RatioScale::Measured { height, fallback } => {
                height.get().filter(|h| *h > 0.0).unwrap_or(*fallback)
            }
        };
        distance.max(f64::EPSILON)
    }
}

/// Drag anchor captured at drag-begin or re-anchor
#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    offset: f64,
    ratio: f64,
}

pub struct AccordionEngine {
    kind: AccordionKind,
    telemetry: TelemetryReader,
    commands: mpsc::UnboundedReceiver<AccordionCommand>,
    reply_tx: mpsc::UnboundedSender<AccordionCommand>,
    logic: Option<LogicHandle>,
    ratio_tx: watch::Sender<f64>,
    scale: RatioScale,
    strategy: SnapStrategy,
    open_threshold: f64,
    close_threshold: f64,
    delayed_snap: Duration,
    ratio: f64,
    anchor: Option<DragAnchor>,
    keep_open: bool,
    snap: SnapAnimator,
    /// Drag-end sequence of the newest delayed snap request
    latest_delayed: Option<u64>,
}

impl AccordionEngine {
    /// Create an engine and its logic-side handle
    ///
    /// The ratio starts fully open. `logic` is required for the delayed snap
    /// strategy; without it released drags settle immediately.
    pub fn new(
        kind: AccordionKind,
        telemetry: TelemetryReader,
        scale: RatioScale,
        config: &SnapConfig,
        logic: Option<LogicHandle>,
    ) -> (Self, AccordionHandle) {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (ratio_tx, ratio_rx) = watch::channel(1.0);

        let engine = Self {
            kind,
            telemetry,
            commands,
            reply_tx: command_tx.clone(),
            logic,
            ratio_tx,
            scale,
            strategy: config.strategy,
            open_threshold: config.open_threshold,
            close_threshold: config.close_threshold,
            delayed_snap: Duration::from_millis(config.delayed_snap_ms),
            ratio: 1.0,
            anchor: None,
            keep_open: false,
            snap: SnapAnimator::from_config(config),
            latest_delayed: None,
        };
        let handle = AccordionHandle {
            kind,
            commands: command_tx,
            ratio: ratio_rx,
        };
        (engine, handle)
    }

    /// Footer engine: fixed scroll distance from configuration
    pub fn footer(
        hub: &ScrollTelemetryHub,
        config: &AccordionConfig,
        logic: Option<LogicHandle>,
    ) -> (Self, AccordionHandle) {
        Self::new(
            AccordionKind::Footer,
            hub.subscribe(),
            RatioScale::Distance(config.footer.scroll_distance),
            &config.snap,
            logic,
        )
    }

    /// Drawer engine: scroll distance follows the drawer's measured content
    pub fn drawer(
        hub: &ScrollTelemetryHub,
        measured: MeasuredHeight,
        config: &AccordionConfig,
        logic: Option<LogicHandle>,
    ) -> (Self, AccordionHandle) {
        Self::new(
            AccordionKind::Drawer,
            hub.subscribe(),
            RatioScale::Measured {
                height: measured,
                fallback: config.drawer.max_height,
            },
            &config.snap,
            logic,
        )
    }

    pub fn kind(&self) -> AccordionKind {
        self.kind
    }

    #[inline]
    pub fn open_ratio(&self) -> f64 {
        self.ratio
    }

    /// Whether a drag (or its momentum phase) is being tracked
    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn is_kept_open(&self) -> bool {
        self.keep_open
    }

    /// Whether the next frames still change the ratio on their own
    #[inline]
    pub fn needs_frame(&self) -> bool {
        self.snap.is_animating()
    }

    /// Target of the in-flight snap, if any
    pub fn snap_target(&self) -> Option<f64> {
        self.snap.target()
    }

    /// Run one reaction pass using the current clock
    pub fn frame(&mut self) -> f64 {
        self.frame_at(Instant::now())
    }

    /// Run one reaction pass at `now` and return the published ratio
    pub fn frame_at(&mut self, now: Instant) -> f64 {
        while let Ok(command) = self.commands.try_recv() {
            self.apply_command(command, now);
        }

        // Read all telemetry before any ratio write
        let events = self.telemetry.changed_events();
        let latest = self.telemetry.changed_offset();

        for (index, event) in events.iter().enumerate() {
            self.apply_event(event, &events[index + 1..], now);
        }
        if let Some(offset) = latest {
            self.track(offset.y, now);
        }

        if self.keep_open {
            self.snap.cancel();
            self.ratio = 1.0;
        } else if let Some(ratio) = self.snap.update(now) {
            self.ratio = ratio;
        }

        self.publish();
        self.ratio
    }

    fn apply_command(&mut self, command: AccordionCommand, now: Instant) {
        debug!(accordion = self.kind.as_str(), ?command, "accordion command");
        match command {
            AccordionCommand::SetKeepOpen(true) => {
                self.keep_open = true;
                self.snap.cancel();
                self.ratio = 1.0;
            }
            AccordionCommand::SetKeepOpen(false) => {
                if !self.keep_open {
                    return;
                }
                self.keep_open = false;
                // Resume an ongoing drag from here instead of from its old anchor
                if self.anchor.is_some() {
                    self.anchor = Some(DragAnchor {
                        offset: self.telemetry.offset().y,
                        ratio: self.ratio,
                    });
                }
            }
            AccordionCommand::ResetRatio => {
                self.keep_open = false;
                if self.anchor.is_some() {
                    self.anchor = Some(DragAnchor {
                        offset: self.telemetry.offset().y,
                        ratio: 1.0,
                    });
                }
                self.snap_to(1.0, now);
            }
            AccordionCommand::DelayedSnap { drag_end_seq } => {
                if self.latest_delayed.is_some_and(|latest| drag_end_seq < latest) {
                    debug!(
                        accordion = self.kind.as_str(),
                        drag_end_seq, "delayed snap ignored: superseded by a later release"
                    );
                    return;
                }
                if self.anchor.is_some() || self.keep_open {
                    debug!(
                        accordion = self.kind.as_str(),
                        drag_end_seq, "delayed snap ignored: drag in progress or pinned"
                    );
                    return;
                }
                self.settle(now);
            }
        }
    }

    fn apply_event(&mut self, event: &GestureEvent, later: &[GestureEvent], now: Instant) {
        let y = event.offset.y;
        match (event.kind, self.strategy) {
            (GestureKind::DragBegin, _) => {
                self.snap.cancel();
                self.anchor = Some(DragAnchor {
                    offset: y,
                    ratio: self.ratio,
                });
                debug!(accordion = self.kind.as_str(), ratio = self.ratio, "drag began");
            }
            (GestureKind::DragEnd, SnapStrategy::Momentum) => {
                self.track(y, now);
                let momentum_follows = later.iter().any(|e| e.kind == GestureKind::MomentumBegin);
                if momentum_follows {
                    debug!(accordion = self.kind.as_str(), "momentum follows drag end");
                } else {
                    self.release(now);
                }
            }
            (GestureKind::DragEnd, SnapStrategy::Delayed) => {
                self.track(y, now);
                self.anchor = None;
                self.request_delayed_snap(event.seq, now);
            }
            (GestureKind::MomentumBegin, _) => {}
            (GestureKind::MomentumEnd, SnapStrategy::Momentum) => {
                self.track(y, now);
                self.release(now);
            }
            (GestureKind::MomentumEnd, SnapStrategy::Delayed) => {}
        }
    }

    /// Follow the drag at offset `y`
    fn track(&mut self, y: f64, now: Instant) {
        if self.keep_open {
            return;
        }
        let Some(anchor) = self.anchor else {
            return;
        };

        let candidate = clamp_ratio(anchor.ratio - (y - anchor.offset) / self.scale.distance());

        if anchor.ratio <= self.open_threshold && candidate > self.open_threshold {
            debug!(accordion = self.kind.as_str(), candidate, "drag crossed open threshold");
            self.anchor = Some(DragAnchor { offset: y, ratio: 1.0 });
            self.snap_to(1.0, now);
        } else if anchor.ratio >= self.close_threshold && candidate < self.close_threshold {
            debug!(accordion = self.kind.as_str(), candidate, "drag crossed close threshold");
            self.anchor = Some(DragAnchor { offset: y, ratio: 0.0 });
            self.snap_to(0.0, now);
        } else if !self.snap.is_animating() {
            self.ratio = candidate;
        }
    }

    /// Gesture finished: stop tracking and settle
    fn release(&mut self, now: Instant) {
        self.anchor = None;
        self.settle(now);
    }

    fn settle(&mut self, now: Instant) {
        if self.keep_open {
            return;
        }
        let target = self
            .snap
            .target()
            .unwrap_or_else(|| nearest_endpoint(self.ratio));
        self.snap_to(target, now);
    }

    fn snap_to(&mut self, target: f64, now: Instant) {
        if !self.snap.is_animating() && self.ratio == target {
            return;
        }
        debug!(accordion = self.kind.as_str(), from = self.ratio, target, "snap");
        self.snap.snap_to(self.ratio, target, now);
    }

    fn request_delayed_snap(&mut self, drag_end_seq: u64, now: Instant) {
        self.latest_delayed = Some(drag_end_seq);
        let scheduled = match &self.logic {
            Some(logic) => logic
                .schedule_snap(self.reply_tx.clone(), drag_end_seq, self.delayed_snap)
                .is_ok(),
            None => false,
        };
        if !scheduled {
            warn!(
                accordion = self.kind.as_str(),
                "no logic runtime for delayed snap, settling immediately"
            );
            self.settle(now);
        }
    }

    fn publish(&self) {
        let ratio = self.ratio;
        self.ratio_tx.send_if_modified(|current| {
            if *current == ratio {
                false
            } else {
                *current = ratio;
                true
            }
        });
    }
}

/// Logic-side handle to an engine
#[derive(Debug, Clone)]
pub struct AccordionHandle {
    kind: AccordionKind,
    commands: mpsc::UnboundedSender<AccordionCommand>,
    ratio: watch::Receiver<f64>,
}

impl AccordionHandle {
    pub fn kind(&self) -> AccordionKind {
        self.kind
    }

    /// Last ratio published by the engine
    pub fn open_ratio(&self) -> f64 {
        *self.ratio.borrow()
    }

    pub fn subscribe_ratio(&self) -> watch::Receiver<f64> {
        self.ratio.clone()
    }

    /// Clear any pin and snap fully open
    pub fn reset_ratio(&self) {
        self.send(AccordionCommand::ResetRatio);
    }

    /// Pin the accordion fully open until called with `false`
    pub fn set_keep_open(&self, keep_open: bool) {
        self.send(AccordionCommand::SetKeepOpen(keep_open));
    }

    fn send(&self, command: AccordionCommand) {
        if self.commands.send(command).is_err() {
            warn!(accordion = self.kind.as_str(), ?command, "engine dropped, command discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EasingType;
    use crate::telemetry::{Offset, ScrollAttachment};
    use proptest::prelude::*;
    use std::sync::Arc;

    const SETTLE: Duration = Duration::from_millis(300);

    struct Rig {
        _hub: Arc<ScrollTelemetryHub>,
        scroll: ScrollAttachment,
        engine: AccordionEngine,
        handle: AccordionHandle,
        now: Instant,
    }

    impl Rig {
        fn new(strategy: SnapStrategy) -> Self {
            let hub = ScrollTelemetryHub::new();
            let config = SnapConfig {
                strategy,
                easing: EasingType::Linear,
                ..Default::default()
            };
            let (engine, handle) = AccordionEngine::new(
                AccordionKind::Footer,
                hub.subscribe(),
                RatioScale::Distance(100.0),
                &config,
                None,
            );
            Self {
                scroll: hub.attach(),
                _hub: hub,
                engine,
                handle,
                now: Instant::now(),
            }
        }

        fn frame(&mut self) -> f64 {
            self.engine.frame_at(self.now)
        }

        fn advance(&mut self, by: Duration) -> f64 {
            self.now += by;
            self.frame()
        }

        /// Drag from `from` to `to` in `steps` frames, without releasing
        fn drag(&mut self, from: f64, to: f64, steps: u32) {
            self.scroll.on_begin_drag(Offset::vertical(from));
            self.frame();
            for i in 1..=steps {
                let y = from + (to - from) * i as f64 / steps as f64;
                self.scroll.on_scroll(Offset::vertical(y));
                self.advance(Duration::from_millis(16));
            }
        }

        fn release(&mut self, at: f64) {
            self.scroll.on_end_drag(Offset::vertical(at));
            self.frame();
        }
    }

    #[test]
    fn test_starts_open_without_telemetry() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        assert_eq!(rig.frame(), 1.0);
        assert_eq!(rig.advance(SETTLE), 1.0);
        assert_eq!(rig.handle.open_ratio(), 1.0);
    }

    #[test]
    fn test_drag_tracks_continuously() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 20.0, 4);
        assert!((rig.engine.open_ratio() - 0.8).abs() < 1e-9);
        assert!(rig.engine.is_tracking());
        assert!((rig.handle.open_ratio() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_close_threshold_snaps_to_zero() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 40.0, 4);
        assert_eq!(rig.engine.snap_target(), Some(0.0));
        rig.release(40.0);
        assert_eq!(rig.advance(SETTLE), 0.0);
        assert!(!rig.engine.needs_frame());
    }

    #[test]
    fn test_short_close_drag_settles_back_open() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 25.0, 5);
        assert!(rig.engine.snap_target().is_none());
        rig.release(25.0);
        assert_eq!(rig.engine.snap_target(), Some(1.0));
        assert_eq!(rig.advance(SETTLE), 1.0);
    }

    #[test]
    fn test_open_threshold_snaps_to_one() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 100.0, 10);
        rig.release(100.0);
        assert_eq!(rig.advance(SETTLE), 0.0);

        rig.drag(100.0, 60.0, 4);
        assert_eq!(rig.engine.snap_target(), Some(1.0));
        rig.release(60.0);
        assert_eq!(rig.advance(SETTLE), 1.0);
    }

    #[test]
    fn test_short_open_drag_settles_back_closed() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 100.0, 10);
        rig.release(100.0);
        rig.advance(SETTLE);

        rig.drag(100.0, 80.0, 4);
        assert!((rig.engine.open_ratio() - 0.2).abs() < 1e-9);
        rig.release(80.0);
        assert_eq!(rig.advance(SETTLE), 0.0);
    }

    #[test]
    fn test_momentum_defers_snap_until_momentum_end() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 10.0, 2);
        rig.scroll.on_end_drag(Offset::vertical(10.0));
        rig.scroll.on_momentum_begin(Offset::vertical(10.0));
        rig.frame();
        assert!(rig.engine.is_tracking());
        assert!(rig.engine.snap_target().is_none());

        rig.scroll.on_scroll(Offset::vertical(20.0));
        assert!((rig.advance(Duration::from_millis(16)) - 0.8).abs() < 1e-9);

        rig.scroll.on_momentum_end(Offset::vertical(25.0));
        rig.frame();
        assert!(!rig.engine.is_tracking());
        assert_eq!(rig.advance(SETTLE), 1.0);
    }

    #[test]
    fn test_new_drag_abandons_snap() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 20.0, 2);
        rig.release(20.0);
        let mid = rig.advance(Duration::from_millis(150));
        assert!(mid > 0.8 && mid < 1.0);

        rig.scroll.on_begin_drag(Offset::vertical(20.0));
        rig.frame();
        assert!(!rig.engine.needs_frame());
        assert_eq!(rig.advance(SETTLE), mid);
    }

    #[test]
    fn test_keep_open_dominates_and_resumes_without_jump() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.drag(0.0, 20.0, 2);
        rig.handle.set_keep_open(true);
        assert_eq!(rig.frame(), 1.0);

        for y in [40.0, 90.0, 250.0, -30.0] {
            rig.scroll.on_scroll(Offset::vertical(y));
            assert_eq!(rig.advance(Duration::from_millis(16)), 1.0);
        }

        rig.handle.set_keep_open(false);
        assert_eq!(rig.frame(), 1.0);
        rig.scroll.on_scroll(Offset::vertical(-20.0));
        assert!((rig.advance(Duration::from_millis(16)) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut once = Rig::new(SnapStrategy::Momentum);
        let mut twice = Rig::new(SnapStrategy::Momentum);
        for rig in [&mut once, &mut twice] {
            rig.drag(0.0, 100.0, 10);
            rig.release(100.0);
            rig.advance(SETTLE);
        }

        once.handle.reset_ratio();
        twice.handle.reset_ratio();
        twice.handle.reset_ratio();

        for step in 1..=4 {
            let a = once.advance(Duration::from_millis(100));
            let b = twice.advance(Duration::from_millis(100));
            assert_eq!(a, b, "diverged at step {}", step);
        }
        assert_eq!(once.engine.open_ratio(), 1.0);
        assert!(!once.engine.is_kept_open());
    }

    #[test]
    fn test_reset_clears_keep_open() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        rig.handle.set_keep_open(true);
        rig.frame();
        rig.handle.reset_ratio();
        rig.frame();
        assert!(!rig.engine.is_kept_open());
    }

    #[test]
    fn test_delayed_strategy_without_runtime_settles_immediately() {
        let mut rig = Rig::new(SnapStrategy::Delayed);
        rig.drag(0.0, 20.0, 2);
        rig.release(20.0);
        assert!(!rig.engine.is_tracking());
        assert_eq!(rig.advance(SETTLE), 1.0);
    }

    #[test]
    fn test_delayed_snap_ignored_while_dragging() {
        let mut rig = Rig::new(SnapStrategy::Delayed);
        rig.drag(0.0, 20.0, 2);
        rig.engine
            .reply_tx
            .send(AccordionCommand::DelayedSnap { drag_end_seq: 1 })
            .unwrap();
        rig.frame();
        assert!(rig.engine.snap_target().is_none());
        assert!((rig.engine.open_ratio() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_stays_in_range_for_erratic_telemetry() {
        let mut rig = Rig::new(SnapStrategy::Momentum);
        let offsets = [0.0, 500.0, -900.0, 33.0, 1e9, -1e9, 12.5, 7.0];
        for (i, y) in offsets.iter().enumerate() {
            let y = Offset::vertical(*y);
            match i % 4 {
                0 => rig.scroll.on_begin_drag(y),
                1 => rig.scroll.on_scroll(y),
                2 => rig.scroll.on_momentum_end(y),
                _ => rig.scroll.on_end_drag(y),
            }
            let ratio = rig.advance(Duration::from_millis(40));
            assert!((0.0..=1.0).contains(&ratio), "ratio {} out of range", ratio);
        }
        let settled = rig.advance(SETTLE);
        assert!(settled == 0.0 || settled == 1.0);
    }

    #[test]
    fn test_measured_scale_falls_back_until_measured() {
        let measured = MeasuredHeight::new();
        let scale = RatioScale::Measured {
            height: measured.clone(),
            fallback: 40.0,
        };
        assert_eq!(scale.distance(), 40.0);
        measured.measure(80.0);
        assert_eq!(scale.distance(), 80.0);
    }

    #[test]
    fn test_handle_survives_dropped_engine() {
        let rig = Rig::new(SnapStrategy::Momentum);
        let handle = rig.handle.clone();
        drop(rig);
        handle.set_keep_open(true);
        assert_eq!(handle.open_ratio(), 1.0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Callback(u8, f64),
        KeepOpen(bool),
        Reset,
    }

    impl Rig {
        fn apply(&mut self, step: Step) {
            match step {
                Step::Callback(kind, y) => {
                    let y = Offset::vertical(y);
                    match kind {
                        0 => self.scroll.on_scroll(y),
                        1 => self.scroll.on_begin_drag(y),
                        2 => self.scroll.on_end_drag(y),
                        3 => self.scroll.on_momentum_begin(y),
                        _ => self.scroll.on_momentum_end(y),
                    }
                }
                Step::KeepOpen(on) => self.handle.set_keep_open(on),
                Step::Reset => self.handle.reset_ratio(),
            }
        }
    }

    fn callback() -> impl Strategy<Value = Step> {
        (0u8..5, -500.0f64..500.0).prop_map(|(kind, y)| Step::Callback(kind, y))
    }

    fn any_step() -> impl Strategy<Value = Step> {
        prop_oneof![
            8 => callback(),
            1 => any::<bool>().prop_map(Step::KeepOpen),
            1 => Just(Step::Reset),
        ]
    }

    fn snap_strategy() -> impl Strategy<Value = SnapStrategy> {
        prop_oneof![Just(SnapStrategy::Momentum), Just(SnapStrategy::Delayed)]
    }

    proptest! {
        #[test]
        fn prop_ratio_in_unit_range_and_settles_after_release(
            snap in snap_strategy(),
            steps in prop::collection::vec((any_step(), 0u64..100), 1..60),
            rest in -500.0f64..500.0,
        ) {
            let mut rig = Rig::new(snap);
            for (step, dt) in steps {
                rig.apply(step);
                let ratio = rig.advance(Duration::from_millis(dt));
                prop_assert!((0.0..=1.0).contains(&ratio), "ratio {} out of range", ratio);
            }

            rig.handle.set_keep_open(false);
            rig.scroll.on_begin_drag(Offset::vertical(rest));
            rig.frame();
            rig.release(rest);
            let settled = rig.advance(SETTLE);
            prop_assert!(settled == 0.0 || settled == 1.0, "settled at {}", settled);
            prop_assert!(!rig.engine.needs_frame());
            prop_assert_eq!(rig.handle.open_ratio(), settled);
        }

        #[test]
        fn prop_keep_open_holds_ratio_at_one(
            snap in snap_strategy(),
            steps in prop::collection::vec((callback(), 0u64..100), 1..60),
        ) {
            let mut rig = Rig::new(snap);
            rig.handle.set_keep_open(true);
            prop_assert_eq!(rig.frame(), 1.0);
            for (step, dt) in steps {
                rig.apply(step);
                prop_assert_eq!(rig.advance(Duration::from_millis(dt)), 1.0);
                prop_assert_eq!(rig.handle.open_ratio(), 1.0);
            }
        }
    }
}
