//! Scroll telemetry shared by every consumer of one screen stack
//!
//! A scrollable view routes its scroll, drag and momentum callbacks through a
//! [`ScrollAttachment`]. The attachment overwrites single-writer cells on the
//! hub; readers subscribe and observe changes without ever writing back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

/// Scroll offset in content units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vertical-only offset, the common case for lists
    pub fn vertical(y: f64) -> Self {
        Self { x: 0.0, y }
    }

    fn minus(self, other: Offset) -> Offset {
        Offset::new(self.x - other.x, self.y - other.y)
    }
}

/// Gesture lifecycle event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    DragBegin,
    DragEnd,
    MomentumBegin,
    MomentumEnd,
}

impl GestureKind {
    pub const ALL: [GestureKind; 4] = [
        GestureKind::DragBegin,
        GestureKind::DragEnd,
        GestureKind::MomentumBegin,
        GestureKind::MomentumEnd,
    ];

    fn index(self) -> usize {
        match self {
            GestureKind::DragBegin => 0,
            GestureKind::DragEnd => 1,
            GestureKind::MomentumBegin => 2,
            GestureKind::MomentumEnd => 3,
        }
    }
}

/// A lifecycle event with the offset at the time it fired
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    /// Hub-wide sequence number, increasing in firing order
    pub seq: u64,
    pub offset: Offset,
}

/// Native scroll callbacks, already classified
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCallback {
    Scroll(Offset),
    BeginDrag(Offset),
    EndDrag(Offset),
    MomentumBegin(Offset),
    MomentumEnd(Offset),
}

impl ScrollCallback {
    pub fn offset(&self) -> Offset {
        match *self {
            ScrollCallback::Scroll(o)
            | ScrollCallback::BeginDrag(o)
            | ScrollCallback::EndDrag(o)
            | ScrollCallback::MomentumBegin(o)
            | ScrollCallback::MomentumEnd(o) => o,
        }
    }

    fn gesture(&self) -> Option<GestureKind> {
        match self {
            ScrollCallback::Scroll(_) => None,
            ScrollCallback::BeginDrag(_) => Some(GestureKind::DragBegin),
            ScrollCallback::EndDrag(_) => Some(GestureKind::DragEnd),
            ScrollCallback::MomentumBegin(_) => Some(GestureKind::MomentumBegin),
            ScrollCallback::MomentumEnd(_) => Some(GestureKind::MomentumEnd),
        }
    }
}

/// Per-stack telemetry cells
#[derive(Debug)]
pub struct ScrollTelemetryHub {
    offset: watch::Sender<Offset>,
    delta: watch::Sender<Offset>,
    events: [watch::Sender<Option<GestureEvent>>; 4],
    next_seq: AtomicU64,
}

impl ScrollTelemetryHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            offset: watch::Sender::new(Offset::ZERO),
            delta: watch::Sender::new(Offset::ZERO),
            events: std::array::from_fn(|_| watch::Sender::new(None)),
            next_seq: AtomicU64::new(1),
        })
    }

    /// Hand out the callback sink for a scrollable view
    pub fn attach(self: &Arc<Self>) -> ScrollAttachment {
        ScrollAttachment { hub: Arc::clone(self) }
    }

    /// Create a reader that observes changes from this point on
    pub fn subscribe(&self) -> TelemetryReader {
        TelemetryReader {
            offset: self.offset.subscribe(),
            events: std::array::from_fn(|i| self.events[i].subscribe()),
        }
    }

    pub fn offset(&self) -> Offset {
        *self.offset.borrow()
    }

    pub fn delta(&self) -> Offset {
        *self.delta.borrow()
    }

    pub fn event(&self, kind: GestureKind) -> Option<GestureEvent> {
        *self.events[kind.index()].borrow()
    }

    fn record(&self, callback: ScrollCallback) {
        let offset = callback.offset();
        self.offset.send_if_modified(|current| {
            if *current == offset {
                false
            } else {
                *current = offset;
                true
            }
        });

        if let Some(kind) = callback.gesture() {
            let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            trace!(?kind, seq, y = offset.y, "gesture event");
            self.events[kind.index()].send_replace(Some(GestureEvent { kind, seq, offset }));
        }

        let origin = self
            .event(GestureKind::DragBegin)
            .map(|e| e.offset)
            .unwrap_or(Offset::ZERO);
        self.delta.send_replace(offset.minus(origin));
    }
}

/// Callback sink installed on a scrollable view
#[derive(Debug, Clone)]
pub struct ScrollAttachment {
    hub: Arc<ScrollTelemetryHub>,
}

impl ScrollAttachment {
    pub fn handle(&self, callback: ScrollCallback) {
        self.hub.record(callback);
    }

    pub fn on_scroll(&self, offset: Offset) {
        self.handle(ScrollCallback::Scroll(offset));
    }

    pub fn on_begin_drag(&self, offset: Offset) {
        self.handle(ScrollCallback::BeginDrag(offset));
    }

    pub fn on_end_drag(&self, offset: Offset) {
        self.handle(ScrollCallback::EndDrag(offset));
    }

    pub fn on_momentum_begin(&self, offset: Offset) {
        self.handle(ScrollCallback::MomentumBegin(offset));
    }

    pub fn on_momentum_end(&self, offset: Offset) {
        self.handle(ScrollCallback::MomentumEnd(offset));
    }
}

/// Change-tracking view over a hub's cells
#[derive(Debug, Clone)]
pub struct TelemetryReader {
    offset: watch::Receiver<Offset>,
    events: [watch::Receiver<Option<GestureEvent>>; 4],
}

impl TelemetryReader {
    /// Latest offset, whether or not it changed
    pub fn offset(&self) -> Offset {
        *self.offset.borrow()
    }

    /// Latest offset if it changed since the previous call
    pub fn changed_offset(&mut self) -> Option<Offset> {
        if self.offset.has_changed().unwrap_or(false) {
            Some(*self.offset.borrow_and_update())
        } else {
            None
        }
    }

    /// Lifecycle events that fired since the previous call, in firing order
    ///
    /// Only the latest event of each kind is kept by the hub, so at most one
    /// event per kind is returned.
    pub fn changed_events(&mut self) -> Vec<GestureEvent> {
        let mut fired: Vec<GestureEvent> = self
            .events
            .iter_mut()
            .filter(|rx| rx.has_changed().unwrap_or(false))
            .filter_map(|rx| *rx.borrow_and_update())
            .collect();
        fired.sort_by_key(|e| e.seq);
        fired
    }
}
