use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info};

use crate::accordion::AccordionCommand;
use crate::{Error, Result};

/// Work handed from the render side to the logic thread
#[derive(Debug)]
pub enum LogicRequest {
    /// Answer with `AccordionCommand::DelayedSnap` on `reply` after `delay`
    ScheduleSnap {
        reply: mpsc::UnboundedSender<AccordionCommand>,
        drag_end_seq: u64,
        delay: Duration,
    },
}

/// Cloneable sender side of the logic runtime
#[derive(Debug, Clone)]
pub struct LogicHandle {
    requests: mpsc::UnboundedSender<LogicRequest>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl LogicHandle {
    /// Ask the logic thread to settle a released drag after `delay`
    pub fn schedule_snap(
        &self,
        reply: mpsc::UnboundedSender<AccordionCommand>,
        drag_end_seq: u64,
        delay: Duration,
    ) -> Result<()> {
        self.requests
            .send(LogicRequest::ScheduleSnap {
                reply,
                drag_end_seq,
                delay,
            })
            .map_err(|_| Error::ChannelClosed("logic runtime"))
    }

    /// Signal the runtime to stop; pending timers are dropped
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_running(&self) -> bool {
        !self.requests.is_closed()
    }
}

/// Background task servicing deferred work for every accordion of an app
pub struct LogicRuntime {
    requests: mpsc::UnboundedReceiver<LogicRequest>,
    shutdown: watch::Receiver<bool>,
}

impl LogicRuntime {
    /// Create the runtime and its handle without starting it
    pub fn new() -> (Self, LogicHandle) {
        let (request_tx, requests) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown) = watch::channel(false);
        let runtime = Self { requests, shutdown };
        let handle = LogicHandle {
            requests: request_tx,
            shutdown: Arc::new(shutdown_tx),
        };
        (runtime, handle)
    }

    /// Spawn the runtime on the current tokio runtime
    pub fn spawn() -> (LogicHandle, JoinHandle<()>) {
        let (runtime, handle) = Self::new();
        let task = tokio::spawn(runtime.run());
        (handle, task)
    }

    /// Service requests until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!("Logic runtime started");
        let mut timers = JoinSet::new();

        loop {
            tokio::select! {
                result = self.shutdown.changed() => {
                    if result.is_err() || *self.shutdown.borrow() {
                        info!("Logic runtime received shutdown signal");
                        break;
                    }
                }

                request = self.requests.recv() => {
                    let Some(request) = request else {
                        debug!("All logic handles dropped");
                        break;
                    };
                    match request {
                        LogicRequest::ScheduleSnap { reply, drag_end_seq, delay } => {
                            debug!(drag_end_seq, delay_ms = delay.as_millis(), "Scheduling delayed snap");
                            timers.spawn(async move {
                                tokio::time::sleep(delay).await;
                                // Receiver gone means the accordion was unmounted
                                let _ = reply.send(AccordionCommand::DelayedSnap { drag_end_seq });
                            });
                        }
                    }
                }

                Some(_) = timers.join_next(), if !timers.is_empty() => {}
            }
        }

        timers.abort_all();
        info!("Logic runtime stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accordion::{AccordionEngine, AccordionKind, RatioScale};
    use crate::config::{EasingType, SnapConfig, SnapStrategy};
    use crate::telemetry::{Offset, ScrollTelemetryHub};
    use tokio::time::{sleep, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_schedule_snap_replies_after_delay() {
        let (handle, _task) = LogicRuntime::spawn();
        let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();

        handle
            .schedule_snap(reply_tx, 7, Duration::from_millis(300))
            .unwrap();

        sleep(Duration::from_millis(299)).await;
        assert!(reply_rx.try_recv().is_err());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(
            reply_rx.try_recv().unwrap(),
            AccordionCommand::DelayedSnap { drag_end_seq: 7 }
        );
    }

    #[tokio::test]
    async fn test_shutdown_stops_runtime() {
        let (handle, task) = LogicRuntime::spawn();
        handle.shutdown();
        let result = timeout(Duration::from_secs(1), task).await;
        assert!(result.is_ok());
        assert!(!handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_strategy_settles_after_logic_hand_off() {
        let (logic, _task) = LogicRuntime::spawn();
        let hub = ScrollTelemetryHub::new();
        let scroll = hub.attach();
        let config = SnapConfig {
            strategy: SnapStrategy::Delayed,
            easing: EasingType::Linear,
            ..Default::default()
        };
        let (mut engine, _handle) = AccordionEngine::new(
            AccordionKind::Footer,
            hub.subscribe(),
            RatioScale::Distance(100.0),
            &config,
            Some(logic),
        );

        scroll.on_begin_drag(Offset::vertical(0.0));
        engine.frame();
        scroll.on_scroll(Offset::vertical(40.0));
        engine.frame();
        // Crossing the close threshold already started a snap toward 0
        assert_eq!(engine.snap_target(), Some(0.0));

        scroll.on_scroll(Offset::vertical(45.0));
        engine.frame();
        scroll.on_end_drag(Offset::vertical(45.0));
        engine.frame();
        assert!(!engine.is_tracking());

        sleep(Duration::from_millis(650)).await;
        assert_eq!(engine.frame(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_snap_waits_for_logic_thread() {
        let (logic, _task) = LogicRuntime::spawn();
        let hub = ScrollTelemetryHub::new();
        let scroll = hub.attach();
        let config = SnapConfig {
            strategy: SnapStrategy::Delayed,
            easing: EasingType::Linear,
            ..Default::default()
        };
        let (mut engine, _handle) = AccordionEngine::new(
            AccordionKind::Footer,
            hub.subscribe(),
            RatioScale::Distance(100.0),
            &config,
            Some(logic),
        );

        scroll.on_begin_drag(Offset::vertical(0.0));
        engine.frame();
        scroll.on_scroll(Offset::vertical(20.0));
        engine.frame();
        scroll.on_end_drag(Offset::vertical(20.0));
        assert!((engine.frame() - 0.8).abs() < 1e-9);

        // Momentum is ignored on this path and the ratio holds until the timer
        scroll.on_momentum_end(Offset::vertical(20.0));
        sleep(Duration::from_millis(299)).await;
        assert!((engine.frame() - 0.8).abs() < 1e-9);
        assert!(engine.snap_target().is_none());

        sleep(Duration::from_millis(2)).await;
        engine.frame();
        assert_eq!(engine.snap_target(), Some(1.0));

        sleep(Duration::from_millis(300)).await;
        assert_eq!(engine.frame(), 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_snap_skipped_when_new_drag_started() {
        let (logic, _task) = LogicRuntime::spawn();
        let hub = ScrollTelemetryHub::new();
        let scroll = hub.attach();
        let config = SnapConfig {
            strategy: SnapStrategy::Delayed,
            ..Default::default()
        };
        let (mut engine, _handle) = AccordionEngine::new(
            AccordionKind::Footer,
            hub.subscribe(),
            RatioScale::Distance(100.0),
            &config,
            Some(logic),
        );

        scroll.on_begin_drag(Offset::vertical(0.0));
        engine.frame();
        scroll.on_scroll(Offset::vertical(20.0));
        engine.frame();
        scroll.on_end_drag(Offset::vertical(20.0));
        engine.frame();

        sleep(Duration::from_millis(100)).await;
        scroll.on_begin_drag(Offset::vertical(20.0));
        engine.frame();

        sleep(Duration::from_millis(300)).await;
        engine.frame();
        assert!(engine.is_tracking());
        assert!(engine.snap_target().is_none());
        assert!((engine.open_ratio() - 0.8).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_delayed_snap_does_not_cut_short_a_later_release() {
        let (logic, _task) = LogicRuntime::spawn();
        let hub = ScrollTelemetryHub::new();
        let scroll = hub.attach();
        let config = SnapConfig {
            strategy: SnapStrategy::Delayed,
            easing: EasingType::Linear,
            ..Default::default()
        };
        let (mut engine, _handle) = AccordionEngine::new(
            AccordionKind::Footer,
            hub.subscribe(),
            RatioScale::Distance(100.0),
            &config,
            Some(logic),
        );

        scroll.on_begin_drag(Offset::vertical(0.0));
        engine.frame();
        scroll.on_scroll(Offset::vertical(20.0));
        engine.frame();
        scroll.on_end_drag(Offset::vertical(20.0));
        engine.frame();

        // A second short drag ends before the first timer fires
        sleep(Duration::from_millis(200)).await;
        scroll.on_begin_drag(Offset::vertical(20.0));
        engine.frame();
        scroll.on_end_drag(Offset::vertical(20.0));
        engine.frame();

        // The first release's reply arrives at 300ms and must not settle
        sleep(Duration::from_millis(110)).await;
        assert!((engine.frame() - 0.8).abs() < 1e-9);
        assert!(engine.snap_target().is_none());

        // The second release's own delay ends at 500ms
        sleep(Duration::from_millis(191)).await;
        engine.frame();
        assert_eq!(engine.snap_target(), Some(1.0));

        sleep(Duration::from_millis(300)).await;
        assert_eq!(engine.frame(), 1.0);
    }
}
