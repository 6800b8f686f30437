use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::time::{interval, Instant, MissedTickBehavior};

use scenefold_core::stack::StackFrame;
use scenefold_core::{mount_stack, AccordionConfig, LogicRuntime, Offset, SnapStrategy};

const FRAME: Duration = Duration::from_millis(16);
/// Frames spent coasting when the script includes momentum
const COAST_FRAMES: u32 = 10;
/// Extra settle time after the last expected snap
const SETTLE_MARGIN: Duration = Duration::from_millis(100);

/// A scripted gesture
#[derive(Debug, Clone, Copy)]
pub struct Script {
    pub distance: f64,
    pub steps: u32,
    pub momentum: Option<f64>,
    pub drawer_height: f64,
}

#[derive(Debug, Serialize)]
struct TraceRow {
    t_ms: u64,
    phase: &'static str,
    offset: f64,
    drawer: f64,
    footer: f64,
}

pub async fn run(config: &AccordionConfig, script: Script, json: bool) -> Result<()> {
    let logic = match config.snap.strategy {
        SnapStrategy::Delayed => Some(LogicRuntime::spawn()),
        SnapStrategy::Momentum => None,
    };
    let (context, mut renderer) =
        mount_stack::<String>(config, logic.as_ref().map(|(handle, _)| handle.clone()));

    let drawer = context.drawer_surface();
    drawer.on_layout(script.drawer_height);
    let view = context.attach();

    let start = Instant::now();
    let mut ticker = interval(FRAME);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut offset = 0.0;

    if !json {
        println!("{:>6}  {:<9} {:>8} {:>7} {:>7}", "t_ms", "phase", "offset", "drawer", "footer");
    }
    let emit = |phase: &'static str, offset: f64, frame: StackFrame| -> Result<()> {
        let row = TraceRow {
            t_ms: start.elapsed().as_millis() as u64,
            phase,
            offset,
            drawer: frame.drawer,
            footer: frame.footer,
        };
        if json {
            println!("{}", serde_json::to_string(&row)?);
        } else {
            println!(
                "{:>6}  {:<9} {:>8.1} {:>7.3} {:>7.3}",
                row.t_ms, row.phase, row.offset, row.drawer, row.footer
            );
        }
        Ok(())
    };

    view.on_begin_drag(Offset::vertical(offset));
    let steps = script.steps.max(1);
    for _ in 0..steps {
        ticker.tick().await;
        offset += script.distance / steps as f64;
        view.on_scroll(Offset::vertical(offset));
        emit("drag", offset, renderer.frame())?;
    }

    view.on_end_drag(Offset::vertical(offset));
    if let Some(coast) = script.momentum {
        view.on_momentum_begin(Offset::vertical(offset));
        emit("flick", offset, renderer.frame())?;
        for _ in 0..COAST_FRAMES {
            ticker.tick().await;
            offset += coast / COAST_FRAMES as f64;
            view.on_scroll(Offset::vertical(offset));
            emit("momentum", offset, renderer.frame())?;
        }
        view.on_momentum_end(Offset::vertical(offset));
    }
    let released = Instant::now();
    emit("release", offset, renderer.frame())?;

    let mut settle = Duration::from_millis(config.snap.animation_duration_ms) + SETTLE_MARGIN;
    if config.snap.strategy == SnapStrategy::Delayed {
        settle += Duration::from_millis(config.snap.delayed_snap_ms);
    }
    while released.elapsed() < settle || renderer.needs_frame() {
        ticker.tick().await;
        emit("settle", offset, renderer.frame())?;
    }

    if let Some((handle, task)) = logic {
        handle.shutdown();
        task.await?;
    }
    Ok(())
}
