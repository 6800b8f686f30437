//! Screen-stack context
//!
//! Each screen stack owns one telemetry hub, one footer portal and the two
//! accordion engines driven by them. Nested stacks mount their own context
//! instead of sharing process-wide state.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::info;

use crate::accordion::{AccordionEngine, AccordionHandle};
use crate::config::{AccordionConfig, DrawerConfig};
use crate::logic::LogicHandle;
use crate::portal::{FooterPortal, SceneFooter};
use crate::surface::{DrawerSurface, FooterSurface, MeasuredHeight};
use crate::telemetry::{ScrollAttachment, ScrollTelemetryHub};

/// Logic-side half of a mounted stack, handed down to scenes
pub struct StackContext<C> {
    hub: Arc<ScrollTelemetryHub>,
    portal: FooterPortal<C>,
    drawer: AccordionHandle,
    footer: AccordionHandle,
    drawer_height: MeasuredHeight,
    theme: DrawerConfig,
}

impl<C> Clone for StackContext<C> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
            portal: self.portal.clone(),
            drawer: self.drawer.clone(),
            footer: self.footer.clone(),
            drawer_height: self.drawer_height.clone(),
            theme: self.theme.clone(),
        }
    }
}

impl<C> StackContext<C> {
    pub fn telemetry(&self) -> &Arc<ScrollTelemetryHub> {
        &self.hub
    }

    /// Scroll attachment for a scrollable view in this stack
    pub fn attach(&self) -> ScrollAttachment {
        self.hub.attach()
    }

    pub fn portal(&self) -> &FooterPortal<C> {
        &self.portal
    }

    pub fn drawer(&self) -> &AccordionHandle {
        &self.drawer
    }

    pub fn footer(&self) -> &AccordionHandle {
        &self.footer
    }

    /// Connect a newly mounted scene to the footer portal
    pub fn mount_scene(&self) -> SceneFooter<C> {
        SceneFooter::new(&self.portal)
    }

    pub fn footer_surface(&self) -> FooterSurface<C> {
        FooterSurface::new(&self.footer, self.portal.clone())
    }

    pub fn drawer_surface(&self) -> DrawerSurface {
        DrawerSurface::new(&self.drawer, self.drawer_height.clone(), &self.theme)
    }
}

/// Ratios published by one render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackFrame {
    pub drawer: f64,
    pub footer: f64,
}

/// Render-side half of a mounted stack
pub struct StackRenderer {
    drawer: AccordionEngine,
    footer: AccordionEngine,
}

impl StackRenderer {
    pub fn frame(&mut self) -> StackFrame {
        self.frame_at(Instant::now())
    }

    /// Run one reaction pass on both engines
    pub fn frame_at(&mut self, now: Instant) -> StackFrame {
        StackFrame {
            drawer: self.drawer.frame_at(now),
            footer: self.footer.frame_at(now),
        }
    }

    /// Whether either accordion is animating
    pub fn needs_frame(&self) -> bool {
        self.drawer.needs_frame() || self.footer.needs_frame()
    }

    pub fn drawer(&self) -> &AccordionEngine {
        &self.drawer
    }

    pub fn footer(&self) -> &AccordionEngine {
        &self.footer
    }
}

/// Create the context and renderer of a new screen stack
///
/// `logic` is needed for the delayed snap strategy.
pub fn mount_stack<C>(
    config: &AccordionConfig,
    logic: Option<LogicHandle>,
) -> (StackContext<C>, StackRenderer) {
    let hub = ScrollTelemetryHub::new();
    let drawer_height = MeasuredHeight::new();

    let (drawer_engine, drawer) =
        AccordionEngine::drawer(&hub, drawer_height.clone(), config, logic.clone());
    let (footer_engine, footer) = AccordionEngine::footer(&hub, config, logic);

    info!(strategy = ?config.snap.strategy, "screen stack mounted");

    let context = StackContext {
        hub,
        portal: FooterPortal::new(),
        drawer,
        footer,
        drawer_height,
        theme: config.drawer.clone(),
    };
    let renderer = StackRenderer {
        drawer: drawer_engine,
        footer: footer_engine,
    };
    (context, renderer)
}
