//! Accordion surfaces
//!
//! A surface measures its content once, then renders at a height derived from
//! its engine's open ratio. The footer surface scales its measured height and
//! adds the safe-area inset when nothing else accounts for it; the drawer
//! surface interpolates between the theme's minimum and maximum heights.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::accordion::timing::{clamp_ratio, lerp};
use crate::accordion::AccordionHandle;
use crate::config::DrawerConfig;
use crate::portal::{FooterPortal, FooterWrapperInfo};

/// Safe-area insets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Padding that keeps content clear of the insets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InsetStyle {
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub padding_left: f64,
}

impl From<Insets> for InsetStyle {
    fn from(insets: Insets) -> Self {
        Self {
            padding_top: insets.top,
            padding_right: insets.right,
            padding_bottom: insets.bottom,
            padding_left: insets.left,
        }
    }
}

/// Negative margins cancelling an [`InsetStyle`] for edge-to-edge content
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UndoInsetStyle {
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl From<Insets> for UndoInsetStyle {
    fn from(insets: Insets) -> Self {
        Self {
            margin_top: -insets.top,
            margin_right: -insets.right,
            margin_bottom: -insets.bottom,
            margin_left: -insets.left,
        }
    }
}

/// Host environment a surface lays out in
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceEnv {
    pub safe_area: Insets,
    /// Height of the on-screen keyboard, 0 when closed
    pub keyboard_height: f64,
    /// Whether a tab bar sits below the surface
    pub has_tabs: bool,
}

impl SurfaceEnv {
    pub fn is_keyboard_open(&self) -> bool {
        self.keyboard_height > 0.0
    }

    /// Layout facts for scenes and their footer
    ///
    /// Scene content pads its bottom by `footer_height` on top of the safe
    /// area so nothing hides behind the footer.
    pub fn wrapper_info(&self, footer_height: f64) -> FooterWrapperInfo {
        let footer_height = footer_height.max(0.0);
        let mut inset_style = InsetStyle::from(self.safe_area);
        inset_style.padding_bottom += footer_height;
        FooterWrapperInfo {
            insets: self.safe_area,
            inset_style,
            undo_inset_style: self.safe_area.into(),
            has_tabs: self.has_tabs,
            is_keyboard_open: self.is_keyboard_open(),
            footer_height,
        }
    }

    /// Bottom inset a surface must add itself
    ///
    /// A sibling tab bar already covers the inset, and an open keyboard
    /// replaces it.
    pub fn bottom_inset(&self) -> f64 {
        if self.has_tabs || self.is_keyboard_open() {
            0.0
        } else {
            self.safe_area.bottom
        }
    }
}

/// Natural content height of a surface, `None` until the first layout
#[derive(Debug, Clone)]
pub struct MeasuredHeight {
    cell: Arc<watch::Sender<Option<f64>>>,
}

impl Default for MeasuredHeight {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasuredHeight {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(watch::Sender::new(None)),
        }
    }

    pub fn get(&self) -> Option<f64> {
        *self.cell.borrow()
    }

    /// Record the first layout's height; later layouts are ignored
    ///
    /// Returns whether this call took the measurement.
    pub fn measure(&self, height: f64) -> bool {
        let height = height.max(0.0);
        self.cell.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            debug!(height, "surface measured");
            *current = Some(height);
            true
        })
    }

    /// Forget the measurement; the next layout measures again
    pub fn reset(&self) {
        self.cell.send_if_modified(|current| current.take().is_some());
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.cell.subscribe()
    }
}

/// Footer height for a measurement, ratio and environment
///
/// Unmeasured content resolves to 0 so it stays mounted but invisible.
pub fn footer_height(measured: Option<f64>, ratio: f64, env: &SurfaceEnv) -> f64 {
    match measured {
        Some(height) => height * clamp_ratio(ratio) + env.bottom_inset(),
        None => 0.0,
    }
}

/// Footer panel bound to the footer engine and the stack's portal
pub struct FooterSurface<C> {
    ratio: watch::Receiver<f64>,
    measured: MeasuredHeight,
    portal: FooterPortal<C>,
}

impl<C> FooterSurface<C> {
    pub fn new(footer: &AccordionHandle, portal: FooterPortal<C>) -> Self {
        Self {
            ratio: footer.subscribe_ratio(),
            measured: MeasuredHeight::new(),
            portal,
        }
    }

    pub fn open_ratio(&self) -> f64 {
        *self.ratio.borrow()
    }

    pub fn measured(&self) -> &MeasuredHeight {
        &self.measured
    }

    /// Report a layout pass with the content's natural height
    pub fn on_layout(&self, content_height: f64) {
        self.measured.measure(content_height);
    }

    pub fn height(&self, env: &SurfaceEnv) -> f64 {
        footer_height(self.measured.get(), self.open_ratio(), env)
    }

    /// Wrapper info carrying the footer's current height
    ///
    /// The height counts only while some scene owns the footer.
    pub fn wrapper_info(&self, env: &SurfaceEnv) -> FooterWrapperInfo {
        let height = if self.portal.has_content() {
            self.height(env)
        } else {
            0.0
        };
        env.wrapper_info(height)
    }

    /// Content of the focused scene's footer, if any
    pub fn render(&self, env: &SurfaceEnv) -> Option<C> {
        self.portal.render(&self.wrapper_info(env))
    }
}

impl<C> Drop for FooterSurface<C> {
    fn drop(&mut self) {
        self.measured.reset();
    }
}

/// Tab-bar drawer panel
///
/// Its measurement doubles as the drawer engine's scroll scale.
#[derive(Debug)]
pub struct DrawerSurface {
    ratio: watch::Receiver<f64>,
    measured: MeasuredHeight,
    min_height: f64,
    max_height: f64,
}

impl DrawerSurface {
    pub fn new(drawer: &AccordionHandle, measured: MeasuredHeight, theme: &DrawerConfig) -> Self {
        Self {
            ratio: drawer.subscribe_ratio(),
            measured,
            min_height: theme.min_height,
            max_height: theme.max_height,
        }
    }

    pub fn open_ratio(&self) -> f64 {
        *self.ratio.borrow()
    }

    pub fn on_layout(&self, content_height: f64) {
        self.measured.measure(content_height);
    }

    /// 0 until the first layout, then between the theme's bounds
    pub fn height(&self) -> f64 {
        match self.measured.get() {
            Some(_) => lerp(self.min_height, self.max_height, self.open_ratio()),
            None => 0.0,
        }
    }
}

impl Drop for DrawerSurface {
    fn drop(&mut self) {
        self.measured.reset();
    }
}
