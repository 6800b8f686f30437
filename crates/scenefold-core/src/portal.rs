//! Footer render portal
//!
//! A single slot through which the focused scene supplies footer content.
//! Ownership follows focus: only the focused scene may register, and a scene
//! may only clear the slot while it still owns it, so an outgoing scene never
//! clobbers the incoming scene's content during a transition.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::surface::{InsetStyle, Insets, UndoInsetStyle};

/// Identity of a mounted scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(Uuid);

impl SceneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout facts handed to a footer render function
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FooterWrapperInfo {
    pub insets: Insets,
    pub inset_style: InsetStyle,
    pub undo_inset_style: UndoInsetStyle,
    pub has_tabs: bool,
    pub is_keyboard_open: bool,
    /// Rendered footer height, 0 while no footer is shown
    pub footer_height: f64,
}

/// Footer content producer registered by a scene
pub type FooterRender<C> = Arc<dyn Fn(&FooterWrapperInfo) -> Option<C> + Send + Sync>;

struct Slot<C> {
    owner: SceneId,
    render: FooterRender<C>,
}

/// Snapshot of the portal: focused scene and slot owner
pub struct PortalState<C> {
    focused: Option<SceneId>,
    slot: Option<Slot<C>>,
}

impl<C> PortalState<C> {
    pub fn focused(&self) -> Option<SceneId> {
        self.focused
    }

    pub fn owner(&self) -> Option<SceneId> {
        self.slot.as_ref().map(|s| s.owner)
    }
}

impl<C> fmt::Debug for PortalState<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalState")
            .field("focused", &self.focused)
            .field("owner", &self.owner())
            .finish()
    }
}

pub struct FooterPortal<C> {
    state: Arc<watch::Sender<PortalState<C>>>,
}

impl<C> Clone for FooterPortal<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<C> fmt::Debug for FooterPortal<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FooterPortal").field(&*self.state.borrow()).finish()
    }
}

impl<C> Default for FooterPortal<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FooterPortal<C> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(PortalState {
                focused: None,
                slot: None,
            })),
        }
    }

    /// Mark `scene` as the focused scene
    pub fn focus(&self, scene: SceneId) {
        self.state.send_if_modified(|state| {
            if state.focused == Some(scene) {
                return false;
            }
            debug!(%scene, "scene focused");
            state.focused = Some(scene);
            true
        });
    }

    /// Drop focus, but only if `scene` still holds it
    pub fn blur(&self, scene: SceneId) {
        self.state.send_if_modified(|state| {
            if state.focused != Some(scene) {
                return false;
            }
            debug!(%scene, "scene blurred");
            state.focused = None;
            true
        });
    }

    /// Install `render` for `scene`
    ///
    /// Only the focused scene may take the slot; it replaces whatever stale
    /// content another scene left behind and re-registering its own content is
    /// idempotent. Attempts from any other scene are ignored.
    pub fn register(&self, scene: SceneId, render: FooterRender<C>) {
        self.state.send_if_modified(|state| {
            if state.focused != Some(scene) {
                debug!(%scene, "footer registration from unfocused scene ignored");
                return false;
            }
            state.slot = Some(Slot {
                owner: scene,
                render,
            });
            true
        });
    }

    /// Clear the slot if, and only if, `scene` owns it
    pub fn unregister(&self, scene: SceneId) {
        self.state.send_if_modified(|state| {
            if state.owner() != Some(scene) {
                return false;
            }
            debug!(%scene, "footer unregistered");
            state.slot = None;
            true
        });
    }

    pub fn owner(&self) -> Option<SceneId> {
        self.state.borrow().owner()
    }

    pub fn focused(&self) -> Option<SceneId> {
        self.state.borrow().focused()
    }

    pub fn has_content(&self) -> bool {
        self.state.borrow().slot.is_some()
    }

    /// Render the active footer; an empty slot renders nothing
    pub fn render(&self, info: &FooterWrapperInfo) -> Option<C> {
        // Release the cell before calling out so the render fn may touch the portal
        let render = self.state.borrow().slot.as_ref().map(|s| Arc::clone(&s.render));
        render.and_then(|render| render(info))
    }

    /// Observe focus and ownership changes
    pub fn subscribe(&self) -> watch::Receiver<PortalState<C>> {
        self.state.subscribe()
    }
}

/// A scene's connection to the portal for the scene's mounted lifetime
///
/// Dropping it counts as unmounting: the scene blurs and clears the slot if it
/// still owns it.
pub struct SceneFooter<C> {
    scene: SceneId,
    portal: FooterPortal<C>,
}

impl<C> SceneFooter<C> {
    pub fn new(portal: &FooterPortal<C>) -> Self {
        Self {
            scene: SceneId::new(),
            portal: portal.clone(),
        }
    }

    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn is_focused(&self) -> bool {
        self.portal.focused() == Some(self.scene)
    }

    /// Scene gained focus: take focus and publish its footer
    pub fn on_focus(&self, render: FooterRender<C>) {
        self.portal.focus(self.scene);
        self.portal.register(self.scene, render);
    }

    /// Footer inputs changed; ignored unless the scene is focused
    pub fn update(&self, render: FooterRender<C>) {
        self.portal.register(self.scene, render);
    }

    /// Scene lost focus
    pub fn on_blur(&self) {
        self.portal.blur(self.scene);
        self.portal.unregister(self.scene);
    }
}

impl<C> Drop for SceneFooter<C> {
    fn drop(&mut self) {
        self.on_blur();
    }
}
