use std::sync::Arc;

use ratatui::text::{Line, Span};
use scenefold_core::stack::StackFrame;
use scenefold_core::surface::{DrawerSurface, FooterSurface, SurfaceEnv};
use scenefold_core::tab_bar::TabBarLayout;
use scenefold_core::{
    mount_stack, AccordionConfig, FooterRender, FooterWrapperInfo, LogicHandle, SceneFooter,
    StackContext, StackRenderer,
};
use tokio::time::Instant;
use tracing::debug;

use crate::gesture::{ScrollDriver, ROW_UNITS};
use crate::input::Action;
use crate::theme::Theme;

/// Content type published through the footer portal
pub type FooterLine = Line<'static>;

/// Natural height of the footer content in rows
const FOOTER_ROWS: f64 = 2.0;
/// Rows moved per `j`/`k` press
const SCROLL_STEP: f64 = 1.0;
/// Rows moved and rows per second released by a `J`/`K` flick
const FLICK_STEP: f64 = 2.0;
const FLICK_VELOCITY: f64 = 40.0;

/// Input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Search(String),
}

/// One tab: a scrollable list and its footer registration
pub struct Scene {
    pub name: &'static str,
    pub items: Vec<String>,
    pub scroll: ScrollDriver,
    footer: SceneFooter<FooterLine>,
}

impl Scene {
    fn new(name: &'static str, context: &StackContext<FooterLine>) -> Self {
        let items = (1..=80).map(|i| format!("{} item {:02}", name, i)).collect();
        Self {
            name,
            items,
            scroll: ScrollDriver::new(context.attach()),
            footer: context.mount_scene(),
        }
    }

    /// Items matching the search query, all items outside search
    pub fn visible_items(&self, query: Option<&str>) -> Vec<&str> {
        match query.filter(|q| !q.is_empty()) {
            Some(query) => {
                let query = query.to_lowercase();
                self.items
                    .iter()
                    .filter(|item| item.to_lowercase().contains(&query))
                    .map(String::as_str)
                    .collect()
            }
            None => self.items.iter().map(String::as_str).collect(),
        }
    }

    fn footer_render(&self, query: Option<&str>) -> FooterRender<FooterLine> {
        let name = self.name;
        let count = self.visible_items(query).len();
        let query = query.map(str::to_string);
        Arc::new(move |info: &FooterWrapperInfo| {
            let line = match (&query, info.is_keyboard_open) {
                (Some(query), true) => Line::from(vec![
                    Span::raw(" / "),
                    Span::raw(query.clone()),
                    Span::raw(format!("   {} matches", count)),
                ]),
                _ => Line::from(format!(" {}: {} items   / search", name, count)),
            };
            Some(line)
        })
    }
}

/// Demo application state: one screen stack with two tab scenes
pub struct App {
    pub config: Arc<AccordionConfig>,
    pub theme: Theme,
    context: StackContext<FooterLine>,
    renderer: StackRenderer,
    footer_surface: FooterSurface<FooterLine>,
    drawer_surface: DrawerSurface,
    pub scenes: Vec<Scene>,
    pub active: usize,
    pub mode: Mode,
    /// Ratios published by the latest render pass
    pub frame: StackFrame,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AccordionConfig>, logic: Option<LogicHandle>, theme: Theme) -> Self {
        let (context, renderer) = mount_stack::<FooterLine>(&config, logic);
        let footer_surface = context.footer_surface();
        let drawer_surface = context.drawer_surface();
        let scenes = vec![Scene::new("Inbox", &context), Scene::new("Archive", &context)];

        let app = Self {
            config,
            theme,
            context,
            renderer,
            footer_surface,
            drawer_surface,
            scenes,
            active: 0,
            mode: Mode::Normal,
            frame: StackFrame {
                drawer: 1.0,
                footer: 1.0,
            },
            status_message: None,
            should_quit: false,
        };
        let scene = &app.scenes[app.active];
        scene.footer.on_focus(scene.footer_render(None));
        app
    }

    pub fn active_scene(&self) -> &Scene {
        &self.scenes[self.active]
    }

    pub fn search_query(&self) -> Option<&str> {
        match &self.mode {
            Mode::Search(query) => Some(query.as_str()),
            Mode::Normal => None,
        }
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::Search(_))
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Report the first layout: measure both surfaces and the list viewport
    pub fn on_layout(&mut self, list_rows: u16) {
        self.footer_surface.on_layout(FOOTER_ROWS);
        // Drawer content is measured in scroll units: it is the drawer's scale
        self.drawer_surface
            .on_layout(self.config.drawer.max_height * ROW_UNITS);

        let query = self.search_query().map(str::to_string);
        for scene in &mut self.scenes {
            let rows = scene.visible_items(query.as_deref()).len();
            scene
                .scroll
                .set_scroll_range(rows.saturating_sub(list_rows as usize));
        }
    }

    /// Advance gestures and run one render pass
    pub fn update(&mut self, now: Instant) {
        self.scenes[self.active].scroll.tick(now);
        self.frame = self.renderer.frame_at(now);
    }

    /// Whether the next frame should come at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.renderer.needs_frame() || self.active_scene().scroll.is_active()
    }

    pub fn surface_env(&self) -> SurfaceEnv {
        SurfaceEnv {
            // Search input stands in for the on-screen keyboard
            keyboard_height: if self.is_input_mode() { 1.0 } else { 0.0 },
            has_tabs: true,
            ..Default::default()
        }
    }

    pub fn footer_rows(&self) -> u16 {
        self.footer_surface.height(&self.surface_env()).round().max(0.0) as u16
    }

    pub fn footer_content(&self) -> Option<FooterLine> {
        self.footer_surface.render(&self.surface_env())
    }

    pub fn drawer_rows(&self) -> u16 {
        self.drawer_surface.height().round().max(0.0) as u16
    }

    pub fn tab_bar_layout(&self) -> TabBarLayout {
        TabBarLayout::new(self.frame.drawer, &self.config.drawer)
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scenes[self.active].scroll.drag_by(SCROLL_STEP, now),
            Action::ScrollUp => self.scenes[self.active].scroll.drag_by(-SCROLL_STEP, now),
            Action::FlickDown => {
                self.scenes[self.active]
                    .scroll
                    .flick(FLICK_STEP, FLICK_VELOCITY, now)
            }
            Action::FlickUp => {
                self.scenes[self.active]
                    .scroll
                    .flick(-FLICK_STEP, -FLICK_VELOCITY, now)
            }
            Action::NextScene => self.switch_scene((self.active + 1) % self.scenes.len()),
            Action::PrevScene => {
                self.switch_scene((self.active + self.scenes.len() - 1) % self.scenes.len())
            }
            Action::StartSearch => self.start_search(),
            Action::InputChar(c) => {
                if let Mode::Search(query) = &mut self.mode {
                    query.push(c);
                }
                self.refresh_footer();
            }
            Action::Backspace => {
                if let Mode::Search(query) = &mut self.mode {
                    query.pop();
                }
                self.refresh_footer();
            }
            Action::Confirm | Action::Cancel => self.end_search(),
            Action::ResetDrawer => {
                self.context.drawer().reset_ratio();
                self.set_status("Drawer reset");
            }
            Action::None => {}
        }
    }

    /// Move focus to scene `index`; the incoming scene takes the footer first
    fn switch_scene(&mut self, index: usize) {
        if index == self.active {
            return;
        }
        self.end_search();
        let outgoing = self.active;
        self.scenes[outgoing].scroll.release();
        self.active = index;

        let incoming = &self.scenes[index];
        incoming.footer.on_focus(incoming.footer_render(None));
        self.scenes[outgoing].footer.on_blur();
        debug!(scene = self.scenes[index].name, "scene switched");
        self.status_message = None;
    }

    fn start_search(&mut self) {
        if self.is_input_mode() {
            return;
        }
        self.scenes[self.active].scroll.release();
        self.mode = Mode::Search(String::new());
        self.context.footer().set_keep_open(true);
        self.refresh_footer();
    }

    fn end_search(&mut self) {
        if !self.is_input_mode() {
            return;
        }
        self.mode = Mode::Normal;
        self.context.footer().set_keep_open(false);
        self.refresh_footer();
    }

    fn refresh_footer(&self) {
        let scene = self.active_scene();
        scene.footer.update(scene.footer_render(self.search_query()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new(Arc::new(AccordionConfig::default()), None, Theme::default());
        app.on_layout(20);
        app
    }

    fn footer_text(app: &App) -> String {
        app.footer_content()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_first_scene_owns_footer() {
        let app = app();
        assert!(footer_text(&app).contains("Inbox"));
        assert_eq!(app.footer_rows(), 2);
        assert_eq!(app.drawer_rows(), 4);
    }

    #[test]
    fn test_switching_scene_moves_footer() {
        let mut app = app();
        let now = Instant::now();
        app.handle_action(Action::NextScene, now);
        assert_eq!(app.active, 1);
        assert!(footer_text(&app).contains("Archive"));

        app.handle_action(Action::PrevScene, now);
        assert!(footer_text(&app).contains("Inbox"));
    }

    #[test]
    fn test_scroll_collapses_drawer() {
        let mut app = app();
        let start = Instant::now();
        app.handle_action(Action::ScrollDown, start);
        app.handle_action(Action::ScrollDown, start);
        app.handle_action(Action::ScrollDown, start);
        app.update(start);
        app.update(start + Duration::from_millis(200));
        app.update(start + Duration::from_millis(600));

        assert_eq!(app.frame.drawer, 0.0);
        assert_eq!(app.drawer_rows(), 2);
        assert!(!app.tab_bar_layout().label.is_visible());
    }

    #[test]
    fn test_search_pins_footer_open() {
        let mut app = app();
        let start = Instant::now();
        app.handle_action(Action::StartSearch, start);
        app.update(start);
        for c in "item 1".chars() {
            app.handle_action(Action::InputChar(c), start);
        }
        assert!(footer_text(&app).contains("matches"));

        // Scrolling while searching leaves the footer open
        app.scenes[0].scroll.drag_by(8.0, start);
        app.update(start);
        app.update(start + Duration::from_millis(600));
        assert_eq!(app.frame.footer, 1.0);

        app.handle_action(Action::Cancel, start + Duration::from_millis(600));
        assert!(!app.is_input_mode());
        assert!(footer_text(&app).contains("items"));
    }

    #[test]
    fn test_reset_reopens_drawer() {
        let mut app = app();
        let start = Instant::now();
        app.handle_action(Action::ScrollDown, start);
        app.handle_action(Action::ScrollDown, start);
        app.handle_action(Action::ScrollDown, start);
        app.update(start + Duration::from_millis(200));
        app.update(start + Duration::from_millis(600));
        assert_eq!(app.frame.drawer, 0.0);

        let later = start + Duration::from_millis(700);
        app.handle_action(Action::ResetDrawer, later);
        app.update(later);
        app.update(later + Duration::from_millis(300));
        assert_eq!(app.frame.drawer, 1.0);
        assert_eq!(app.status_message.as_deref(), Some("Drawer reset"));
    }
}
