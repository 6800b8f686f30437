use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::time::Instant;
use tracing::{info, warn};

use scenefold_core::{AccordionConfig, LogicRuntime};
use scenefold_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{FooterWidget, SceneListWidget, StatusBarWidget, TabBarWidget},
    Theme,
};

pub async fn run(config: AccordionConfig) -> Result<()> {
    let config = Arc::new(config);

    // Logic thread: owns delayed-snap timers
    let (logic, logic_task) = LogicRuntime::spawn();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("scenefold"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone(), Some(logic.clone()), Theme::default());
    let event_handler =
        EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    info!(strategy = ?config.snap.strategy, "demo started");

    // Main loop
    loop {
        // Render thread: gestures, then one reaction pass per frame
        app.update(Instant::now());

        terminal.draw(|frame| {
            let size = frame.area();
            let footer_rows = app.footer_rows();
            let drawer_rows = app.drawer_rows();

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),
                    Constraint::Length(footer_rows),
                    Constraint::Length(drawer_rows),
                    Constraint::Length(1),
                ])
                .split(size);

            app.on_layout(layout[0].height);

            SceneListWidget::render(frame, layout[0], &app);
            FooterWidget::render(frame, layout[1], &app);
            TabBarWidget::render(frame, layout[2], &app);
            StatusBarWidget::render(frame, layout[3], &app);
        })?;

        // Poll at animation rate while anything is moving
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app);
                    app.handle_action(action, Instant::now());
                }
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    logic.shutdown();
    if let Err(e) = logic_task.await {
        warn!("Logic runtime ended abnormally: {}", e);
    }

    Ok(())
}
