use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub struct SceneListWidget;

impl SceneListWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let scene = app.active_scene();
        let query = app.search_query();

        let block = Block::default()
            .title(format!(" {} ", scene.name))
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg0));

        let items = scene.visible_items(query);
        let top = scene.scroll.top_row().min(items.len());
        let lines: Vec<Line> = items[top..]
            .iter()
            .take(area.height as usize)
            .map(|item| {
                let style = if query.is_some_and(|q| !q.is_empty()) {
                    Style::default().fg(theme.yellow)
                } else {
                    Style::default().fg(theme.fg0)
                };
                Line::from(vec![Span::raw(" "), Span::styled(item.to_string(), style)])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
