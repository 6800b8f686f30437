use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::theme::blend;

/// Tab-bar drawer: markers always, labels fading and shrinking with the ratio
pub struct TabBarWidget;

impl TabBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let layout = app.tab_bar_layout();

        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.grey0))
            .style(Style::default().bg(theme.bg1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, app.scenes.len() as u32); app.scenes.len()])
            .split(inner);

        let label_color = blend(theme.fg0, theme.bg1, layout.label.opacity);

        for (i, (scene, column)) in app.scenes.iter().zip(columns.iter()).enumerate() {
            let active = i == app.active;
            let marker_style = if active {
                Style::default().fg(theme.green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.grey2)
            };
            let mut lines = vec![Line::styled(if active { "●" } else { "○" }, marker_style).centered()];

            if layout.label.is_visible() && column.height > 1 {
                let width = (column.width as f64 * layout.label.scale).floor() as usize;
                let label = truncate_to_width(scene.name, width);
                lines.push(Line::styled(label, Style::default().fg(label_color)).centered());
            }

            frame.render_widget(Paragraph::new(lines), *column);
        }
    }
}

/// Cut `text` to at most `width` terminal columns
fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}
