use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Footer surface: the focused scene's content, clipped to the animated height
pub struct FooterWidget;

impl FooterWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.height == 0 {
            return;
        }
        let theme = &app.theme;
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.grey0))
            .style(Style::default().bg(theme.bg1).fg(theme.fg0));

        let paragraph = match app.footer_content() {
            Some(line) => Paragraph::new(line),
            None => Paragraph::new(""),
        };
        frame.render_widget(paragraph.block(block), area);
    }
}
