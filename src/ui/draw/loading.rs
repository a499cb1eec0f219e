//! Loading placeholder, drawn until fonts are ready

use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::Style,
    widgets::{Block, Paragraph},
    Frame,
};

use crate::ui::theme::Theme;

pub const LOADING_TEXT: &str = "Loading...";

pub(crate) fn draw_loading(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let text = Paragraph::new(LOADING_TEXT)
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.foreground).bg(theme.background));
    f.render_widget(text, middle);
}
