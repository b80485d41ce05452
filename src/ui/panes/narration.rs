//! Narration pane: banner notes, the caption and the current phase

use super::pane_block;
use crate::scene::layout::PanelId;
use crate::scene::state::SceneState;
use crate::scene::ElementId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render_narration_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &SceneState,
    focused: bool,
) {
    let block = pane_block(title, focused, false);

    let mut lines: Vec<Line> = state
        .notes_on(ElementId::Panel(PanelId::Narration))
        .into_iter()
        .map(|note| {
            Line::from(Span::styled(
                format!("■ {}", note.text),
                Style::default()
                    .fg(DEFAULT_THEME.tone(note.tone))
                    .add_modifier(Modifier::BOLD),
            ))
        })
        .collect();

    lines.push(Line::from(Span::styled(
        state.caption.clone(),
        Style::default().fg(DEFAULT_THEME.fg),
    )));
    lines.push(Line::from(Span::styled(
        format!("phase: {}", state.phase),
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
