//! Virtual memory registry pane
//!
//! Header, one line per row, then the footnote naming the real kernel
//! structures. Rows that do not fit are summarised as "+N more" instead of
//! spilling out of the panel.

use super::{inner_height, pane_block};
use crate::scene::state::SceneState;
use crate::scene::ElementId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Pad or cut `text` to exactly `width` columns
fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

fn table_row(fields: &[String], widths: &[u16], style: Style) -> Line<'static> {
    fields
        .iter()
        .zip(widths)
        .map(|(field, width)| Span::styled(fit(field, *width), style))
        .collect::<Vec<Span>>()
        .into()
}

pub fn render_registry_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &SceneState,
    focused: bool,
    scroll: usize,
) {
    let registry = state.registry();
    let block = pane_block(title, focused, state.emphasized == Some(ElementId::RegistryTable));
    let widths = registry.column_widths(area.width.saturating_sub(2));

    let titles: Vec<String> = registry.columns().iter().map(|c| c.title.to_string()).collect();
    let mut lines = vec![table_row(
        &titles,
        &widths,
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )];

    let notes = state.notes_on(ElementId::RegistryTable);
    // header + notes + footnote
    let reserved = 2 + notes.len();
    let height = inner_height(area.height);
    let capacity = height.saturating_sub(reserved);

    let overflow = registry.overflow(capacity);
    let shown = if overflow > 0 { capacity.saturating_sub(1) } else { capacity };
    let first = scroll.min(registry.len().saturating_sub(shown));

    for row in registry.rows().iter().skip(first).take(shown) {
        lines.push(table_row(
            &row.fields,
            &widths,
            Style::default().fg(DEFAULT_THEME.success),
        ));
    }
    let hidden = registry.len().saturating_sub(first + shown);
    if hidden > 0 {
        lines.push(Line::from(Span::styled(
            format!("+{} more", hidden),
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    }
    if registry.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no regions)",
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    }

    // Pin notes and the footnote to the bottom of the pane
    while lines.len() + notes.len() + 1 < height {
        lines.push(Line::default());
    }
    for note in notes {
        lines.push(Line::from(Span::styled(
            note.text.clone(),
            Style::default()
                .fg(DEFAULT_THEME.tone(note.tone))
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(
        registry.schema().footnote(),
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::ITALIC),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
