//! Stack and heap panes
//!
//! Each cell is one row: `address │ content`. The search pointer sits in the
//! gutter, the block outline colors the gutter bar, the lock follows the
//! address and notes anchored to a cell trail its content.

use super::{inner_height, pane_block};
use crate::memory::MemoryCell;
use crate::scene::layout::PanelId;
use crate::scene::state::{MarkerSlot, SceneState};
use crate::scene::ElementId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const LOCK_GLYPH: &str = "⚿";
const SEPARATOR_LABEL: &str = " available memory ";
const WAVE: char = '∿';

fn cell_line(state: &SceneState, element: ElementId, cell: &MemoryCell) -> Line<'static> {
    let pointer = state
        .marker(MarkerSlot::SearchPointer)
        .filter(|m| m.target == element);
    let outline = state
        .marker(MarkerSlot::BlockOutline)
        .filter(|m| m.target == element);
    let lock = state.marker(MarkerSlot::Lock).filter(|m| m.target == element);

    let mut spans = Vec::new();

    spans.push(match pointer {
        Some(m) => Span::styled("▶", Style::default().fg(DEFAULT_THEME.tone(m.tone))),
        None => Span::raw(" "),
    });
    spans.push(match outline {
        Some(m) => Span::styled(
            "┃",
            Style::default()
                .fg(DEFAULT_THEME.tone(m.tone))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(" "),
    });

    let address_style = match outline {
        Some(m) => Style::default()
            .fg(DEFAULT_THEME.tone(m.tone))
            .add_modifier(Modifier::BOLD),
        None => Style::default().fg(DEFAULT_THEME.fg),
    };
    spans.push(Span::styled(cell.address.clone(), address_style));
    spans.push(match lock {
        Some(m) => Span::styled(
            format!(" {}", LOCK_GLYPH),
            Style::default().fg(DEFAULT_THEME.tone(m.tone)),
        ),
        None => Span::raw("  "),
    });
    spans.push(Span::styled(" │ ", Style::default().fg(DEFAULT_THEME.comment)));

    let mut content_style = Style::default().fg(DEFAULT_THEME.tone(cell.tone));
    if state.emphasized == Some(element) {
        content_style = content_style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    spans.push(Span::styled(cell.content.clone(), content_style));

    for note in state.notes_on(element) {
        spans.push(Span::styled(
            format!("  ◀ {}", note.text),
            Style::default()
                .fg(DEFAULT_THEME.tone(note.tone))
                .add_modifier(Modifier::BOLD),
        ));
    }

    let mut line = Line::from(spans);
    if outline.is_some() {
        line = line.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
    }
    line
}

pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &SceneState,
    focused: bool,
    scroll: usize,
) {
    let emphasized = state.emphasized == Some(ElementId::Panel(PanelId::Stack));
    let block = pane_block(title, focused, emphasized);

    let lines: Vec<Line> = state
        .stack()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(inner_height(area.height))
        .map(|(idx, cell)| cell_line(state, ElementId::StackCell(idx), cell))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Page size row first, then one row per heap block
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    page_size: u64,
    state: &SceneState,
    focused: bool,
    scroll: usize,
) {
    let emphasized = state.emphasized == Some(ElementId::Panel(PanelId::Heap));
    let block = pane_block(title, focused, emphasized);

    let page_style = if state.emphasized == Some(ElementId::PageInfo) {
        Style::default()
            .fg(DEFAULT_THEME.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };
    let mut lines = vec![Line::from(Span::styled(
        format!("Page size: {} bytes", page_size),
        page_style,
    ))];

    lines.extend(
        state
            .heap()
            .iter()
            .enumerate()
            .skip(scroll)
            .map(|(idx, cell)| cell_line(state, ElementId::HeapCell(idx), cell)),
    );
    lines.truncate(inner_height(area.height));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Wavy rule of `width` columns with the label in the middle
fn separator_text(width: usize) -> String {
    let label_width = SEPARATOR_LABEL.chars().count();
    if width < label_width + 2 {
        return std::iter::repeat(WAVE).take(width).collect();
    }
    let left = (width - label_width) / 2;
    let right = width - label_width - left;
    let mut text: String = std::iter::repeat(WAVE).take(left).collect();
    text.push_str(SEPARATOR_LABEL);
    text.extend(std::iter::repeat(WAVE).take(right));
    text
}

/// Stack and heap are two ends of one address space; mark the gap between them
pub fn render_memory_separator(frame: &mut Frame, stack: Rect, heap: Rect) {
    let top = stack.bottom();
    if heap.y <= top {
        return;
    }
    let area = Rect {
        x: stack.x.min(heap.x),
        y: top,
        width: stack.width.max(heap.width),
        height: heap.y - top,
    };
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };

    let rule = Paragraph::new(Line::from(Span::styled(
        separator_text(middle.width as usize),
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(rule, middle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::SceneConfig;
    use crate::scene::Tone;
    use crate::timeline::Mutation;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_separator_centers_the_label() {
        let text = separator_text(30);
        assert_eq!(text.chars().count(), 30);
        assert!(text.starts_with(WAVE) && text.ends_with(WAVE));
        assert!(text.contains("available memory"));

        assert_eq!(separator_text(8), "∿".repeat(8));
        assert_eq!(separator_text(0), "");
    }

    #[test]
    fn test_markers_and_notes_are_inline() {
        let mut state = SceneState::new(&SceneConfig::default());
        let cell = ElementId::HeapCell(2);
        for mutation in [
            Mutation::Focus {
                slot: MarkerSlot::SearchPointer,
                target: cell,
                tone: Tone::Accent,
            },
            Mutation::Focus {
                slot: MarkerSlot::Lock,
                target: cell,
                tone: Tone::Warning,
            },
            Mutation::ShowNote {
                slot: crate::scene::state::NoteSlot::Reserved,
                anchor: cell,
                text: "Block reserved".into(),
                tone: Tone::Success,
            },
        ] {
            state.apply(&mutation).unwrap();
        }

        let line = text(&cell_line(&state, cell, &state.heap()[2]));
        assert!(line.starts_with('▶'));
        assert!(line.contains(LOCK_GLYPH));
        assert!(line.ends_with("◀ Block reserved"));

        let other = text(&cell_line(&state, ElementId::HeapCell(1), &state.heap()[1]));
        assert!(!other.contains('▶'));
    }
}
