//! C function box and operating system panes

use super::{inner_height, marked_style, pane_block};
use crate::scene::layout::PanelId;
use crate::scene::state::{MarkerSlot, SceneState};
use crate::scene::ElementId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const CLOCK_FACES: [char; 4] = ['◴', '◷', '◶', '◵'];

pub fn render_function_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &SceneState,
    focused: bool,
) {
    let block = pane_block(title, focused, state.emphasized == Some(ElementId::FunctionCall));

    let paragraph = match &state.function_call {
        Some(name) => {
            // The allocating call is green, the releasing one red
            let color = if name.starts_with("free") {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.success
            };
            Paragraph::new(Line::from(Span::styled(
                name.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
        }
        None => Paragraph::new("(idle)").style(Style::default().fg(DEFAULT_THEME.comment)),
    };

    frame.render_widget(paragraph.alignment(Alignment::Center).block(block), area);
}

/// API list followed by the clock row
pub fn render_os_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    apis: &[String],
    state: &SceneState,
    focused: bool,
) {
    let block = pane_block(title, focused, state.emphasized == Some(ElementId::Panel(PanelId::Os)));
    let focus = state.marker(MarkerSlot::ApiFocus);

    let mut lines: Vec<Line> = apis
        .iter()
        .enumerate()
        .map(|(idx, api)| {
            let element = ElementId::Api(idx);
            match focus.filter(|m| m.target == element) {
                Some(marker) => {
                    Line::from(Span::styled(format!("▶ {}", api), marked_style(marker)))
                }
                None => Line::from(Span::styled(
                    format!("  {}", api),
                    Style::default().fg(DEFAULT_THEME.function),
                )),
            }
        })
        .collect();

    let face = CLOCK_FACES[state.clock_ticks as usize % CLOCK_FACES.len()];
    let clock_style = if state.clock_ticks > 0 {
        Style::default().fg(DEFAULT_THEME.accent)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{} ", face), clock_style),
        Span::styled(
            format!("{} tick(s)", state.clock_ticks),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ]));

    lines.truncate(inner_height(area.height));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
