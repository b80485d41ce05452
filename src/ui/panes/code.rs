//! Program code and disassembly panes
//!
//! The code pane uses a small character tokenizer for C++ highlighting; the
//! disassembly pane colors mnemonics, registers and immediates. Both show the
//! code focus marker as a highlighted row with an arrow in the gutter.

use super::{inner_height, marked_style, pane_block};
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

/// Simple syntax highlighting for the demo program
fn highlight_source_code(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    for c in line.chars() {
        if c.is_alphanumeric() || c == '_' {
            current_word.push(c);
            continue;
        }

        if !current_word.is_empty() {
            let kind = word_kind(&current_word, c == '(');
            spans.push(Span::styled(
                std::mem::take(&mut current_word),
                get_keyword_style(&kind),
            ));
        }

        let style = match c {
            '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            '*' | '=' | '&' => Style::default().fg(DEFAULT_THEME.secondary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if !current_word.is_empty() {
        let kind = word_kind(&current_word, false);
        spans.push(Span::styled(current_word, get_keyword_style(&kind)));
    }

    spans
}

enum WordKind {
    Type,
    Keyword,
    Number,
    Function,
    Identifier,
}

fn word_kind(word: &str, is_function: bool) -> WordKind {
    match word {
        "int" | "char" | "void" | "long" | "unsigned" => WordKind::Type,
        "new" | "delete" | "return" | "sizeof" => WordKind::Keyword,
        _ if word.chars().all(|c| c.is_ascii_digit()) => WordKind::Number,
        _ if is_function => WordKind::Function,
        _ => WordKind::Identifier,
    }
}

fn get_keyword_style(kind: &WordKind) -> Style {
    match kind {
        WordKind::Type => Style::default().fg(DEFAULT_THEME.type_name),
        WordKind::Keyword => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        WordKind::Number => Style::default().fg(DEFAULT_THEME.number),
        WordKind::Function => Style::default().fg(DEFAULT_THEME.function),
        WordKind::Identifier => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the program code pane
pub fn render_code_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: &[String],
    state: &SceneState,
    focused: bool,
    scroll: usize,
) {
    let emphasized = state.emphasized == Some(ElementId::Panel(PanelId::Code));
    let block = pane_block(title, focused, emphasized);
    let marker = state.marker(MarkerSlot::CodeFocus);

    let visible: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll)
        .take(inner_height(area.height))
        .map(|(idx, text)| {
            let element = ElementId::CodeLine(idx);
            let current = marker.filter(|m| m.target == element);
            let gutter = if current.is_some() { "▶" } else { " " };
            let num_style = match current {
                Some(m) => marked_style(m),
                None => Style::default().fg(DEFAULT_THEME.comment),
            };

            let mut spans = vec![Span::styled(format!("{}{:3} ", gutter, idx + 1), num_style)];
            spans.extend(highlight_source_code(text));

            let mut line = Line::from(spans);
            if let Some(m) = current {
                line = line.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .fg(DEFAULT_THEME.tone(m.tone)),
                );
            }
            if state.emphasized == Some(element) {
                line = line.patch_style(Style::default().add_modifier(Modifier::REVERSED));
            }
            line
        })
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

const REGISTERS: [&str; 8] = ["rax", "rbx", "rcx", "rdx", "rsp", "rbp", "rsi", "rdi"];

fn highlight_asm(line: &str) -> Vec<Span<'static>> {
    let (mnemonic, operands) = line.split_once(' ').unwrap_or((line, ""));
    let mut spans = vec![Span::styled(
        format!("{} ", mnemonic),
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
    )];

    for token in operands.split_inclusive(|c: char| !c.is_alphanumeric() && c != '_') {
        let word = token.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_');
        let tail = &token[word.len()..];
        let style = if REGISTERS.contains(&word) {
            Style::default().fg(DEFAULT_THEME.type_name)
        } else if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            Style::default().fg(DEFAULT_THEME.number)
        } else {
            Style::default().fg(DEFAULT_THEME.fg)
        };
        if !word.is_empty() {
            spans.push(Span::styled(word.to_string(), style));
        }
        if !tail.is_empty() {
            spans.push(Span::styled(tail.to_string(), Style::default().fg(DEFAULT_THEME.comment)));
        }
    }

    spans
}

/// Render the disassembly pane
pub fn render_disasm_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: &[String],
    state: &SceneState,
    focused: bool,
) {
    let block = pane_block(title, focused, false);

    let visible: Vec<Line> = lines
        .iter()
        .enumerate()
        .take(inner_height(area.height))
        .map(|(idx, text)| {
            let mut line = Line::from(highlight_asm(text));
            if state.emphasized == Some(ElementId::DisasmLine(idx)) {
                line = line.style(Style::default().bg(DEFAULT_THEME.current_line_bg));
                line = line.patch_style(Style::default().add_modifier(Modifier::BOLD));
            }
            line
        })
        .collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlighting_keeps_the_text() {
        let line = "    int* ptr = new int;";
        assert_eq!(text(&highlight_source_code(line)), line);
        assert_eq!(text(&highlight_asm("mov rax, [rsp + addr_ptr]")), "mov rax, [rsp + addr_ptr]");
    }

    #[test]
    fn test_new_is_a_keyword() {
        let spans = highlight_source_code("new int");
        assert_eq!(spans[0].content, "new");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
    }
}
