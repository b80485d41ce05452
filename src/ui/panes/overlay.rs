//! Connector overlay
//!
//! Connectors are drawn last, straight into the frame buffer, as dotted lines
//! that only occupy blank cells so they never hide panel text. Each end sits
//! on the border of its panel at the row of the element it points to.

use crate::scene::layout::SceneLayout;
use crate::scene::state::{Connector, SceneState};
use crate::scene::ElementId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, Frame};

/// Panel rect and row of `element`
fn element_anchor(layout: &SceneLayout, element: ElementId, area: Rect) -> Option<(Rect, u16)> {
    let panel = layout.panel_of(element)?;
    let rect = layout.project(panel, area);
    let row = match layout.child_index(element) {
        Some(index) => {
            let last = rect.bottom().saturating_sub(2).max(rect.y);
            (rect.y + 1 + index as u16).min(last)
        }
        None => rect.y + rect.height / 2,
    };
    Some((rect, row))
}

/// Border cell of `rect` facing `toward`
fn endpoint(rect: Rect, row: u16, toward: (u16, u16)) -> (u16, u16) {
    let (tx, ty) = toward;
    if tx >= rect.right() {
        (rect.right().saturating_sub(1), row)
    } else if tx < rect.x {
        (rect.x, row)
    } else if ty >= rect.bottom() {
        (rect.x + rect.width / 2, rect.bottom().saturating_sub(1))
    } else {
        (rect.x + rect.width / 2, rect.y)
    }
}

fn center(rect: Rect) -> (u16, u16) {
    (rect.x + rect.width / 2, rect.y + rect.height / 2)
}

/// Cells on the line from `a` to `b`, both ends included
fn line_points(a: (u16, u16), b: (u16, u16)) -> Vec<(u16, u16)> {
    let (mut x, mut y) = (a.0 as i32, a.1 as i32);
    let (x1, y1) = (b.0 as i32, b.1 as i32);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut points = Vec::new();
    loop {
        points.push((x as u16, y as u16));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

fn arrow_head(from: (u16, u16), to: (u16, u16)) -> char {
    let dx = to.0 as i32 - from.0 as i32;
    let dy = to.1 as i32 - from.1 as i32;
    if dx.abs() * 2 >= dy.abs() * 5 {
        if dx >= 0 {
            '▸'
        } else {
            '◂'
        }
    } else if dy >= 0 {
        '▾'
    } else {
        '▴'
    }
}

fn put(buf: &mut Buffer, (x, y): (u16, u16), symbol: char, color: Color, only_blank: bool) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        if only_blank && cell.symbol() != " " {
            return;
        }
        cell.set_char(symbol).set_fg(color);
    }
}

fn draw_connector(buf: &mut Buffer, layout: &SceneLayout, area: Rect, connector: &Connector) {
    let (Some((from_rect, from_row)), Some((to_rect, to_row))) = (
        element_anchor(layout, connector.from, area),
        element_anchor(layout, connector.to, area),
    ) else {
        return;
    };

    let start = endpoint(from_rect, from_row, center(to_rect));
    let end = endpoint(to_rect, to_row, center(from_rect));
    let color = DEFAULT_THEME.tone(connector.tone);

    let points = line_points(start, end);
    if points.len() > 2 {
        for point in &points[1..points.len() - 1] {
            put(buf, *point, '·', color, true);
        }
    }
    put(buf, start, '●', color, false);
    put(buf, end, arrow_head(start, end), color, false);
}

/// Draw every connector whose two panels are visible
pub fn render_connectors(frame: &mut Frame, area: Rect, layout: &SceneLayout, state: &SceneState) {
    let buf = frame.buffer_mut();
    for connector in state.connectors() {
        let visible = [connector.from, connector.to].iter().all(|element| {
            layout
                .panel_of(*element)
                .is_some_and(|panel| state.is_panel_visible(panel))
        });
        if visible {
            draw_connector(buf, layout, area, connector);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_points_cover_both_ends() {
        let points = line_points((2, 3), (9, 5));
        assert_eq!(points.first(), Some(&(2, 3)));
        assert_eq!(points.last(), Some(&(9, 5)));
        assert_eq!(points.len(), 8);
    }

    #[test]
    fn test_endpoint_faces_the_other_panel() {
        let rect = Rect::new(10, 10, 20, 8);
        assert_eq!(endpoint(rect, 12, (50, 12)), (29, 12));
        assert_eq!(endpoint(rect, 12, (0, 12)), (10, 12));
        assert_eq!(endpoint(rect, 12, (15, 40)), (20, 17));
    }

    #[test]
    fn test_arrow_head_follows_direction() {
        assert_eq!(arrow_head((0, 0), (10, 1)), '▸');
        assert_eq!(arrow_head((10, 0), (0, 0)), '◂');
        assert_eq!(arrow_head((0, 0), (0, 5)), '▾');
    }
}
