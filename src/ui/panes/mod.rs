//! TUI pane rendering modules
//!
//! One render function per scene panel. Panes only read the [`SceneState`];
//! they never change it.
//!
//! # Pane Modules
//!
//! - [`code`]: program code and disassembly with syntax highlighting and the code focus marker
//! - [`os`]: C function box, OS API list and the clock
//! - [`registry`]: the virtual memory registry table
//! - [`memory`]: stack and heap cells with search pointer, outline, lock and inline notes,
//!   joined by the "available memory" separator
//! - [`narration`]: caption, banner notes and the current phase
//! - [`overlay`]: connectors drawn over the panels
//! - [`status`]: status bar with keybindings and playback state
//!
//! [`SceneState`]: crate::scene::state::SceneState

pub mod code;
pub mod memory;
pub mod narration;
pub mod os;
pub mod overlay;
pub mod registry;
pub mod status;

pub use code::{render_code_pane, render_disasm_pane};
pub use memory::{render_heap_pane, render_memory_separator, render_stack_pane};
pub use narration::render_narration_pane;
pub use os::{render_function_pane, render_os_pane};
pub use overlay::render_connectors;
pub use registry::render_registry_pane;
pub use status::{render_status_bar, StatusRenderData};

use crate::scene::state::HighlightMarker;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered pane block; an indicated panel outranks keyboard focus
fn pane_block(title: &str, focused: bool, emphasized: bool) -> Block<'_> {
    let border_style = if emphasized {
        Style::default()
            .fg(DEFAULT_THEME.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Row style for an element a marker points at
fn marked_style(marker: &HighlightMarker) -> Style {
    Style::default()
        .fg(DEFAULT_THEME.tone(marker.tone))
        .bg(DEFAULT_THEME.current_line_bg)
        .add_modifier(Modifier::BOLD)
}

/// Visible rows inside a bordered pane
fn inner_height(height: u16) -> usize {
    height.saturating_sub(2).max(1) as usize
}
