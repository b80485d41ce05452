//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: interactive player state, keyboard event loop, pane focus, autoplay
//! - **[`panes`]**: stateless render functions for each scene panel, the
//!   connector overlay and the status bar
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! [`render_scene`] draws one [`SceneState`] into a frame. The interactive
//! [`App`] and the headless renderer in [`crate::render`] both go through it,
//! so a frame written to disk looks exactly like the TUI at that position.

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;

use crate::scene::layout::PanelId;
use crate::scene::state::SceneState;
use crate::scene::Scene;
use crate::timeline::player::Player;
use panes::StatusRenderData;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Per-frame view options that are not part of the scene state
#[derive(Debug, Clone, Copy, Default)]
pub struct View {
    pub focused: Option<PanelId>,
    /// Scroll offset per panel, indexed by `PanelId as usize`
    pub scroll: [usize; PanelId::COUNT],
}

impl View {
    pub fn is_focused(&self, id: PanelId) -> bool {
        self.focused == Some(id)
    }

    pub fn scroll(&self, id: PanelId) -> usize {
        self.scroll[id as usize]
    }
}

/// Draw every visible panel of `scene` at `state` into `area`
pub fn render_scene(frame: &mut Frame, area: Rect, scene: &Scene, state: &SceneState, view: &View) {
    let layout = &scene.layout;
    let config = &scene.config;

    for panel in layout.panels() {
        if !state.is_panel_visible(panel.id) {
            continue;
        }
        let rect = layout.project(panel.id, area);
        if !fits_border(rect) {
            continue;
        }
        let focused = view.is_focused(panel.id);
        let scroll = view.scroll(panel.id);
        let title = panel.title.as_str();

        match panel.id {
            PanelId::Code => panes::render_code_pane(
                frame,
                rect,
                title,
                &config.code_lines,
                state,
                focused,
                scroll,
            ),
            PanelId::Disassembly => {
                panes::render_disasm_pane(frame, rect, title, &config.disasm_lines, state, focused)
            }
            PanelId::Function => panes::render_function_pane(frame, rect, title, state, focused),
            PanelId::Os => {
                panes::render_os_pane(frame, rect, title, &config.api_functions, state, focused)
            }
            PanelId::Registry => {
                panes::render_registry_pane(frame, rect, title, state, focused, scroll)
            }
            PanelId::Stack => panes::render_stack_pane(frame, rect, title, state, focused, scroll),
            PanelId::Heap => panes::render_heap_pane(
                frame,
                rect,
                title,
                config.heap.page_size,
                state,
                focused,
                scroll,
            ),
            PanelId::Narration => panes::render_narration_pane(frame, rect, title, state, focused),
        }
    }

    if state.is_panel_visible(PanelId::Stack) && state.is_panel_visible(PanelId::Heap) {
        let stack = layout.project(PanelId::Stack, area);
        let heap = layout.project(PanelId::Heap, area);
        if fits_border(stack) && fits_border(heap) {
            panes::render_memory_separator(frame, stack, heap);
        }
    }

    panes::render_connectors(frame, area, layout, state);
}

/// Panels too small for a border and one row are skipped
fn fits_border(rect: Rect) -> bool {
    rect.width >= 3 && rect.height >= 3
}

/// Scene plus status bar, as shown for the player's current position
pub fn render_frame(
    frame: &mut Frame,
    scene: &Scene,
    player: &Player,
    view: &View,
    message: &str,
    speed: f32,
    is_playing: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    render_scene(frame, chunks[0], scene, player.state(), view);

    let position = player.history_position();
    panes::render_status_bar(
        frame,
        chunks[1],
        &StatusRenderData {
            message,
            position,
            total: player.total_snapshots(),
            phase: player.state().phase,
            elapsed: player.elapsed(position),
            total_duration: player.total_duration(),
            speed,
            is_playing,
        },
    );
}
