//! Layout builder
//!
//! Places the scene's panels on a fixed canvas and lists the elements each
//! panel owns. The result is static for the lifetime of a scene: the timeline
//! addresses elements through [`ElementId`]s, never through positions.
//!
//! Geometry is expressed in canvas units ([`CANVAS_WIDTH`] × [`CANVAS_HEIGHT`],
//! origin at the top-left) and projected onto a terminal [`Rect`] at draw time.

use super::config::SceneConfig;
use super::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use super::ElementId;
use crate::errors::{Result, SceneError};
use ratatui::layout::Rect;
use rustc_hash::FxHashMap;

/// The fixed set of panels every scene has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Code,
    Disassembly,
    Function,
    Os,
    Registry,
    Stack,
    Heap,
    Narration,
}

impl PanelId {
    pub const COUNT: usize = 8;

    pub const ALL: [PanelId; PanelId::COUNT] = [
        PanelId::Code,
        PanelId::Disassembly,
        PanelId::Function,
        PanelId::Os,
        PanelId::Registry,
        PanelId::Stack,
        PanelId::Heap,
        PanelId::Narration,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PanelId::Code => "Program code",
            PanelId::Disassembly => "Disassembly",
            PanelId::Function => "C function",
            PanelId::Os => "Operating system",
            PanelId::Registry => "Virtual memory registry",
            PanelId::Stack => "Stack",
            PanelId::Heap => "Heap",
            PanelId::Narration => "What is happening",
        }
    }

    /// Base placement before scaling
    fn base_geometry(self) -> Geometry {
        match self {
            PanelId::Code => Geometry::new(0.2, 0.2, 4.8, 4.4),
            PanelId::Disassembly => Geometry::new(0.2, 4.8, 4.8, 1.6),
            PanelId::Function => Geometry::new(5.2, 0.2, 2.1, 1.4),
            PanelId::Os => Geometry::new(7.5, 0.2, 3.1, 2.6),
            PanelId::Registry => Geometry::new(5.2, 3.0, 5.4, 3.4),
            PanelId::Stack => Geometry::new(10.8, 0.2, 5.0, 4.2),
            PanelId::Heap => Geometry::new(10.8, 4.6, 5.0, 4.2),
            PanelId::Narration => Geometry::new(0.2, 6.6, 10.4, 2.2),
        }
    }
}

/// Axis-aligned rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Geometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Geometry {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Scale about the center
    pub fn scaled(&self, factor: f32) -> Self {
        let (cx, cy) = self.center();
        let width = self.width * factor;
        let height = self.height * factor;
        Geometry::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn is_inside_canvas(&self) -> bool {
        const SLACK: f32 = 1e-4;
        self.x >= -SLACK
            && self.y >= -SLACK
            && self.right() <= CANVAS_WIDTH + SLACK
            && self.bottom() <= CANVAS_HEIGHT + SLACK
    }

    /// Shared edges do not count as overlap
    pub fn overlaps(&self, other: &Geometry) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A labeled region and the elements it owns
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: PanelId,
    pub title: String,
    pub geometry: Geometry,
    pub children: Vec<ElementId>,
}

/// Panel id → geometry + ordered children
#[derive(Debug, Clone)]
pub struct SceneLayout {
    panels: Vec<Panel>,
    owners: FxHashMap<ElementId, (PanelId, usize)>,
}

/// Build the static arrangement of panels for `config`
pub fn build_layout(config: &SceneConfig) -> Result<SceneLayout> {
    let scale = config.scale;
    for (group, value) in [("code", scale.code), ("os", scale.os), ("memory", scale.memory)] {
        if !value.is_finite() || value <= 0.0 || value > 1.5 {
            return Err(SceneError::InvalidScale { group, value });
        }
    }

    let panels: Vec<Panel> = PanelId::ALL
        .iter()
        .map(|&id| {
            let factor = match id {
                PanelId::Code | PanelId::Disassembly => scale.code,
                PanelId::Function | PanelId::Os | PanelId::Registry => scale.os,
                PanelId::Stack | PanelId::Heap => scale.memory,
                PanelId::Narration => 1.0,
            };
            Panel {
                id,
                title: panel_title(id, config),
                geometry: id.base_geometry().scaled(factor),
                children: panel_children(id, config),
            }
        })
        .collect();

    if let Some(outside) = panels.iter().find(|panel| !panel.geometry.is_inside_canvas()) {
        return Err(SceneError::PanelOutOfBounds(outside.id));
    }

    for (i, first) in panels.iter().enumerate() {
        for second in &panels[i + 1..] {
            if first.geometry.overlaps(&second.geometry) {
                return Err(SceneError::PanelOverlap {
                    first: first.id,
                    second: second.id,
                });
            }
        }
    }

    let mut owners = FxHashMap::default();
    for panel in &panels {
        owners.insert(ElementId::Panel(panel.id), (panel.id, 0));
        for (index, child) in panel.children.iter().enumerate() {
            owners.insert(*child, (panel.id, index));
        }
    }

    Ok(SceneLayout { panels, owners })
}

fn panel_title(id: PanelId, config: &SceneConfig) -> String {
    match id {
        PanelId::Code => format!("{} · {}", id.title(), config.process_label()),
        _ => id.title().to_string(),
    }
}

fn panel_children(id: PanelId, config: &SceneConfig) -> Vec<ElementId> {
    match id {
        PanelId::Code => (0..config.code_lines.len()).map(ElementId::CodeLine).collect(),
        PanelId::Disassembly => (0..config.disasm_lines.len())
            .map(ElementId::DisasmLine)
            .collect(),
        PanelId::Function => vec![ElementId::FunctionCall],
        PanelId::Os => (0..config.api_functions.len())
            .map(ElementId::Api)
            .chain(std::iter::once(ElementId::Clock))
            .collect(),
        PanelId::Registry => vec![ElementId::RegistryTable],
        PanelId::Stack => (0..config.stack.cells.len())
            .map(ElementId::StackCell)
            .collect(),
        PanelId::Heap => std::iter::once(ElementId::PageInfo)
            .chain((0..config.heap.len()).map(ElementId::HeapCell))
            .collect(),
        PanelId::Narration => Vec::new(),
    }
}

impl SceneLayout {
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, id: PanelId) -> &Panel {
        // `panels` is built from PanelId::ALL in declaration order
        &self.panels[id as usize]
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.owners.contains_key(&element)
    }

    pub fn panel_of(&self, element: ElementId) -> Option<PanelId> {
        self.owners.get(&element).map(|(panel, _)| *panel)
    }

    /// Position of `element` among its panel's children
    pub fn child_index(&self, element: ElementId) -> Option<usize> {
        match element {
            ElementId::Panel(_) => None,
            _ => self.owners.get(&element).map(|(_, index)| *index),
        }
    }

    /// Map a panel's canvas geometry onto a terminal area
    pub fn project(&self, id: PanelId, area: Rect) -> Rect {
        let g = self.panel(id).geometry;
        let sx = area.width as f32 / CANVAS_WIDTH;
        let sy = area.height as f32 / CANVAS_HEIGHT;

        let x0 = (g.x * sx).round().max(0.0) as u16;
        let y0 = (g.y * sy).round().max(0.0) as u16;
        let x1 = ((g.right() * sx).round() as u16).min(area.width);
        let y1 = ((g.bottom() * sy).round() as u16).min(area.height);

        Rect {
            x: area.x + x0.min(area.width),
            y: area.y + y0.min(area.height),
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::config::{PanelScale, SceneName};

    #[test]
    fn test_default_layout_has_every_panel_without_overlap() {
        let layout = build_layout(&SceneConfig::default()).unwrap();
        assert_eq!(layout.panels().len(), PanelId::ALL.len());
        for (i, panel) in layout.panels().iter().enumerate() {
            assert_eq!(panel.id, PanelId::ALL[i]);
        }
    }

    #[test]
    fn test_children_are_addressable() {
        let layout = build_layout(&SceneConfig::default()).unwrap();
        assert_eq!(layout.panel_of(ElementId::HeapCell(4)), Some(PanelId::Heap));
        assert_eq!(layout.child_index(ElementId::HeapCell(0)), Some(1));
        assert_eq!(layout.child_index(ElementId::Clock), Some(4));
        assert!(layout.contains(ElementId::Panel(PanelId::Narration)));
        assert!(!layout.contains(ElementId::HeapCell(5)));
        assert!(!layout.contains(ElementId::CodeLine(9)));
    }

    #[test]
    fn test_every_preset_builds() {
        for name in SceneName::ALL {
            assert!(build_layout(&SceneConfig::preset(name)).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_oversized_panels_overlap() {
        let config = SceneConfig {
            scale: PanelScale {
                os: 1.14,
                ..PanelScale::default()
            },
            ..SceneConfig::default()
        };
        assert!(matches!(
            build_layout(&config),
            Err(SceneError::PanelOverlap { .. })
        ));
    }

    #[test]
    fn test_panels_must_stay_on_the_canvas() {
        let config = SceneConfig {
            scale: PanelScale {
                memory: 1.5,
                ..PanelScale::default()
            },
            ..SceneConfig::default()
        };
        assert!(matches!(
            build_layout(&config),
            Err(SceneError::PanelOutOfBounds(PanelId::Stack))
        ));
        assert!(Geometry::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT).is_inside_canvas());
        assert!(!Geometry::new(-0.5, 1.0, 2.0, 2.0).is_inside_canvas());
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let config = SceneConfig {
            scale: PanelScale {
                memory: 0.0,
                ..PanelScale::default()
            },
            ..SceneConfig::default()
        };
        assert!(matches!(
            build_layout(&config),
            Err(SceneError::InvalidScale { group: "memory", .. })
        ));
    }

    #[test]
    fn test_projection_stays_inside_area() {
        let layout = build_layout(&SceneConfig::default()).unwrap();
        let area = Rect::new(0, 0, 160, 45);
        for id in PanelId::ALL {
            let rect = layout.project(id, area);
            assert!(rect.right() <= area.right(), "{:?}", id);
            assert!(rect.bottom() <= area.bottom(), "{:?}", id);
            assert!(rect.width > 0 && rect.height > 0, "{:?}", id);
        }
        let code = layout.project(PanelId::Code, area);
        let stack = layout.project(PanelId::Stack, area);
        assert!(code.x < stack.x);
    }
}
