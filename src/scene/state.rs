//! Scene state threaded through the timeline
//!
//! [`SceneState`] holds everything that changes while a scene plays. It is
//! owned by the player and mutated only through [`SceneState::apply`]; the
//! snapshot history stores clones of it.

use super::config::SceneConfig;
use super::layout::PanelId;
use super::phase::Phase;
use super::{ElementId, Tone};
use crate::errors::{Result, SceneError};
use crate::memory::{CellRef, MemoryCell, Region};
use crate::registry::{Registry, RowHandle};
use crate::timeline::step::Mutation;
use rustc_hash::{FxHashMap, FxHashSet};

/// Named slot for a transient focus indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerSlot {
    /// Box around the current code line
    CodeFocus,
    /// Box around the OS API being called
    ApiFocus,
    /// Triangle walking down the heap
    SearchPointer,
    /// Red or green outline around the heap block under consideration
    BlockOutline,
    /// Lock next to the reserved block's address
    Lock,
}

/// Named slot for a transient label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteSlot {
    SearchVerdict,
    Reserved,
    Freed,
    Crash,
    Termination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightMarker {
    pub target: ElementId,
    pub tone: Tone,
}

/// Arrow between two elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub key: String,
    pub from: ElementId,
    pub to: ElementId,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub anchor: ElementId,
    pub text: String,
    pub tone: Tone,
}

/// Everything that changes while a scene plays
#[derive(Debug, Clone)]
pub struct SceneState {
    pub phase: Phase,
    visible: FxHashSet<ElementId>,
    stack: Vec<MemoryCell>,
    heap: Vec<MemoryCell>,
    registry: Registry,
    row_keys: FxHashMap<String, RowHandle>,
    markers: FxHashMap<MarkerSlot, HighlightMarker>,
    connectors: Vec<Connector>,
    notes: FxHashMap<NoteSlot, Note>,
    pub function_call: Option<String>,
    pub clock_ticks: u32,
    /// Element indicated during the current beat
    pub emphasized: Option<ElementId>,
    pub caption: String,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Self {
        let mut visible = FxHashSet::default();
        visible.insert(ElementId::Panel(PanelId::Narration));

        SceneState {
            phase: Phase::Idle,
            visible,
            stack: config.stack.cells(),
            heap: config.heap.cells(),
            registry: Registry::new(config.registry_schema),
            row_keys: FxHashMap::default(),
            markers: FxHashMap::default(),
            connectors: Vec::new(),
            notes: FxHashMap::default(),
            function_call: None,
            clock_ticks: 0,
            emphasized: None,
            caption: String::new(),
        }
    }

    /// Called by the player before the first step of each beat
    pub fn begin_beat(&mut self) {
        self.emphasized = None;
    }

    /// Apply one mutation
    pub fn apply(&mut self, mutation: &Mutation) -> Result<()> {
        match mutation {
            Mutation::FadeIn(element) => {
                self.visible.insert(*element);
            }
            Mutation::FadeOut(element) => {
                self.visible.remove(element);
            }
            Mutation::Focus { slot, target, tone } => {
                self.markers.insert(
                    *slot,
                    HighlightMarker {
                        target: *target,
                        tone: *tone,
                    },
                );
            }
            Mutation::Unfocus { slot, optional } => {
                if self.markers.remove(slot).is_none() {
                    Self::tolerate(*optional, SceneError::MissingMarker(*slot))?;
                }
            }
            Mutation::Connect {
                key,
                from,
                to,
                tone,
            } => {
                self.connectors.retain(|c| &c.key != key);
                self.connectors.push(Connector {
                    key: key.clone(),
                    from: *from,
                    to: *to,
                    tone: *tone,
                });
            }
            Mutation::Disconnect { key, optional } => {
                let before = self.connectors.len();
                self.connectors.retain(|c| &c.key != key);
                if self.connectors.len() == before {
                    Self::tolerate(*optional, SceneError::MissingConnector(key.clone()))?;
                }
            }
            Mutation::SetCell { cell, text, tone } => {
                self.cell_mut(*cell)?.set(text.as_str(), *tone);
            }
            Mutation::Retone { cell, tone } => {
                self.cell_mut(*cell)?.tone = *tone;
            }
            Mutation::RestoreCell(cell) => {
                self.cell_mut(*cell)?.restore();
            }
            Mutation::ShowNote {
                slot,
                anchor,
                text,
                tone,
            } => {
                self.notes.insert(
                    *slot,
                    Note {
                        anchor: *anchor,
                        text: text.clone(),
                        tone: *tone,
                    },
                );
            }
            Mutation::HideNote { slot, optional } => {
                if self.notes.remove(slot).is_none() {
                    Self::tolerate(*optional, SceneError::MissingNote(*slot))?;
                }
            }
            Mutation::CallFunction(name) => {
                self.function_call = name.clone();
            }
            Mutation::Indicate(element) => {
                self.emphasized = Some(*element);
            }
            Mutation::TickClock => {
                self.clock_ticks += 1;
            }
            Mutation::AppendRow { key, fields } => {
                let handle = self.registry.append_row(fields.clone())?;
                log::debug!("registry row {} bound to '{}'", handle, key);
                self.row_keys.insert(key.clone(), handle);
            }
            Mutation::RemoveRow { key } => {
                let handle = self
                    .row_keys
                    .remove(key)
                    .ok_or_else(|| SceneError::UnknownRowKey(key.clone()))?;
                self.registry.remove_row(handle)?;
            }
            Mutation::RemoveAllRows => {
                let handles: Vec<RowHandle> =
                    self.registry.rows().iter().map(|row| row.handle).collect();
                for handle in handles {
                    self.registry.remove_row(handle)?;
                }
                self.row_keys.clear();
            }
            Mutation::Enter(next) => {
                self.phase = self.phase.advance(*next)?;
                log::debug!("phase -> {}", self.phase);
            }
            Mutation::Caption(text) => {
                self.caption = text.clone();
            }
            Mutation::Wait => {}
        }
        Ok(())
    }

    /// Best-effort cleanup: absence of an optional target is a no-op
    fn tolerate(optional: bool, missing: SceneError) -> Result<()> {
        if optional {
            log::debug!("skipping optional cleanup: {}", missing);
            Ok(())
        } else {
            Err(missing)
        }
    }

    fn cell_mut(&mut self, cell: CellRef) -> Result<&mut MemoryCell> {
        let cells = match cell.region {
            Region::Stack => &mut self.stack,
            Region::Heap => &mut self.heap,
        };
        cells
            .get_mut(cell.index)
            .ok_or(SceneError::UnknownElement(ElementId::from(cell)))
    }

    // ========== Getters for rendering and tests ==========

    /// A panel's children are visible exactly when the panel is
    pub fn is_panel_visible(&self, panel: PanelId) -> bool {
        self.visible.contains(&ElementId::Panel(panel))
    }

    pub fn cell(&self, cell: CellRef) -> Option<&MemoryCell> {
        match cell.region {
            Region::Stack => self.stack.get(cell.index),
            Region::Heap => self.heap.get(cell.index),
        }
    }

    pub fn stack(&self) -> &[MemoryCell] {
        &self.stack
    }

    pub fn heap(&self) -> &[MemoryCell] {
        &self.heap
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn marker(&self, slot: MarkerSlot) -> Option<&HighlightMarker> {
        self.markers.get(&slot)
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerSlot, &HighlightMarker)> {
        self.markers.iter()
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn note(&self, slot: NoteSlot) -> Option<&Note> {
        self.notes.get(&slot)
    }

    /// Notes anchored to `element`
    pub fn notes_on(&self, element: ElementId) -> Vec<&Note> {
        self.notes.values().filter(|n| n.anchor == element).collect()
    }

    /// Rough byte size used by the snapshot budget
    pub fn estimated_size(&self) -> usize {
        let cells: usize = self
            .stack
            .iter()
            .chain(self.heap.iter())
            .map(|c| 2 * (c.address.len() + c.content.len()) + 32)
            .sum();
        let rows: usize = self
            .registry
            .rows()
            .iter()
            .map(|r| r.fields.iter().map(String::len).sum::<usize>() + 24)
            .sum();
        let connectors = self.connectors.iter().map(|c| c.key.len() + 48).sum::<usize>();
        let notes = self.notes.values().map(|n| n.text.len() + 32).sum::<usize>();

        std::mem::size_of::<Self>()
            + cells
            + rows
            + connectors
            + notes
            + self.caption.len()
            + self.visible.len() * 24
            + self.markers.len() * 32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SceneState {
        SceneState::new(&SceneConfig::default())
    }

    #[test]
    fn test_only_narration_is_visible_initially() {
        let state = state();
        assert!(state.is_panel_visible(PanelId::Narration));
        assert!(!state.is_panel_visible(PanelId::Code));
        assert_eq!(state.phase, Phase::Idle);
    }

    #[test]
    fn test_focus_moves_an_existing_marker() {
        let mut state = state();
        for line in [1, 2] {
            state
                .apply(&Mutation::Focus {
                    slot: MarkerSlot::CodeFocus,
                    target: ElementId::CodeLine(line),
                    tone: Tone::Accent,
                })
                .unwrap();
        }
        assert_eq!(
            state.marker(MarkerSlot::CodeFocus).map(|m| m.target),
            Some(ElementId::CodeLine(2))
        );
        assert_eq!(state.markers().count(), 1);
    }

    #[test]
    fn test_optional_cleanup_tolerates_absence() {
        let mut state = state();
        let optional = [
            Mutation::Unfocus {
                slot: MarkerSlot::Lock,
                optional: true,
            },
            Mutation::Disconnect {
                key: "missing".into(),
                optional: true,
            },
            Mutation::HideNote {
                slot: NoteSlot::Crash,
                optional: true,
            },
        ];
        for mutation in &optional {
            assert!(state.apply(mutation).is_ok());
        }

        let required = Mutation::Unfocus {
            slot: MarkerSlot::Lock,
            optional: false,
        };
        assert!(matches!(
            state.apply(&required),
            Err(SceneError::MissingMarker(MarkerSlot::Lock))
        ));
    }

    #[test]
    fn test_set_then_restore_cell() {
        let mut state = state();
        let cell = CellRef::heap(2);
        state
            .apply(&Mutation::SetCell {
                cell,
                text: "42".into(),
                tone: Tone::Accent,
            })
            .unwrap();
        assert_eq!(state.cell(cell).unwrap().content, "42");

        state.apply(&Mutation::RestoreCell(cell)).unwrap();
        assert_eq!(state.cell(cell).unwrap().content, "[used 0 bytes]");
        assert!(state.cell(cell).unwrap().is_pristine());
    }

    #[test]
    fn test_rows_are_tracked_by_key() {
        let mut state = state();
        state
            .apply(&Mutation::AppendRow {
                key: "block".into(),
                fields: vec!["PID 1".into(), "[a - b)".into(), "Reserved".into()],
            })
            .unwrap();
        assert_eq!(state.registry().len(), 1);

        state
            .apply(&Mutation::RemoveRow {
                key: "block".into(),
            })
            .unwrap();
        assert!(state.registry().is_empty());
        assert!(matches!(
            state.apply(&Mutation::RemoveRow {
                key: "block".into()
            }),
            Err(SceneError::UnknownRowKey(_))
        ));
    }

    #[test]
    fn test_connect_replaces_same_key() {
        let mut state = state();
        for to in [ElementId::Api(0), ElementId::Api(2)] {
            state
                .apply(&Mutation::Connect {
                    key: "call".into(),
                    from: ElementId::FunctionCall,
                    to,
                    tone: Tone::Accent,
                })
                .unwrap();
        }
        assert_eq!(state.connectors().len(), 1);
        assert_eq!(state.connectors()[0].to, ElementId::Api(2));
    }
}
