//! Timeline steps
//!
//! A [`Step`] is one atomic visual change plus the time it takes on screen.
//! Steps flagged `concurrent_with_previous` join the beat started by the step
//! before them.

use crate::memory::CellRef;
use crate::scene::layout::PanelId;
use crate::scene::phase::Phase;
use crate::scene::state::{MarkerSlot, NoteSlot};
use crate::scene::{ElementId, Tone};
use std::time::Duration;

/// One visual change applied to the scene state
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    FadeIn(ElementId),
    FadeOut(ElementId),
    /// Create the marker in `slot`, or move it if it exists
    Focus {
        slot: MarkerSlot,
        target: ElementId,
        tone: Tone,
    },
    /// Remove a marker; `optional` turns a missing marker into a no-op
    Unfocus { slot: MarkerSlot, optional: bool },
    Connect {
        key: String,
        from: ElementId,
        to: ElementId,
        tone: Tone,
    },
    Disconnect { key: String, optional: bool },
    SetCell {
        cell: CellRef,
        text: String,
        tone: Tone,
    },
    /// Change a cell's tone without touching its label
    Retone { cell: CellRef, tone: Tone },
    /// Put a cell back to the label it was built with
    RestoreCell(CellRef),
    ShowNote {
        slot: NoteSlot,
        anchor: ElementId,
        text: String,
        tone: Tone,
    },
    HideNote { slot: NoteSlot, optional: bool },
    /// Show (or clear) the call in the C function box
    CallFunction(Option<String>),
    /// Briefly emphasise an element for the current beat
    Indicate(ElementId),
    TickClock,
    /// Append a registry row and bind its handle to `key`
    AppendRow { key: String, fields: Vec<String> },
    RemoveRow { key: String },
    /// Remove every row, as the OS does when the process goes away
    RemoveAllRows,
    Enter(Phase),
    Caption(String),
    Wait,
}

impl Mutation {
    /// Elements this mutation touches; all of them must exist in the layout
    pub fn targets(&self) -> Vec<ElementId> {
        match self {
            Mutation::FadeIn(element)
            | Mutation::FadeOut(element)
            | Mutation::Indicate(element) => vec![*element],
            Mutation::Focus { target, .. } => vec![*target],
            Mutation::Connect { from, to, .. } => vec![*from, *to],
            Mutation::SetCell { cell, .. }
            | Mutation::Retone { cell, .. }
            | Mutation::RestoreCell(cell) => vec![ElementId::from(*cell)],
            Mutation::ShowNote { anchor, .. } => vec![*anchor],
            Mutation::CallFunction(_) => vec![ElementId::FunctionCall],
            Mutation::TickClock => vec![ElementId::Clock],
            Mutation::AppendRow { .. }
            | Mutation::RemoveRow { .. }
            | Mutation::RemoveAllRows => {
                vec![ElementId::RegistryTable]
            }
            Mutation::Caption(_) => vec![ElementId::Panel(PanelId::Narration)],
            Mutation::Unfocus { .. }
            | Mutation::Disconnect { .. }
            | Mutation::HideNote { .. }
            | Mutation::Enter(_)
            | Mutation::Wait => Vec::new(),
        }
    }
}

/// `(targets, mutation, duration, concurrent_with_previous)`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub mutation: Mutation,
    pub duration: Duration,
    pub concurrent_with_previous: bool,
}

impl Step {
    pub fn new(mutation: Mutation, seconds: f32) -> Self {
        Step {
            mutation,
            duration: Duration::from_secs_f32(seconds),
            concurrent_with_previous: false,
        }
    }

    pub fn wait(seconds: f32) -> Self {
        Step::new(Mutation::Wait, seconds)
    }

    /// Run alongside the previous step
    pub fn concurrent(mut self) -> Self {
        self.concurrent_with_previous = true;
        self
    }

    pub fn targets(&self) -> Vec<ElementId> {
        self.mutation.targets()
    }
}
