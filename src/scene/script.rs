//! The hand-authored beats of a scene
//!
//! [`compose`] turns a config and a search outcome into the flat step list
//! the timeline driver validates and plays. The beats are:
//!
//! 1. intro: panels fade in one after another
//! 2. allocation (`new int`): OS call, heap search, registry row, pointer
//! 3. write (`*ptr = 42`) through the disassembly
//! 4. free and exit, or crash and OS cleanup, depending on [`TerminationMode`]

use super::config::{SceneConfig, TerminationMode};
use super::constants::RESERVED_STATE;
use super::layout::PanelId;
use super::phase::Phase;
use super::state::{MarkerSlot, NoteSlot};
use super::{ElementId, Tone};
use crate::memory::search::{SearchOutcome, Verdict};
use crate::memory::CellRef;
use crate::timeline::{Mutation, Step};

// Code lines of the demo program
const ALLOC_LINE: usize = 1;
const WRITE_LINE: usize = 2;
const FREE_LINE: usize = 3;
const EXIT_LINE: usize = 4;

// OS API entries
const VIRTUAL_ALLOC: usize = 0;
const HEAP_ALLOC: usize = 1;
const HEAP_FREE: usize = 2;
const VIRTUAL_FREE: usize = 3;

// Connector keys
const CODE_TO_FUNCTION: &str = "code-function";
const FUNCTION_TO_API: &str = "function-api";
const FLYING_ADDRESS: &str = "flying-address";
const API_RETURN: &str = "api-return";
const FUNCTION_RETURN: &str = "function-return";
const CODE_TO_DISASM: &str = "code-disasm";
const DISASM_TO_HEAP: &str = "disasm-heap";

const BLOCK_ROW: &str = "reserved-block";

const NO_SPACE: &str = "Insufficient free space!";

/// Step list builder
///
/// `then` starts a new beat, `with` joins the current one. A caption set with
/// `caption` rides along with the next step.
struct Script {
    steps: Vec<Step>,
    pending_caption: Option<String>,
}

impl Script {
    fn new() -> Self {
        Script {
            steps: Vec::new(),
            pending_caption: None,
        }
    }

    fn then(&mut self, mutation: Mutation, seconds: f32) -> &mut Self {
        self.steps.push(Step::new(mutation, seconds));
        if let Some(text) = self.pending_caption.take() {
            self.steps.push(Step::new(Mutation::Caption(text), 0.0).concurrent());
        }
        self
    }

    fn with(&mut self, mutation: Mutation, seconds: f32) -> &mut Self {
        self.steps.push(Step::new(mutation, seconds).concurrent());
        self
    }

    fn wait(&mut self, seconds: f32) -> &mut Self {
        self.then(Mutation::Wait, seconds)
    }

    fn caption(&mut self, text: impl Into<String>) -> &mut Self {
        self.pending_caption = Some(text.into());
        self
    }

    fn finish(self) -> Vec<Step> {
        self.steps
    }
}

fn focus(slot: MarkerSlot, target: ElementId, tone: Tone) -> Mutation {
    Mutation::Focus { slot, target, tone }
}

fn unfocus(slot: MarkerSlot) -> Mutation {
    Mutation::Unfocus {
        slot,
        optional: false,
    }
}

fn try_unfocus(slot: MarkerSlot) -> Mutation {
    Mutation::Unfocus {
        slot,
        optional: true,
    }
}

fn connect(key: &str, from: ElementId, to: ElementId, tone: Tone) -> Mutation {
    Mutation::Connect {
        key: key.to_string(),
        from,
        to,
        tone,
    }
}

fn disconnect(key: &str) -> Mutation {
    Mutation::Disconnect {
        key: key.to_string(),
        optional: false,
    }
}

fn try_disconnect(key: &str) -> Mutation {
    Mutation::Disconnect {
        key: key.to_string(),
        optional: true,
    }
}

fn note(slot: NoteSlot, anchor: ElementId, text: &str, tone: Tone) -> Mutation {
    Mutation::ShowNote {
        slot,
        anchor,
        text: text.to_string(),
        tone,
    }
}

fn hide(slot: NoteSlot) -> Mutation {
    Mutation::HideNote {
        slot,
        optional: false,
    }
}

fn try_hide(slot: NoteSlot) -> Mutation {
    Mutation::HideNote {
        slot,
        optional: true,
    }
}

fn call(name: &str) -> Mutation {
    Mutation::CallFunction(Some(name.to_string()))
}

/// Build the full step list for a scene
pub fn compose(config: &SceneConfig, search: &SearchOutcome) -> Vec<Step> {
    let mut script = Script::new();
    let block = search.accepted;

    intro(&mut script, config);
    allocation(&mut script, config, search);
    write(&mut script, config, block);
    match config.termination {
        TerminationMode::ExitProcess => exit_process(&mut script, config, block),
        TerminationMode::TerminateProcess => terminate_process(&mut script, config, block),
    }

    script.finish()
}

fn intro(script: &mut Script, config: &SceneConfig) {
    let panels = [
        PanelId::Code,
        PanelId::Os,
        PanelId::Registry,
        PanelId::Stack,
        PanelId::Heap,
        PanelId::Disassembly,
    ];

    script
        .caption(format!("{} starts; its code and memory appear", config.process_label()))
        .then(Mutation::FadeIn(ElementId::Panel(panels[0])), 1.0);
    for (lag, panel) in panels.iter().enumerate().skip(1) {
        script.with(
            Mutation::FadeIn(ElementId::Panel(*panel)),
            1.0 + 0.4 * lag as f32,
        );
    }
    script.wait(1.0);
}

fn allocation(script: &mut Script, config: &SceneConfig, search: &SearchOutcome) {
    let line = ElementId::CodeLine(ALLOC_LINE);
    let api = ElementId::Api(VIRTUAL_ALLOC);
    let function = ElementId::FunctionCall;

    script
        .caption("`new int` asks the C runtime for memory")
        .then(focus(MarkerSlot::CodeFocus, line, Tone::Accent), 0.5)
        .with(Mutation::Enter(Phase::CodeHighlighted(ALLOC_LINE)), 0.0)
        .then(Mutation::FadeIn(ElementId::Panel(PanelId::Function)), 1.0)
        .with(call("malloc()"), 1.0)
        .then(connect(CODE_TO_FUNCTION, line, function, Tone::Accent), 0.5)
        .caption("The runtime asks the operating system for a region")
        .then(connect(FUNCTION_TO_API, function, api, Tone::Accent), 1.0)
        .then(focus(MarkerSlot::ApiFocus, api, Tone::Accent), 1.0)
        .with(Mutation::Enter(Phase::ApiInvoked), 0.0)
        .then(
            focus(MarkerSlot::SearchPointer, ElementId::HeapCell(0), Tone::Accent),
            0.5,
        )
        .then(disconnect(CODE_TO_FUNCTION), 0.5)
        .with(disconnect(FUNCTION_TO_API), 0.5);

    script.caption("The heap is searched for a block with enough free space");
    for &(index, verdict) in &search.visited {
        let cell = ElementId::HeapCell(index);
        script
            .then(focus(MarkerSlot::SearchPointer, cell, Tone::Accent), 0.8)
            .with(Mutation::Enter(Phase::SearchingBlock(index)), 0.0)
            .with(Mutation::TickClock, 0.8);

        match verdict {
            Verdict::Rejected => {
                script
                    .then(focus(MarkerSlot::BlockOutline, cell, Tone::Error), 0.8)
                    .with(note(NoteSlot::SearchVerdict, cell, NO_SPACE, Tone::Error), 0.8)
                    .wait(0.5)
                    .then(unfocus(MarkerSlot::BlockOutline), 0.3)
                    .with(hide(NoteSlot::SearchVerdict), 0.3);
            }
            Verdict::Accepted => {
                script
                    .caption("A free block is found and reserved")
                    .then(focus(MarkerSlot::BlockOutline, cell, Tone::Success), 1.0)
                    .with(note(NoteSlot::Reserved, cell, "Block reserved", Tone::Success), 1.0)
                    .with(Mutation::Enter(Phase::BlockReserved), 0.0)
                    .with(Mutation::Indicate(ElementId::PageInfo), 1.0)
                    .wait(1.0);
            }
        }
    }

    let block = search.accepted;
    let cell = ElementId::HeapCell(block);
    let (start, end) = config.heap.block_range(block);
    let address = config.heap.address_label(block);
    let pointer = CellRef::stack(config.stack.pointer_index);

    script
        .then(unfocus(MarkerSlot::SearchPointer), 0.3)
        .with(focus(MarkerSlot::Lock, cell, Tone::Warning), 0.3)
        .caption("The OS records the reserved range in its registry")
        .then(
            Mutation::AppendRow {
                key: BLOCK_ROW.to_string(),
                fields: config.registry_schema.record(
                    &config.process.pid,
                    start,
                    end,
                    RESERVED_STATE,
                ),
            },
            0.6,
        )
        .with(Mutation::Indicate(ElementId::RegistryTable), 0.6)
        .caption(format!("The address {} travels back to the program", address))
        .then(connect(FLYING_ADDRESS, cell, api, Tone::Accent), 1.4)
        .with(Mutation::Indicate(cell), 0.6)
        .wait(0.3)
        .then(connect(API_RETURN, api, function, Tone::Success), 0.5)
        .then(connect(FUNCTION_RETURN, function, line, Tone::Success), 0.5)
        .then(
            Mutation::SetCell {
                cell: pointer,
                text: config.stack.pointer_label(&address),
                tone: Tone::Accent,
            },
            1.0,
        )
        .with(Mutation::Indicate(ElementId::from(pointer)), 1.0)
        .wait(1.0)
        .then(disconnect(FLYING_ADDRESS), 0.5)
        .with(disconnect(API_RETURN), 0.5)
        .with(disconnect(FUNCTION_RETURN), 0.5)
        .with(Mutation::CallFunction(None), 0.5)
        .with(unfocus(MarkerSlot::ApiFocus), 0.5);
}

fn write(script: &mut Script, config: &SceneConfig, block: usize) {
    let line = ElementId::CodeLine(WRITE_LINE);
    let cell = ElementId::HeapCell(block);

    script
        .caption(format!("`*ptr = {}` writes through the pointer", config.written_value))
        .then(focus(MarkerSlot::CodeFocus, line, Tone::Accent), 1.0)
        .with(focus(MarkerSlot::ApiFocus, ElementId::Api(HEAP_ALLOC), Tone::Accent), 1.0)
        .wait(0.5)
        .then(
            connect(CODE_TO_DISASM, line, ElementId::DisasmLine(0), Tone::Accent),
            1.0,
        )
        .with(Mutation::Indicate(ElementId::DisasmLine(0)), 1.0)
        .wait(0.5)
        .then(
            connect(DISASM_TO_HEAP, ElementId::DisasmLine(1), cell, Tone::Accent),
            1.0,
        )
        .with(Mutation::Indicate(ElementId::DisasmLine(1)), 1.0)
        .then(
            Mutation::SetCell {
                cell: CellRef::heap(block),
                text: config.written_value.clone(),
                tone: Tone::Accent,
            },
            1.0,
        )
        .with(Mutation::Enter(Phase::ValueWritten), 0.0)
        .wait(1.0)
        .then(disconnect(CODE_TO_DISASM), 0.5)
        .with(disconnect(DISASM_TO_HEAP), 0.5);
}

fn exit_process(script: &mut Script, config: &SceneConfig, block: usize) {
    let line = ElementId::CodeLine(FREE_LINE);
    let cell = ElementId::HeapCell(block);
    let function = ElementId::FunctionCall;
    let heap_free = ElementId::Api(HEAP_FREE);
    let pointer = CellRef::stack(config.stack.pointer_index);

    script
        .caption("`delete ptr` hands the block back")
        .then(focus(MarkerSlot::CodeFocus, line, Tone::Accent), 1.0)
        .with(call("free()"), 1.0)
        .then(connect(CODE_TO_FUNCTION, line, function, Tone::Error), 0.5)
        .then(connect(FUNCTION_TO_API, function, heap_free, Tone::Error), 0.5)
        .with(focus(MarkerSlot::ApiFocus, heap_free, Tone::Error), 0.5)
        .then(Mutation::RestoreCell(CellRef::heap(block)), 0.7)
        .with(hide(NoteSlot::Reserved), 0.3)
        .with(unfocus(MarkerSlot::BlockOutline), 0.3)
        .with(note(NoteSlot::Freed, cell, "Memory freed", Tone::Info), 0.7)
        .with(Mutation::Enter(Phase::BlockFreed), 0.0)
        .wait(1.0)
        .then(hide(NoteSlot::Freed), 0.3)
        .with(disconnect(CODE_TO_FUNCTION), 0.3)
        .with(disconnect(FUNCTION_TO_API), 0.3)
        .with(Mutation::CallFunction(None), 0.3);

    script
        .caption("`main()` returns and the process releases its address space")
        .then(
            focus(MarkerSlot::CodeFocus, ElementId::CodeLine(EXIT_LINE), Tone::Accent),
            1.0,
        )
        .with(
            focus(MarkerSlot::ApiFocus, ElementId::Api(VIRTUAL_FREE), Tone::Error),
            1.0,
        )
        .then(try_unfocus(MarkerSlot::Lock), 0.3)
        .with(try_unfocus(MarkerSlot::BlockOutline), 0.3)
        .with(try_hide(NoteSlot::SearchVerdict), 0.3)
        .with(try_disconnect(FLYING_ADDRESS), 0.3)
        .then(
            Mutation::RemoveRow {
                key: BLOCK_ROW.to_string(),
            },
            0.4,
        )
        .with(Mutation::Indicate(ElementId::RegistryTable), 0.6)
        .then(Mutation::RemoveAllRows, 0.4)
        .with(Mutation::RestoreCell(pointer), 0.7)
        .then(
            note(
                NoteSlot::Termination,
                ElementId::RegistryTable,
                "ExitProcess: address space released",
                Tone::Info,
            ),
            0.8,
        )
        .with(Mutation::Enter(Phase::ProcessTerminated), 0.0)
        .then(unfocus(MarkerSlot::CodeFocus), 0.5)
        .with(unfocus(MarkerSlot::ApiFocus), 0.5)
        .wait(1.0);
}

fn terminate_process(script: &mut Script, config: &SceneConfig, block: usize) {
    let pointer = CellRef::stack(config.stack.pointer_index);
    let narration = ElementId::Panel(PanelId::Narration);

    script
        .caption("The process crashes before it can free anything")
        .then(
            note(NoteSlot::Crash, narration, "Process terminated abnormally", Tone::Error),
            0.5,
        )
        .wait(0.8);

    // Nothing is guaranteed to be on screen when a process dies.
    script
        .then(try_unfocus(MarkerSlot::CodeFocus), 0.4)
        .with(try_unfocus(MarkerSlot::ApiFocus), 0.4)
        .with(try_unfocus(MarkerSlot::SearchPointer), 0.4)
        .with(try_disconnect(CODE_TO_DISASM), 0.4)
        .with(try_disconnect(DISASM_TO_HEAP), 0.4)
        .with(try_disconnect(CODE_TO_FUNCTION), 0.4)
        .with(try_disconnect(FUNCTION_TO_API), 0.4)
        .with(try_hide(NoteSlot::SearchVerdict), 0.4)
        .with(Mutation::CallFunction(None), 0.4)
        .then(
            Mutation::Retone {
                cell: pointer,
                tone: Tone::Muted,
            },
            0.2,
        )
        .then(Mutation::FadeOut(ElementId::Panel(PanelId::Code)), 0.9)
        .with(Mutation::FadeOut(ElementId::Panel(PanelId::Disassembly)), 0.9)
        .caption("The OS walks its registry and reclaims every region the process owned")
        .then(Mutation::Indicate(ElementId::RegistryTable), 0.6)
        .then(Mutation::RestoreCell(CellRef::heap(block)), 0.7)
        .with(Mutation::Enter(Phase::BlockFreed), 0.0)
        .then(try_hide(NoteSlot::Reserved), 0.3)
        .then(try_unfocus(MarkerSlot::BlockOutline), 0.3)
        .then(try_unfocus(MarkerSlot::Lock), 0.3)
        .then(Mutation::RemoveAllRows, 0.4)
        .with(Mutation::RestoreCell(pointer), 0.4)
        .then(
            note(
                NoteSlot::Termination,
                ElementId::RegistryTable,
                "TerminateProcess: the OS reclaims the VAD entries",
                Tone::Warning,
            ),
            0.8,
        )
        .with(Mutation::Enter(Phase::ProcessTerminated), 0.0)
        .then(hide(NoteSlot::Crash), 0.3)
        .wait(1.0);
}
