//! Error types for scene construction and playback
//!
//! Every failure in this crate is a construction failure: a scene either builds
//! and plays to the end, or it is rejected before the first frame is shown.

use crate::scene::layout::PanelId;
use crate::scene::phase::Phase;
use crate::scene::state::{MarkerSlot, NoteSlot};
use crate::scene::ElementId;

/// Errors raised while building or playing a scene
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("panels {first:?} and {second:?} overlap")]
    PanelOverlap { first: PanelId, second: PanelId },

    #[error("invalid scale factor {value} for {group}")]
    InvalidScale { group: &'static str, value: f32 },

    #[error("step targets unknown element {0:?}")]
    UnknownElement(ElementId),

    #[error("the first step of a timeline cannot run concurrently with a previous one")]
    FirstStepConcurrent,

    #[error("registry row has {got} field(s), schema has {expected} column(s)")]
    RegistryFieldCount { expected: usize, got: usize },

    #[error("no registry row is bound to key '{0}'")]
    UnknownRowKey(String),

    #[error("registry row handle {0} does not exist")]
    UnknownRowHandle(u32),

    #[error("heap at {base:#x} with {len} block(s) of {page_size:#x} bytes is not addressable")]
    InvalidHeap { base: u64, page_size: u64, len: usize },

    #[error("panel {0:?} extends past the canvas")]
    PanelOutOfBounds(PanelId),

    #[error("search fixture names heap index {index}, heap has {len} cell(s)")]
    SearchIndexOutOfRange { index: usize, len: usize },

    #[error("search walked {visited} heap cell(s) without accepting one")]
    NoBlockAccepted { visited: usize },

    #[error("cannot move from phase {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },

    #[error("no marker in slot {0:?}")]
    MissingMarker(MarkerSlot),

    #[error("no connector with key '{0}'")]
    MissingConnector(String),

    #[error("no note in slot {0:?}")]
    MissingNote(NoteSlot),

    #[error("snapshot memory limit exceeded: {current} bytes used, limit is {limit}")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    #[error("history: {0}")]
    History(String),

    #[error("invalid scene configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SceneError>;
