//! Scene model: configuration, layout, state and the scripted timeline
//!
//! A [`Scene`] is built in three stages:
//!
//! ```text
//! SceneConfig → build_layout → SceneLayout
//!             → run_search   → SearchOutcome
//!             → script::compose → Timeline (validated against the layout)
//! ```
//!
//! Playing the timeline with a [`Player`] threads a single [`SceneState`]
//! through every step and records a snapshot after each beat.
//!
//! - [`config`]: scene variants as data (registry schema, termination mode, scale)
//! - [`layout`]: panel geometry and stable element identifiers
//! - [`phase`]: the linear phase machine
//! - [`state`]: everything that changes while the scene plays
//! - [`script`]: the hand-authored beats
//!
//! [`Player`]: crate::timeline::player::Player

pub mod config;
pub mod constants;
pub mod layout;
pub mod phase;
pub mod script;
pub mod state;

use crate::errors::Result;
use crate::memory::search::{run_search, SearchOutcome};
use crate::memory::CellRef;
use crate::memory::Region;
use crate::timeline::player::Player;
use crate::timeline::Timeline;
use config::SceneConfig;
use layout::{build_layout, PanelId, SceneLayout};
use state::SceneState;

/// Stable identifier of anything a step can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Panel(PanelId),
    CodeLine(usize),
    DisasmLine(usize),
    Api(usize),
    StackCell(usize),
    HeapCell(usize),
    FunctionCall,
    Clock,
    PageInfo,
    RegistryTable,
}

impl From<CellRef> for ElementId {
    fn from(cell: CellRef) -> Self {
        match cell.region {
            Region::Stack => ElementId::StackCell(cell.index),
            Region::Heap => ElementId::HeapCell(cell.index),
        }
    }
}

/// Semantic color of a label, marker or connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Normal,
    Muted,
    /// Current focus (yellow in the default theme)
    Accent,
    Success,
    Error,
    Warning,
    Info,
}

/// A fully built, validated scene
#[derive(Debug, Clone)]
pub struct Scene {
    pub config: SceneConfig,
    pub layout: SceneLayout,
    pub timeline: Timeline,
    pub search: SearchOutcome,
}

impl Scene {
    pub fn build(config: SceneConfig) -> Result<Self> {
        config.heap.validate()?;
        let layout = build_layout(&config)?;
        let search = run_search(&config.heap.cells(), &config.search)?;
        let steps = script::compose(&config, &search);
        let timeline = Timeline::new(steps, &layout)?;

        log::info!(
            "built scene '{}': {} panels, {} steps in {} beats, block {} reserved",
            config.title,
            layout.panels().len(),
            timeline.len(),
            timeline.beat_count(),
            search.accepted
        );

        Ok(Scene {
            config,
            layout,
            timeline,
            search,
        })
    }

    pub fn initial_state(&self) -> SceneState {
        SceneState::new(&self.config)
    }

    /// Play the whole timeline and return a player rewound to the start
    pub fn player(&self, snapshot_limit: usize) -> Result<Player> {
        let mut player = Player::new(self.timeline.clone(), self.initial_state(), snapshot_limit);
        player.run()?;
        Ok(player)
    }
}
