//! # Introduction
//!
//! vmscene plays short animated scenes that explain virtual memory: how
//! `new int` becomes an OS call, how the heap is searched for a free block,
//! how the OS records the reserved range, and what happens to it when the
//! process exits or crashes. Each scene is a fixed, hand-authored timeline
//! played back through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui), with full backward navigation.
//!
//! ## Pipeline
//!
//! ```text
//! SceneConfig → Layout → Search → Script → Timeline → Player → Snapshots → TUI / frames
//! ```
//!
//! 1. [`scene`]: configuration presets, panel layout, phase machine, scene
//!    state and the scripted beats.
//! 2. [`memory`]: stack and heap fixtures and the scripted block search.
//! 3. [`registry`]: the OS memory-region registry table.
//! 4. [`timeline`]: steps grouped into beats and the [`timeline::player::Player`]
//!    that applies them.
//! 5. [`snapshot`]: bounded history of scene states, one per beat.
//! 6. [`ui`]: ratatui panes and the interactive player.
//! 7. [`render`]: headless frame output.

pub mod errors;
pub mod memory;
pub mod registry;
pub mod render;
pub mod scene;
pub mod snapshot;
pub mod timeline;
pub mod ui;
