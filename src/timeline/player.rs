//! Timeline player
//!
//! Applies beats in order to a single [`SceneState`] and records a snapshot
//! before the first beat and after every beat. Once [`Player::run`] has
//! finished, navigation only moves between recorded snapshots.

use super::Timeline;
use crate::errors::{Result, SceneError};
use crate::scene::state::SceneState;
use crate::snapshot::{Snapshot, SnapshotManager};
use std::time::Duration;

pub struct Player {
    timeline: Timeline,

    /// State shown at `history_position`
    state: SceneState,

    /// Snapshot history for backward playback
    snapshot_manager: SnapshotManager,

    /// Index into the snapshot history
    history_position: usize,

    /// Scene time of the state being built during `run`
    elapsed: Duration,
}

impl Player {
    pub fn new(timeline: Timeline, initial_state: SceneState, snapshot_limit: usize) -> Self {
        Player {
            timeline,
            state: initial_state,
            snapshot_manager: SnapshotManager::new(snapshot_limit),
            history_position: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Play the whole timeline, then rewind to the first snapshot
    pub fn run(&mut self) -> Result<()> {
        if !self.snapshot_manager.is_empty() {
            return Err(SceneError::History("timeline has already been played".to_string()));
        }

        self.take_snapshot(None)?;

        for beat in 0..self.timeline.beat_count() {
            self.state.begin_beat();
            if let Some(steps) = self.timeline.beat(beat) {
                for step in steps {
                    log::trace!("beat {}: {:?}", beat, step.mutation);
                    self.state.apply(&step.mutation)?;
                }
            }
            self.elapsed += self.timeline.beat_duration(beat);
            self.take_snapshot(Some(beat))?;
        }

        log::debug!(
            "recorded {} snapshots ({} bytes of {})",
            self.snapshot_manager.len(),
            self.snapshot_manager.memory_usage(),
            self.snapshot_manager.memory_limit()
        );

        self.rewind_to_start()
    }

    fn take_snapshot(&mut self, beat: Option<usize>) -> Result<()> {
        self.snapshot_manager.push(Snapshot {
            state: self.state.clone(),
            beat,
            elapsed: self.elapsed,
        })?;
        self.history_position = self.snapshot_manager.len() - 1;
        Ok(())
    }

    fn restore(&mut self, position: usize) -> Result<()> {
        let snapshot = self
            .snapshot_manager
            .get(position)
            .ok_or_else(|| SceneError::History(format!("snapshot {} not found", position)))?;
        self.state = snapshot.state.clone();
        self.history_position = position;
        Ok(())
    }

    /// Move to the state after the next beat
    pub fn step_forward(&mut self) -> Result<()> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(SceneError::History("already at the end of the scene".to_string()));
        }
        self.restore(self.history_position + 1)
    }

    /// Move to the state before the current beat
    pub fn step_backward(&mut self) -> Result<()> {
        if self.history_position == 0 {
            return Err(SceneError::History("already at the start of the scene".to_string()));
        }
        self.restore(self.history_position - 1)
    }

    pub fn rewind_to_start(&mut self) -> Result<()> {
        if self.snapshot_manager.is_empty() {
            return Err(SceneError::History("no snapshots available".to_string()));
        }
        self.restore(0)
    }

    pub fn jump_to_end(&mut self) -> Result<()> {
        match self.snapshot_manager.len() {
            0 => Err(SceneError::History("no snapshots available".to_string())),
            len => self.restore(len - 1),
        }
    }

    // ========== Getter methods for UI ==========

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.history_position + 1 >= self.snapshot_manager.len()
    }

    pub fn snapshot(&self, position: usize) -> Option<&Snapshot> {
        self.snapshot_manager.get(position)
    }

    /// How long the beat leading out of `position` takes
    pub fn beat_duration(&self, position: usize) -> Duration {
        self.timeline.beat_duration(position)
    }

    /// Scene time at which the snapshot at `position` is reached
    pub fn elapsed(&self, position: usize) -> Duration {
        self.snapshot_manager
            .get(position)
            .map(|s| s.elapsed)
            .unwrap_or_default()
    }

    pub fn total_duration(&self) -> Duration {
        self.timeline.total_duration()
    }

    pub fn memory_usage(&self) -> usize {
        self.snapshot_manager.memory_usage()
    }
}
