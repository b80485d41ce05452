//! The per-scene phase machine
//!
//! ```text
//! Idle → CodeHighlighted(line) → ApiInvoked → SearchingBlock(0) → … → SearchingBlock(k)
//!      → BlockReserved → ValueWritten → BlockFreed → ProcessTerminated
//! ```
//!
//! Transitions are strictly linear. The only repeated phase is
//! `SearchingBlock`, whose index must grow by one each time.

use crate::errors::{Result, SceneError};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Zero-based code line index
    CodeHighlighted(usize),
    ApiInvoked,
    /// Zero-based heap cell index
    SearchingBlock(usize),
    BlockReserved,
    ValueWritten,
    BlockFreed,
    ProcessTerminated,
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        match (self, next) {
            (Idle, CodeHighlighted(_)) => true,
            (CodeHighlighted(_), ApiInvoked) => true,
            (ApiInvoked, SearchingBlock(0)) => true,
            (SearchingBlock(current), SearchingBlock(candidate)) => candidate == current + 1,
            (SearchingBlock(_), BlockReserved) => true,
            (BlockReserved, ValueWritten) => true,
            (ValueWritten, BlockFreed) => true,
            (BlockFreed, ProcessTerminated) => true,
            _ => false,
        }
    }

    pub fn advance(self, next: Phase) -> Result<Phase> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(SceneError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::ProcessTerminated
    }

    /// Short label for the status bar
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::CodeHighlighted(_) => "CODE",
            Phase::ApiInvoked => "API",
            Phase::SearchingBlock(_) => "SEARCH",
            Phase::BlockReserved => "RESERVED",
            Phase::ValueWritten => "WRITTEN",
            Phase::BlockFreed => "FREED",
            Phase::ProcessTerminated => "TERMINATED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::CodeHighlighted(line) => write!(f, "code line {} highlighted", line + 1),
            Phase::ApiInvoked => write!(f, "API invoked"),
            Phase::SearchingBlock(index) => write!(f, "searching heap block {}", index),
            Phase::BlockReserved => write!(f, "block reserved"),
            Phase::ValueWritten => write!(f, "value written"),
            Phase::BlockFreed => write!(f, "block freed"),
            Phase::ProcessTerminated => write!(f, "process terminated"),
        }
    }
}
