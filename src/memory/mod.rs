//! Memory cells shown in the stack and heap panels
//!
//! This module provides the presentational memory model:
//! - [`stack`]: the stack fixture (address/content pairs and the pointer slot)
//! - [`heap`]: the heap fixture (page-aligned blocks with decorative usage labels)
//! - [`search`]: the scripted "find a free block" walk over the heap
//!
//! A [`MemoryCell`] never holds real data. Its content label is swapped by the
//! timeline to depict allocation, writes and frees, and the label it was built
//! with is kept so the cell can be restored to its placeholder.

pub mod heap;
pub mod search;
pub mod stack;

use crate::scene::Tone;
use serde::{Deserialize, Serialize};

/// A row of the stack or heap panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCell {
    pub address: String,
    pub content: String,
    pub tone: Tone,
    initial_content: String,
}

impl MemoryCell {
    pub fn new(address: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        MemoryCell {
            address: address.into(),
            initial_content: content.clone(),
            content,
            tone: Tone::Muted,
        }
    }

    /// Swap the content label
    pub fn set(&mut self, content: impl Into<String>, tone: Tone) {
        self.content = content.into();
        self.tone = tone;
    }

    /// Revert to the label the cell was built with
    pub fn restore(&mut self) {
        self.content = self.initial_content.clone();
        self.tone = Tone::Muted;
    }

    pub fn is_pristine(&self) -> bool {
        self.content == self.initial_content
    }
}

/// Which memory panel a cell lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Stack,
    Heap,
}

/// Reference to a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub region: Region,
    pub index: usize,
}

impl CellRef {
    pub fn stack(index: usize) -> Self {
        CellRef {
            region: Region::Stack,
            index,
        }
    }

    pub fn heap(index: usize) -> Self {
        CellRef {
            region: Region::Heap,
            index,
        }
    }
}
