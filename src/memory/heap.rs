//! Heap fixture
//!
//! Heap blocks are page-aligned regions starting at a fixed base address.
//! Each block carries a "bytes used" label that is purely decorative: the
//! search walk in [`super::search`] never reads it.

use super::MemoryCell;
use crate::errors::{Result, SceneError};
use crate::scene::constants::{HEAP_BASE_ADDRESS, PAGE_SIZE};
use serde::{Deserialize, Serialize};

pub type Address = u64;

/// Hardcoded heap contents for a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapFixture {
    pub base: Address,
    pub page_size: u64,
    /// Decorative "bytes used" label per block
    pub used_bytes: Vec<String>,
}

impl HeapFixture {
    pub fn len(&self) -> usize {
        self.used_bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_bytes.is_empty()
    }

    /// Blocks must have a size and the last one must end inside the address space
    pub fn validate(&self) -> Result<()> {
        let end = (self.len() as u64)
            .checked_mul(self.page_size)
            .and_then(|span| span.checked_add(self.base));
        match end {
            Some(_) if self.page_size > 0 => Ok(()),
            _ => Err(SceneError::InvalidHeap {
                base: self.base,
                page_size: self.page_size,
                len: self.len(),
            }),
        }
    }

    /// Start address of block `index`; only meaningful after [`validate`](Self::validate)
    pub fn block_address(&self, index: usize) -> Address {
        self.base.saturating_add((index as u64).saturating_mul(self.page_size))
    }

    /// Half-open `[start, end)` range covered by block `index`
    pub fn block_range(&self, index: usize) -> (Address, Address) {
        let start = self.block_address(index);
        (start, start.saturating_add(self.page_size))
    }

    pub fn address_label(&self, index: usize) -> String {
        format!("0x{:08x}", self.block_address(index))
    }

    pub fn cells(&self) -> Vec<MemoryCell> {
        self.used_bytes
            .iter()
            .enumerate()
            .map(|(i, used)| MemoryCell::new(self.address_label(i), used_label(used)))
            .collect()
    }
}

impl Default for HeapFixture {
    fn default() -> Self {
        HeapFixture {
            base: HEAP_BASE_ADDRESS,
            page_size: PAGE_SIZE,
            used_bytes: ["2048", "3072", "0", "1024", "4078"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Content label of a heap block
pub fn used_label(bytes: &str) -> String {
    format!("[used {} bytes]", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_ranges_are_page_aligned() {
        let heap = HeapFixture::default();
        assert_eq!(heap.block_range(0), (0x55a1_1000, 0x55a1_2000));
        assert_eq!(heap.block_range(2), (0x55a1_3000, 0x55a1_4000));
        assert_eq!(heap.address_label(4), "0x55a15000");
    }

    #[test]
    fn test_validate_rejects_unaddressable_blocks() {
        assert!(HeapFixture::default().validate().is_ok());

        let past_the_end = HeapFixture {
            base: u64::MAX - 0xfff,
            ..HeapFixture::default()
        };
        assert!(matches!(
            past_the_end.validate(),
            Err(SceneError::InvalidHeap { len: 5, .. })
        ));

        let empty_pages = HeapFixture {
            page_size: 0,
            ..HeapFixture::default()
        };
        assert!(empty_pages.validate().is_err());
    }

    #[test]
    fn test_cells_use_decorative_labels() {
        let cells = HeapFixture::default().cells();
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[2].content, "[used 0 bytes]");
        assert_eq!(cells[4].content, "[used 4078 bytes]");
    }
}
