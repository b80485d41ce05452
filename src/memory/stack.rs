//! Stack fixture
//!
//! The stack panel shows a handful of fixed slots below `main()`. One of them
//! is the pointer variable that receives the allocated address and is reset to
//! its placeholder when the process goes away.

use super::MemoryCell;
use crate::scene::constants::{STACK_POINTER_NAME, STACK_TOP};
use serde::{Deserialize, Serialize};

/// Hardcoded stack contents for a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackFixture {
    /// `(address, content)` pairs from the highest address down
    pub cells: Vec<(String, String)>,
    /// Index of the slot that holds the pointer variable
    pub pointer_index: usize,
    /// Variable name shown when the slot is filled
    pub pointer_name: String,
}

impl StackFixture {
    pub fn cells(&self) -> Vec<MemoryCell> {
        self.cells
            .iter()
            .map(|(address, content)| MemoryCell::new(address.as_str(), content.as_str()))
            .collect()
    }

    /// Label of the pointer slot once it holds `address`
    pub fn pointer_label(&self, address: &str) -> String {
        format!("{}={}", self.pointer_name, address)
    }
}

impl Default for StackFixture {
    fn default() -> Self {
        let contents = ["main()", "0x00000000", "0xdddddddd", "0xffffffff", "0x00000000"];
        let cells = contents
            .iter()
            .enumerate()
            .map(|(i, content)| {
                let address = STACK_TOP - 4 * i as u64;
                (format!("0x{:08x}", address), content.to_string())
            })
            .collect();

        StackFixture {
            cells,
            pointer_index: 1,
            pointer_name: STACK_POINTER_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack_addresses_descend() {
        let fixture = StackFixture::default();
        let addresses: Vec<&str> = fixture.cells.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(
            addresses,
            vec!["0x7ffd1234", "0x7ffd1230", "0x7ffd122c", "0x7ffd1228", "0x7ffd1224"]
        );
        assert_eq!(fixture.cells[fixture.pointer_index].1, "0x00000000");
    }

    #[test]
    fn test_pointer_label() {
        let fixture = StackFixture::default();
        assert_eq!(fixture.pointer_label("0x55a13000"), "ptr=0x55a13000");
    }
}
