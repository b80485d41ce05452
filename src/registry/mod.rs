//! OS virtual-memory registry emulator
//!
//! A decorative table standing in for the kernel's record of reserved regions
//! (VAD tree on Windows, `vm_area_struct` on Linux, `vm_map_entry` on macOS).
//! Rows are appended below existing rows at a fixed row height and removed
//! wholesale. Column fractions are fixed when the table is created.
//!
//! The table has no capacity limit. Rows past what the panel can show are
//! reported by [`Registry::overflow`] so the renderer can summarise them.

use crate::errors::{Result, SceneError};
use crate::memory::heap::Address;
use crate::scene::constants::{PAGE_SHIFT, REGISTRY_FIRST_ROW_Y, REGISTRY_ROW_HEIGHT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which set of columns the registry panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrySchema {
    /// Process | Range | State
    Legacy,
    /// Windows VAD-style: Process | Start VPN | End VPN | Protect | Type
    Vad,
}

/// A fixed column: title and fraction of the table width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub title: &'static str,
    pub fraction: f32,
}

impl Column {
    const fn new(title: &'static str, fraction: f32) -> Self {
        Column { title, fraction }
    }
}

const LEGACY_COLUMNS: [Column; 3] = [
    Column::new("Process", 0.34),
    Column::new("Range", 0.43),
    Column::new("State", 0.23),
];

const VAD_COLUMNS: [Column; 5] = [
    Column::new("Process", 0.20),
    Column::new("Start VPN", 0.22),
    Column::new("End VPN", 0.22),
    Column::new("Protect", 0.18),
    Column::new("Type", 0.18),
];

impl RegistrySchema {
    pub fn columns(self) -> &'static [Column] {
        match self {
            RegistrySchema::Legacy => &LEGACY_COLUMNS,
            RegistrySchema::Vad => &VAD_COLUMNS,
        }
    }

    /// Row fields describing the region `[start, end)` owned by `process`
    pub fn record(self, process: &str, start: Address, end: Address, state: &str) -> Vec<String> {
        match self {
            RegistrySchema::Legacy => vec![
                process.to_string(),
                format!("[0x{:08x} - 0x{:08x})", start, end),
                state.to_string(),
            ],
            RegistrySchema::Vad => vec![
                process.to_string(),
                format!("0x{:x}", start >> PAGE_SHIFT),
                format!("0x{:x}", end.saturating_sub(1) >> PAGE_SHIFT),
                "RW".to_string(),
                "Private".to_string(),
            ],
        }
    }

    /// Footnote naming the real kernel structures
    pub fn footnote(self) -> &'static str {
        match self {
            RegistrySchema::Legacy => "Windows: VAD | Linux: vm_area_struct | macOS: vm_map_entry",
            RegistrySchema::Vad => "Windows VAD tree node (_MMVAD_SHORT)",
        }
    }
}

/// Opaque handle to an appended row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle(u32);

impl fmt::Display for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One memory-region record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRow {
    pub handle: RowHandle,
    pub fields: Vec<String>,
}

/// The registry table
#[derive(Debug, Clone)]
pub struct Registry {
    schema: RegistrySchema,
    rows: Vec<RegistryRow>,
    next_handle: u32,
}

impl Registry {
    pub fn new(schema: RegistrySchema) -> Self {
        Registry {
            schema,
            rows: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn schema(&self) -> RegistrySchema {
        self.schema
    }

    pub fn columns(&self) -> &'static [Column] {
        self.schema.columns()
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Append a row below the existing ones
    pub fn append_row(&mut self, fields: Vec<String>) -> Result<RowHandle> {
        if fields.len() != self.column_count() {
            return Err(SceneError::RegistryFieldCount {
                expected: self.column_count(),
                got: fields.len(),
            });
        }

        let handle = RowHandle(self.next_handle);
        self.next_handle += 1;
        self.rows.push(RegistryRow { handle, fields });
        Ok(handle)
    }

    /// Delete a row; rows below it move up
    pub fn remove_row(&mut self, handle: RowHandle) -> Result<Vec<String>> {
        let position = self
            .rows
            .iter()
            .position(|row| row.handle == handle)
            .ok_or(SceneError::UnknownRowHandle(handle.0))?;
        Ok(self.rows.remove(position).fields)
    }

    pub fn rows(&self) -> &[RegistryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Vertical offset of row `index` from the panel top, in canvas units
    pub fn row_offset(index: usize) -> f32 {
        REGISTRY_FIRST_ROW_Y + REGISTRY_ROW_HEIGHT * index as f32
    }

    /// Split `total` cells of width between the columns.
    ///
    /// Every column gets the floor of its fraction; the last column absorbs
    /// the rounding remainder so the widths always sum to `total`.
    pub fn column_widths(&self, total: u16) -> Vec<u16> {
        let columns = self.columns();
        let mut widths: Vec<u16> = columns
            .iter()
            .map(|c| (c.fraction * total as f32).floor() as u16)
            .collect();
        let used: u16 = widths.iter().sum();
        if let Some(last) = widths.last_mut() {
            *last += total.saturating_sub(used);
        }
        widths
    }

    /// Number of rows that do not fit in `capacity` visible rows
    pub fn overflow(&self, capacity: usize) -> usize {
        self.rows.len().saturating_sub(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_row(n: usize) -> Vec<String> {
        vec![format!("PID {}", n), "[a - b)".to_string(), "Reserved".to_string()]
    }

    #[test]
    fn test_append_then_remove_all_round_trips() {
        let mut registry = Registry::new(RegistrySchema::Legacy);
        let handles: Vec<RowHandle> = (0..4)
            .map(|n| registry.append_row(legacy_row(n)).unwrap())
            .collect();
        assert_eq!(registry.len(), 4);

        for handle in handles {
            registry.remove_row(handle).unwrap();
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rows_grow_downward() {
        let mut registry = Registry::new(RegistrySchema::Legacy);
        let first = registry.append_row(legacy_row(1)).unwrap();
        let second = registry.append_row(legacy_row(2)).unwrap();
        assert_eq!(registry.rows()[0].handle, first);
        assert_eq!(registry.rows()[1].handle, second);
        assert!(Registry::row_offset(1) > Registry::row_offset(0));
        let step = Registry::row_offset(1) - Registry::row_offset(0);
        assert!((step - REGISTRY_ROW_HEIGHT).abs() < 1e-6);
    }

    #[test]
    fn test_field_count_must_match_schema() {
        let mut registry = Registry::new(RegistrySchema::Vad);
        let err = registry.append_row(legacy_row(1)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::RegistryFieldCount {
                expected: 5,
                got: 3
            }
        ));
    }

    #[test]
    fn test_removing_twice_fails() {
        let mut registry = Registry::new(RegistrySchema::Legacy);
        let handle = registry.append_row(legacy_row(1)).unwrap();
        registry.remove_row(handle).unwrap();
        assert!(matches!(
            registry.remove_row(handle),
            Err(SceneError::UnknownRowHandle(0))
        ));
    }

    #[test]
    fn test_column_widths_sum_to_total() {
        let registry = Registry::new(RegistrySchema::Legacy);
        let widths = registry.column_widths(41);
        assert_eq!(widths.len(), 3);
        assert_eq!(widths.iter().sum::<u16>(), 41);
        assert_eq!(widths[0], 13);

        let vad = Registry::new(RegistrySchema::Vad);
        assert_eq!(vad.column_widths(50).iter().sum::<u16>(), 50);
    }

    #[test]
    fn test_vad_record_uses_page_numbers() {
        let fields = RegistrySchema::Vad.record("PID 1234", 0x55a1_3000, 0x55a1_4000, "Reserved");
        assert_eq!(fields, vec!["PID 1234", "0x55a13", "0x55a13", "RW", "Private"]);

        let legacy =
            RegistrySchema::Legacy.record("PID 1234", 0x55a1_3000, 0x55a1_4000, "Reserved");
        assert_eq!(legacy[1], "[0x55a13000 - 0x55a14000)");
    }

    #[test]
    fn test_overflow_counts_hidden_rows() {
        let mut registry = Registry::new(RegistrySchema::Legacy);
        for n in 0..5 {
            registry.append_row(legacy_row(n)).unwrap();
        }
        assert_eq!(registry.overflow(3), 2);
        assert_eq!(registry.overflow(10), 0);
    }
}
