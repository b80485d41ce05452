//! Scripted search for a free heap block
//!
//! The walk visits heap cells in order and looks up each verdict in a
//! [`SearchFixture`]. The cell labels are never consulted, so the outcome is
//! whatever the fixture says it is.

use super::MemoryCell;
use crate::errors::{Result, SceneError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of considering one heap cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// "Insufficient free space"
    Rejected,
    /// "Block reserved"
    Accepted,
}

/// Declarative verdict per heap index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFixture {
    pub expected_outcome_by_index: BTreeMap<usize, Verdict>,
}

impl SearchFixture {
    /// Accept `index`, reject every cell before it
    pub fn accept_at(index: usize) -> Self {
        let mut expected_outcome_by_index: BTreeMap<usize, Verdict> =
            (0..index).map(|i| (i, Verdict::Rejected)).collect();
        expected_outcome_by_index.insert(index, Verdict::Accepted);
        SearchFixture {
            expected_outcome_by_index,
        }
    }

    /// Cells the fixture does not mention are rejected
    pub fn verdict(&self, index: usize) -> Verdict {
        self.expected_outcome_by_index
            .get(&index)
            .copied()
            .unwrap_or(Verdict::Rejected)
    }
}

impl Default for SearchFixture {
    fn default() -> Self {
        SearchFixture::accept_at(2)
    }
}

/// Result of walking the heap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Every cell considered, in visiting order
    pub visited: Vec<(usize, Verdict)>,
    pub accepted: usize,
}

impl SearchOutcome {
    /// Indices that produced "insufficient space", in order
    pub fn rejected(&self) -> Vec<usize> {
        self.visited
            .iter()
            .filter(|(_, verdict)| *verdict == Verdict::Rejected)
            .map(|(index, _)| *index)
            .collect()
    }
}

/// Walk `cells` in order until the fixture accepts one
pub fn run_search(cells: &[MemoryCell], fixture: &SearchFixture) -> Result<SearchOutcome> {
    if let Some(index) = fixture
        .expected_outcome_by_index
        .keys()
        .copied()
        .find(|&index| index >= cells.len())
    {
        return Err(SceneError::SearchIndexOutOfRange {
            index,
            len: cells.len(),
        });
    }

    let mut visited = Vec::new();
    for index in 0..cells.len() {
        let verdict = fixture.verdict(index);
        visited.push((index, verdict));
        log::trace!("search visits heap cell {} -> {:?}", index, verdict);
        if verdict == Verdict::Accepted {
            return Ok(SearchOutcome {
                visited,
                accepted: index,
            });
        }
    }

    Err(SceneError::NoBlockAccepted {
        visited: visited.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::heap::HeapFixture;

    #[test]
    fn test_default_fixture_accepts_third_block() {
        let cells = HeapFixture::default().cells();
        let outcome = run_search(&cells, &SearchFixture::default()).unwrap();
        assert_eq!(outcome.accepted, 2);
        assert_eq!(outcome.rejected(), vec![0, 1]);
        assert_eq!(outcome.visited.len(), 3);
    }

    #[test]
    fn test_labels_do_not_influence_outcome() {
        let heap = HeapFixture {
            used_bytes: vec!["0".into(), "0".into(), "4096".into(), "0".into(), "0".into()],
            ..HeapFixture::default()
        };
        let outcome = run_search(&heap.cells(), &SearchFixture::default()).unwrap();
        assert_eq!(outcome.accepted, 2);
    }

    #[test]
    fn test_fixture_can_move_the_accepted_block() {
        let cells = HeapFixture::default().cells();
        let outcome = run_search(&cells, &SearchFixture::accept_at(0)).unwrap();
        assert_eq!(outcome.accepted, 0);
        assert!(outcome.rejected().is_empty());
    }

    #[test]
    fn test_unmentioned_cells_are_rejected() {
        let mut fixture = SearchFixture {
            expected_outcome_by_index: BTreeMap::new(),
        };
        fixture.expected_outcome_by_index.insert(3, Verdict::Accepted);
        let outcome = run_search(&HeapFixture::default().cells(), &fixture).unwrap();
        assert_eq!(outcome.rejected(), vec![0, 1, 2]);
        assert_eq!(outcome.accepted, 3);
    }

    #[test]
    fn test_out_of_range_fixture_is_rejected() {
        let cells = HeapFixture::default().cells();
        let err = run_search(&cells, &SearchFixture::accept_at(7)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::SearchIndexOutOfRange { index: 5, len: 5 }
        ));
    }

    #[test]
    fn test_walk_without_accept_fails() {
        let fixture = SearchFixture {
            expected_outcome_by_index: BTreeMap::from([(1, Verdict::Rejected)]),
        };
        let err = run_search(&HeapFixture::default().cells(), &fixture).unwrap_err();
        assert!(matches!(err, SceneError::NoBlockAccepted { visited: 5 }));
    }
}
