// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The sparse element index table.
//!
//! The table keeps the external mixed-role layout existing callers depend
//! on: one integer sequence of length `M + Σ E_m` whose first `M` entries
//! are cumulative end-offsets and whose remaining entries are element
//! indices. Material `m`'s index list lives at
//! `raw[offset_start(m) .. raw[m])`, with `offset_start(0) = M` and
//! `offset_start(m) = raw[m − 1]` otherwise.

use crate::DataError;
use std::collections::HashSet;

/// Which elements are active in which material.
///
/// Construction validates the layout invariants once, so accessors can be
/// plain slicing.
///
/// # Examples
/// ```
/// use data_handler::SparseElementTable;
///
/// // Two materials over three elements: material 0 uses element 0,
/// // material 1 uses elements 1 and 2.
/// let table = SparseElementTable::new(vec![3, 5, 0, 1, 2], 2, 3).unwrap();
/// assert_eq!(table.active_elems(0), 1);
/// assert_eq!(table.indices(1), &[1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseElementTable {
    raw: Vec<usize>,
    num_mats: usize,
    num_elems: usize,
}

impl SparseElementTable {
    /// Wraps a raw table, validating the layout:
    ///
    /// - length is at least `num_mats`,
    /// - offsets are monotone, start at or after `num_mats`, and the last
    ///   offset equals the table length,
    /// - every element index is `< num_elems`,
    /// - no element index repeats within one material's list.
    ///
    /// Per-material uniqueness is load-bearing: the parallel scatter
    /// kernels write each active element's slice without synchronisation,
    /// which is sound only when the indices of a material are distinct.
    /// An element may still be active in several materials.
    pub fn new(raw: Vec<usize>, num_mats: usize, num_elems: usize) -> Result<Self, DataError> {
        if raw.len() < num_mats {
            return Err(DataError::MalformedIndexTable(format!(
                "table of length {} cannot hold {num_mats} offsets",
                raw.len()
            )));
        }
        let mut prev = num_mats;
        for (m, &end) in raw[..num_mats].iter().enumerate() {
            if end < prev {
                return Err(DataError::MalformedIndexTable(format!(
                    "offset for material {m} decreases: {end} < {prev}"
                )));
            }
            if end > raw.len() {
                return Err(DataError::MalformedIndexTable(format!(
                    "offset for material {m} points past the table: {end} > {}",
                    raw.len()
                )));
            }
            prev = end;
        }
        if num_mats > 0 && prev != raw.len() {
            return Err(DataError::MalformedIndexTable(format!(
                "last offset {prev} does not cover the table length {}",
                raw.len()
            )));
        }
        if let Some(&bad) = raw[num_mats..].iter().find(|&&e| e >= num_elems) {
            return Err(DataError::MalformedIndexTable(format!(
                "element index {bad} out of range for {num_elems} elements"
            )));
        }
        let mut seen = HashSet::new();
        for m in 0..num_mats {
            let start = if m == 0 { num_mats } else { raw[m - 1] };
            seen.clear();
            for &elem in &raw[start..raw[m]] {
                if !seen.insert(elem) {
                    return Err(DataError::MalformedIndexTable(format!(
                        "element index {elem} repeats within material {m}"
                    )));
                }
            }
        }

        Ok(Self {
            raw,
            num_mats,
            num_elems,
        })
    }

    /// Builds the raw layout from per-material index lists.
    pub fn from_material_lists(
        lists: &[Vec<usize>],
        num_elems: usize,
    ) -> Result<Self, DataError> {
        let num_mats = lists.len();
        let total: usize = lists.iter().map(|l| l.len()).sum();
        let mut raw = Vec::with_capacity(num_mats + total);

        let mut end = num_mats;
        for list in lists {
            end += list.len();
            raw.push(end);
        }
        for list in lists {
            raw.extend_from_slice(list);
        }
        Self::new(raw, num_mats, num_elems)
    }

    /// Number of materials.
    pub fn num_mats(&self) -> usize {
        self.num_mats
    }

    /// Where material `m`'s index list begins in the raw table.
    pub fn offset_start(&self, m: usize) -> usize {
        assert!(m < self.num_mats, "material {m} out of bounds");
        if m == 0 {
            self.num_mats
        } else {
            self.raw[m - 1]
        }
    }

    /// Number of active elements `E_m` of material `m`.
    pub fn active_elems(&self, m: usize) -> usize {
        self.raw[m] - self.offset_start(m)
    }

    /// The element indices of material `m`, dense position → global element.
    pub fn indices(&self, m: usize) -> &[usize] {
        &self.raw[self.offset_start(m)..self.raw[m]]
    }

    /// The raw mixed-role sequence (offsets prefix, then indices).
    pub fn raw(&self) -> &[usize] {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_accessors() {
        // Two materials over three elements: material 0 owns {0},
        // material 1 owns {1, 2}.
        let table = SparseElementTable::new(vec![3, 5, 0, 1, 2], 2, 3).unwrap();
        assert_eq!(table.offset_start(0), 2);
        assert_eq!(table.active_elems(0), 1);
        assert_eq!(table.indices(0), &[0]);
        assert_eq!(table.offset_start(1), 3);
        assert_eq!(table.active_elems(1), 2);
        assert_eq!(table.indices(1), &[1, 2]);
    }

    #[test]
    fn test_empty_material() {
        // Material 1 has no active elements.
        let table = SparseElementTable::new(vec![4, 4, 5, 0, 2], 3, 3).unwrap();
        assert_eq!(table.active_elems(0), 1);
        assert_eq!(table.active_elems(1), 0);
        assert!(table.indices(1).is_empty());
        assert_eq!(table.active_elems(2), 1);
        assert_eq!(table.indices(2), &[2]);
    }

    #[test]
    fn test_from_material_lists() {
        let table =
            SparseElementTable::from_material_lists(&[vec![0], vec![1, 2]], 3).unwrap();
        assert_eq!(table.raw(), &[3, 5, 0, 1, 2]);
        assert_eq!(table.indices(1), &[1, 2]);
    }

    #[test]
    fn test_rejects_decreasing_offsets() {
        assert!(SparseElementTable::new(vec![5, 3, 0, 1, 2], 2, 3).is_err());
    }

    #[test]
    fn test_rejects_offset_past_end() {
        assert!(SparseElementTable::new(vec![3, 9, 0], 2, 3).is_err());
    }

    #[test]
    fn test_rejects_uncovered_tail() {
        // Last offset stops before the end of the table.
        assert!(SparseElementTable::new(vec![3, 4, 0, 1, 2], 2, 3).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        assert!(SparseElementTable::new(vec![3, 5, 0, 1, 7], 2, 3).is_err());
    }

    #[test]
    fn test_rejects_duplicate_index_within_material() {
        assert!(SparseElementTable::new(vec![3, 0, 0], 1, 3).is_err());
        assert!(SparseElementTable::from_material_lists(&[vec![1, 2, 1]], 3).is_err());
    }

    #[test]
    fn test_allows_element_shared_across_materials() {
        // Element 0 active in both materials: fine, only repeats within
        // one material's list are rejected.
        let table = SparseElementTable::new(vec![3, 5, 0, 0, 1], 2, 3).unwrap();
        assert_eq!(table.indices(0), &[0]);
        assert_eq!(table.indices(1), &[0, 1]);
    }

    #[test]
    fn test_too_short_for_offsets() {
        assert!(SparseElementTable::new(vec![2], 2, 3).is_err());
    }
}
