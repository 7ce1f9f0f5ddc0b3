// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Memory-bounded partition sizing.
//!
//! Packing a partition needs one scratch value per input and output
//! feature per sample, plus optionally one reverse index. The partition
//! size is however many samples of that footprint fit the scratch budget.

use crate::Scalar;
use resource_manager::MemoryBudget;

/// The default per-partition scratch budget.
///
/// Worst case, a partition allocates
/// `part · (size_of::<V>() · 6 + size_of::<u32>())` bytes; 2 MiB keeps
/// that well inside a last-level cache slice while amortising the
/// evaluator call overhead.
pub fn default_partition_budget() -> MemoryBudget {
    MemoryBudget::from_mb(2)
}

/// Samples per partition under `budget`:
/// `floor(budget / bytes_per_sample)`, clamped to at least one so a
/// budget smaller than a single sample's scratch still makes progress.
pub fn compute_partition_size<V: Scalar>(
    budget: MemoryBudget,
    n_in_features: usize,
    n_out_features: usize,
    include_reindex: bool,
) -> usize {
    let mut bytes_per_sample = std::mem::size_of::<V>() * (n_in_features + n_out_features);
    if include_reindex {
        bytes_per_sample += std::mem::size_of::<u32>();
    }
    (budget.as_bytes() / bytes_per_sample).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_size_f64() {
        // 6 features × 8 bytes + 4-byte reindex = 52 bytes per sample.
        let budget = MemoryBudget::from_bytes(5200);
        assert_eq!(compute_partition_size::<f64>(budget, 2, 4, true), 100);
    }

    #[test]
    fn test_partition_size_without_reindex() {
        // 6 features × 8 bytes = 48 bytes per sample.
        let budget = MemoryBudget::from_bytes(4800);
        assert_eq!(compute_partition_size::<f64>(budget, 2, 4, false), 100);
    }

    #[test]
    fn test_partition_size_f32_packs_more() {
        let budget = MemoryBudget::from_bytes(4096);
        let doubles = compute_partition_size::<f64>(budget, 2, 4, false);
        let singles = compute_partition_size::<f32>(budget, 2, 4, false);
        assert_eq!(singles, doubles * 2);
    }

    #[test]
    fn test_tiny_budget_clamps_to_one() {
        let budget = MemoryBudget::from_bytes(1);
        assert_eq!(compute_partition_size::<f64>(budget, 2, 4, true), 1);
    }

    #[test]
    fn test_default_budget() {
        assert_eq!(default_partition_budget().as_bytes(), 2 * 1024 * 1024);
    }
}
