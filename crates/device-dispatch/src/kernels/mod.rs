// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Data-parallel kernel entry points.
//!
//! These are the device-side companions of the data-handler operations.
//! Each kernel parallelises over the sample dimension and joins before
//! returning. Argument shapes are validated by the data handler before
//! dispatch; kernels only `debug_assert!` them.
//!
//! The compaction kernels preserve input order: the relative order of
//! packed elements equals ascending source index on both paths.

mod compact;
mod linearize;
mod material;
mod sync_ptr;

pub use compact::{pack, pack_indexed, unpack, unpack_indexed};
pub use linearize::linearize;
pub use material::{gather_material, scatter_material};

pub(crate) use sync_ptr::SyncSlicePtr;

/// Samples per compaction chunk. Each chunk is counted, offset by an
/// exclusive scan, then copied independently.
pub(crate) const COMPACTION_CHUNK: usize = 4096;

/// Splits `buf` into consecutive segments of the given lengths.
///
/// Used to hand each compaction chunk a disjoint mutable output segment.
pub(crate) fn split_by_counts<'a, V>(mut buf: &'a mut [V], counts: &[usize]) -> Vec<&'a mut [V]> {
    let mut segments = Vec::with_capacity(counts.len());
    for &count in counts {
        let (head, tail) = std::mem::take(&mut buf).split_at_mut(count);
        segments.push(head);
        buf = tail;
    }
    segments
}

/// Per-chunk match counts and their exclusive scan.
///
/// Returns `(counts, offsets, total)` where `offsets[c]` is the packed
/// position at which chunk `c` starts writing.
pub(crate) fn chunk_offsets(predicate: &[bool], dense_val: bool) -> (Vec<usize>, Vec<usize>, usize) {
    use rayon::prelude::*;

    let counts: Vec<usize> = predicate
        .par_chunks(COMPACTION_CHUNK)
        .map(|chunk| chunk.iter().filter(|&&p| p == dense_val).count())
        .collect();

    let mut offsets = Vec::with_capacity(counts.len());
    let mut total = 0;
    for &count in &counts {
        offsets.push(total);
        total += count;
    }
    (counts, offsets, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_by_counts() {
        let mut buf = [0u32; 6];
        let segments = split_by_counts(&mut buf, &[2, 0, 3, 1]);
        let lens: Vec<usize> = segments.iter().map(|s| s.len()).collect();
        assert_eq!(lens, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_chunk_offsets_single_chunk() {
        let predicate = [true, false, true, false, false];
        let (counts, offsets, total) = chunk_offsets(&predicate, false);
        assert_eq!(counts, vec![3]);
        assert_eq!(offsets, vec![0]);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_chunk_offsets_multiple_chunks() {
        // Three chunks: full, full, partial.
        let n = COMPACTION_CHUNK * 2 + 7;
        let predicate: Vec<bool> = (0..n).map(|i| i % 2 == 0).collect();
        let (counts, offsets, total) = chunk_offsets(&predicate, true);
        assert_eq!(counts.len(), 3);
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[1], counts[0]);
        assert_eq!(offsets[2], counts[0] + counts[1]);
        assert_eq!(total, predicate.iter().filter(|&&p| p).count());
    }
}
