// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Predicate-driven stream compaction kernels.
//!
//! The pack kernels implement chunked prefix-sum compaction: each chunk of
//! [`COMPACTION_CHUNK`](super::COMPACTION_CHUNK) samples is counted in
//! parallel, chunk start offsets come from an exclusive scan, and every
//! chunk then copies its matches into a disjoint segment of the dense
//! output. Packed order equals ascending source index.
//!
//! Two variants, mirroring the two unpack strategies:
//!
//! - **predicate-preserving** ([`pack`]/[`unpack`]) — unpack re-walks the
//!   same predicate;
//! - **index-materialising** ([`pack_indexed`]/[`unpack_indexed`]) — pack
//!   records the source index of every packed sample, and unpack consults
//!   only that table.

use super::{chunk_offsets, split_by_counts, SyncSlicePtr, COMPACTION_CHUNK};
use rayon::prelude::*;

/// Packs samples where `predicate[i] == dense_val` into contiguous dense
/// buffers, one per feature. Returns the packed count.
pub fn pack<V: Copy + Send + Sync>(
    dense_val: bool,
    predicate: &[bool],
    sparse: &[&[V]],
    dense: &mut [&mut [V]],
) -> usize {
    debug_assert_eq!(sparse.len(), dense.len());

    let (counts, _offsets, total) = chunk_offsets(predicate, dense_val);

    for (src, dst) in sparse.iter().zip(dense.iter_mut()) {
        debug_assert!(src.len() >= predicate.len());
        debug_assert!(dst.len() >= total);

        let segments = split_by_counts(&mut dst[..total], &counts);
        predicate
            .par_chunks(COMPACTION_CHUNK)
            .zip(src.par_chunks(COMPACTION_CHUNK))
            .zip(segments)
            .for_each(|((pred, src), segment)| {
                let mut packed = 0;
                for (i, &p) in pred.iter().enumerate() {
                    if p == dense_val {
                        segment[packed] = src[i];
                        packed += 1;
                    }
                }
            });
    }
    total
}

/// [`pack`] plus a reverse-index table: `indices[j]` receives the source
/// position of the `j`-th packed sample. Returns the packed count.
pub fn pack_indexed<V: Copy + Send + Sync>(
    dense_val: bool,
    predicate: &[bool],
    indices: &mut [u32],
    sparse: &[&[V]],
    dense: &mut [&mut [V]],
) -> usize {
    let total = pack(dense_val, predicate, sparse, dense);
    debug_assert!(indices.len() >= total);

    let (counts, _offsets, _) = chunk_offsets(predicate, dense_val);
    let segments = split_by_counts(&mut indices[..total], &counts);
    predicate
        .par_chunks(COMPACTION_CHUNK)
        .zip(segments)
        .enumerate()
        .for_each(|(chunk, (pred, segment))| {
            let base = chunk * COMPACTION_CHUNK;
            let mut packed = 0;
            for (i, &p) in pred.iter().enumerate() {
                if p == dense_val {
                    segment[packed] = (base + i) as u32;
                    packed += 1;
                }
            }
        });
    total
}

/// Scatters dense buffers back to the positions where
/// `predicate[i] == dense_val`. Returns the consumed packed count.
pub fn unpack<V: Copy + Send + Sync>(
    dense_val: bool,
    predicate: &[bool],
    dense: &[&[V]],
    sparse: &mut [&mut [V]],
) -> usize {
    debug_assert_eq!(sparse.len(), dense.len());

    let (_counts, offsets, total) = chunk_offsets(predicate, dense_val);

    for (src, dst) in dense.iter().zip(sparse.iter_mut()) {
        debug_assert!(src.len() >= total);
        debug_assert!(dst.len() >= predicate.len());

        dst.par_chunks_mut(COMPACTION_CHUNK)
            .zip(predicate.par_chunks(COMPACTION_CHUNK))
            .enumerate()
            .for_each(|(chunk, (dst, pred))| {
                let mut packed = offsets[chunk];
                for (i, &p) in pred.iter().enumerate() {
                    if p == dense_val {
                        dst[i] = src[packed];
                        packed += 1;
                    }
                }
            });
    }
    total
}

/// Scatters `npacked` dense samples back through a reverse-index table
/// produced by [`pack_indexed`].
pub fn unpack_indexed<V: Copy + Send + Sync>(
    indices: &[u32],
    npacked: usize,
    dense: &[&[V]],
    sparse: &mut [&mut [V]],
) {
    debug_assert_eq!(sparse.len(), dense.len());
    debug_assert!(indices.len() >= npacked);

    for (src, dst) in dense.iter().zip(sparse.iter_mut()) {
        debug_assert!(src.len() >= npacked);

        let dst = SyncSlicePtr::new(dst);
        indices[..npacked]
            .par_iter()
            .enumerate()
            .for_each(|(packed, &source)| {
                // SAFETY: pack_indexed produces strictly increasing source
                // indices, so every target position is written exactly once.
                unsafe { dst.write(source as usize, src[packed]) };
            });
    }
}
