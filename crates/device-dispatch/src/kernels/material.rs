// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-material gather/scatter kernels.
//!
//! A material slice stores quadrature points contiguously per element
//! (`qpt` innermost), so each active element maps to one contiguous
//! `Q`-slice and the kernels parallelise over the dense element position.

use super::SyncSlicePtr;
use rayon::prelude::*;

/// Gathers active elements of a material slice into a dense buffer:
/// `dst[q + Q·k] = src[q + Q·elem_indices[k]]`.
pub fn gather_material<V: Copy + Send + Sync>(
    qpts: usize,
    elem_indices: &[usize],
    src_mat: &[V],
    dst_dense: &mut [V],
) {
    debug_assert!(dst_dense.len() >= qpts * elem_indices.len());

    dst_dense
        .par_chunks_mut(qpts)
        .zip(elem_indices.par_iter())
        .for_each(|(dst, &elem)| {
            dst.copy_from_slice(&src_mat[elem * qpts..(elem + 1) * qpts]);
        });
}

/// Inverse of [`gather_material`]: scatters a dense buffer back to the
/// active element positions of a material slice.
pub fn scatter_material<V: Copy + Send + Sync>(
    qpts: usize,
    elem_indices: &[usize],
    src_dense: &[V],
    dst_mat: &mut [V],
) {
    debug_assert!(src_dense.len() >= qpts * elem_indices.len());

    let dst = SyncSlicePtr::new(dst_mat);
    src_dense
        .par_chunks(qpts)
        .zip(elem_indices.par_iter())
        .for_each(|(src, &elem)| {
            // SAFETY: active element indices are unique within a material,
            // so the Q-slices written here are disjoint.
            unsafe { dst.write_slice(elem * qpts, src) };
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_scatter_round_trip() {
        let qpts = 2;
        let elems = 4;
        // Material slice for elements 0..4, qpt innermost.
        let src: Vec<f64> = (0..qpts * elems).map(|i| i as f64).collect();
        let indices = [1usize, 3];

        let mut dense = vec![0.0; qpts * indices.len()];
        gather_material(qpts, &indices, &src, &mut dense);
        assert_eq!(dense, vec![2.0, 3.0, 6.0, 7.0]);

        let mut dst = vec![-1.0; qpts * elems];
        scatter_material(qpts, &indices, &dense, &mut dst);
        assert_eq!(dst, vec![-1.0, -1.0, 2.0, 3.0, -1.0, -1.0, 6.0, 7.0]);
    }

    #[test]
    fn test_gather_empty() {
        let src: Vec<f64> = vec![1.0, 2.0];
        let mut dense: Vec<f64> = Vec::new();
        gather_material(2, &[], &src, &mut dense);
        assert!(dense.is_empty());
    }
}
