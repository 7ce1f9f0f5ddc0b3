// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-material sparse↔dense gather/scatter.
//!
//! The sparse path of the material loop gathers a material's active
//! elements into contiguous dense buffers before the pipeline runs, then
//! scatters the results back. Generalised over one or more tensors so the
//! two inputs (and four outputs) move in one call.
//!
//! Reads and writes touch disjoint per-element `Q`-slices, so the device
//! path parallelises over the dense element position with no
//! synchronisation.

use crate::{BlockTensor, DataError, Scalar, SparseElementTable};
use device_dispatch::{kernels, DispatchContext};

fn check_dense_lengths<V: Scalar>(
    needed: usize,
    buffers: &[&mut [V]],
) -> Result<(), DataError> {
    for buffer in buffers.iter() {
        if buffer.len() < needed {
            return Err(DataError::LengthMismatch {
                expected: needed,
                actual: buffer.len(),
            });
        }
    }
    Ok(())
}

/// Gathers material `m`'s active elements from each source block tensor
/// into the matching dense buffer:
/// `dst[d][q + Q·k] = src[d](q, S[offset_start + k], m)`.
pub fn gather_material<V: Scalar>(
    ctx: DispatchContext,
    m: usize,
    table: &SparseElementTable,
    sources: &[&BlockTensor<V>],
    dense: &mut [&mut [V]],
) -> Result<(), DataError> {
    if sources.len() != dense.len() {
        return Err(DataError::ShapeMismatch {
            sparse: sources.len(),
            dense: dense.len(),
        });
    }
    let Some(first) = sources.first() else {
        return Ok(());
    };
    let dims = first.dims();
    for source in sources {
        if source.dims() != dims {
            return Err(DataError::DimensionMismatch {
                expected: dims,
                actual: source.dims(),
            });
        }
    }

    let qpts = dims.0;
    let indices = table.indices(m);
    check_dense_lengths(qpts * indices.len(), dense)?;

    for (source, dst) in sources.iter().zip(dense.iter_mut()) {
        let src_mat = source.mat_slice(m);
        if ctx.is_device_execution() {
            kernels::gather_material(qpts, indices, src_mat, dst);
        } else {
            for (k, &elem) in indices.iter().enumerate() {
                dst[k * qpts..(k + 1) * qpts]
                    .copy_from_slice(&src_mat[elem * qpts..(elem + 1) * qpts]);
            }
        }
    }
    Ok(())
}

/// Inverse of [`gather_material`]: scatters dense buffers back to the
/// active element positions of each destination block tensor. Positions
/// of inactive elements are untouched.
pub fn scatter_material<V: Scalar>(
    ctx: DispatchContext,
    m: usize,
    table: &SparseElementTable,
    dense: &[&[V]],
    targets: &mut [&mut BlockTensor<V>],
) -> Result<(), DataError> {
    if dense.len() != targets.len() {
        return Err(DataError::ShapeMismatch {
            sparse: targets.len(),
            dense: dense.len(),
        });
    }
    let Some(first) = targets.first() else {
        return Ok(());
    };
    let dims = first.dims();
    for target in targets.iter() {
        if target.dims() != dims {
            return Err(DataError::DimensionMismatch {
                expected: dims,
                actual: target.dims(),
            });
        }
    }

    let qpts = dims.0;
    let indices = table.indices(m);
    for source in dense {
        if source.len() < qpts * indices.len() {
            return Err(DataError::LengthMismatch {
                expected: qpts * indices.len(),
                actual: source.len(),
            });
        }
    }

    for (src, target) in dense.iter().zip(targets.iter_mut()) {
        let dst_mat = target.mat_slice_mut(m);
        if ctx.is_device_execution() {
            kernels::scatter_material(qpts, indices, src, dst_mat);
        } else {
            for (k, &elem) in indices.iter().enumerate() {
                dst_mat[elem * qpts..(elem + 1) * qpts]
                    .copy_from_slice(&src[k * qpts..(k + 1) * qpts]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (BlockTensor<f64>, SparseElementTable) {
        // Q=2, E=4, M=2; material 1 owns elements {1, 3}.
        let tensor = BlockTensor::from_fn(2, 4, 2, |q, e, m| (100 * m + 10 * e + q) as f64);
        let table =
            SparseElementTable::from_material_lists(&[vec![0, 2], vec![1, 3]], 4).unwrap();
        (tensor, table)
    }

    #[test]
    fn test_gather_collects_active_elements() {
        let (tensor, table) = fixture();
        let mut dense = vec![0.0; 4];
        gather_material(
            DispatchContext::host(),
            1,
            &table,
            &[&tensor],
            &mut [&mut dense],
        )
        .unwrap();
        assert_eq!(dense, vec![110.0, 111.0, 130.0, 131.0]);
    }

    #[test]
    fn test_scatter_inverse_of_gather() {
        for ctx in [DispatchContext::host(), DispatchContext::device()] {
            let (tensor, table) = fixture();
            let mut dense = vec![0.0; 4];
            gather_material(ctx, 1, &table, &[&tensor], &mut [&mut dense]).unwrap();

            let mut out = BlockTensor::<f64>::zeros(2, 4, 2);
            scatter_material(ctx, 1, &table, &[&dense], &mut [&mut out]).unwrap();

            // Active positions restored, inactive untouched.
            for e in [1usize, 3] {
                for q in 0..2 {
                    assert_eq!(out.at(q, e, 1), tensor.at(q, e, 1));
                }
            }
            for e in [0usize, 2] {
                for q in 0..2 {
                    assert_eq!(out.at(q, e, 1), 0.0);
                }
            }
            // Other material untouched.
            assert!(out.mat_slice(0).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_gather_multiple_tensors() {
        let (density, table) = fixture();
        let energy = BlockTensor::from_fn(2, 4, 2, |q, e, m| (1000 * (m + 1) + 10 * e + q) as f64);
        let mut dense_d = vec![0.0; 4];
        let mut dense_e = vec![0.0; 4];
        gather_material(
            DispatchContext::host(),
            1,
            &table,
            &[&density, &energy],
            &mut [&mut dense_d, &mut dense_e],
        )
        .unwrap();
        assert_eq!(dense_d, vec![110.0, 111.0, 130.0, 131.0]);
        assert_eq!(dense_e, vec![2010.0, 2011.0, 2030.0, 2031.0]);
    }

    #[test]
    fn test_gather_shape_mismatch() {
        let (tensor, table) = fixture();
        let mut dense = vec![0.0; 4];
        let result = gather_material(
            DispatchContext::host(),
            1,
            &table,
            &[&tensor, &tensor],
            &mut [&mut dense],
        );
        assert!(matches!(result, Err(DataError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_gather_short_dense_buffer() {
        let (tensor, table) = fixture();
        let mut dense = vec![0.0; 3];
        let result = gather_material(
            DispatchContext::host(),
            1,
            &table,
            &[&tensor],
            &mut [&mut dense],
        );
        assert!(matches!(result, Err(DataError::LengthMismatch { .. })));
    }

    #[test]
    fn test_host_device_equivalence() {
        let (tensor, table) = fixture();
        let mut host = vec![0.0; 4];
        let mut device = vec![0.0; 4];
        gather_material(DispatchContext::host(), 0, &table, &[&tensor], &mut [&mut host]).unwrap();
        gather_material(
            DispatchContext::device(),
            0,
            &table,
            &[&tensor],
            &mut [&mut device],
        )
        .unwrap();
        assert_eq!(host, device);
    }
}
