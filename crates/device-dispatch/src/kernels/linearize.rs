// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Feature linearization kernel.

use num_traits::{NumCast, ToPrimitive, Zero};
use rayon::prelude::*;

/// Interleaves per-feature columns into one row-major buffer:
/// `out[i * F + d] = V(features[d][i])`, parallel over samples.
///
/// The cast mirrors a plain `as` conversion; float targets always succeed
/// (the zero arm is unreachable for the scalar types used here).
pub fn linearize<T, V>(out: &mut [V], features: &[&[T]], ndata: usize)
where
    T: Copy + Send + Sync + ToPrimitive,
    V: Copy + Send + Sync + NumCast + Zero,
{
    let nfeatures = features.len();
    debug_assert!(out.len() >= ndata * nfeatures);
    debug_assert!(features.iter().all(|f| f.len() >= ndata));

    out[..ndata * nfeatures]
        .par_chunks_mut(nfeatures)
        .enumerate()
        .for_each(|(i, row)| {
            for (d, feature) in features.iter().enumerate() {
                row[d] = NumCast::from(feature[i]).unwrap_or_else(V::zero);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linearize_row_major() {
        let a: Vec<f64> = vec![1.0, 2.0, 3.0];
        let b: Vec<f64> = vec![10.0, 20.0, 30.0];
        let mut out = vec![0.0f64; 6];

        linearize(&mut out, &[&a, &b], 3);
        assert_eq!(out, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
    }

    #[test]
    fn test_linearize_casts() {
        let a: Vec<f32> = vec![1.5, 2.5];
        let mut out = vec![0.0f64; 2];

        linearize(&mut out, &[&a], 2);
        assert_eq!(out, vec![1.5, 2.5]);
    }
}
