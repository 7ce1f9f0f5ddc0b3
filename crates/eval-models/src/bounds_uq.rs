// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounding-box uncertainty oracle.

use crate::contracts::{check_features, check_samples};
use crate::{EvalError, UqModel, NUM_INPUTS};
use data_handler::Scalar;

/// Accepts samples whose inputs fall inside a trained bounding box.
///
/// A sample is acceptable when `lo[d] <= x[d] <= hi[d]` for both input
/// features — the region the surrogate was trained on. Everything outside
/// falls back to physics. A stand-in for a hash-domain distance cache
/// with the same calling convention.
#[derive(Debug, Clone, Copy)]
pub struct BoundsUq<V: Scalar> {
    lo: [V; NUM_INPUTS],
    hi: [V; NUM_INPUTS],
}

impl<V: Scalar> BoundsUq<V> {
    /// Creates an oracle accepting the box `[lo, hi]` per feature.
    pub fn new(lo: [V; NUM_INPUTS], hi: [V; NUM_INPUTS]) -> Self {
        Self { lo, hi }
    }

    /// An oracle that accepts every sample.
    pub fn accept_all() -> Self {
        Self::new(
            [V::neg_infinity(); NUM_INPUTS],
            [V::infinity(); NUM_INPUTS],
        )
    }

    /// An oracle that rejects every sample.
    pub fn reject_all() -> Self {
        Self::new(
            [V::infinity(); NUM_INPUTS],
            [V::neg_infinity(); NUM_INPUTS],
        )
    }
}

impl<V: Scalar> UqModel<V> for BoundsUq<V> {
    fn evaluate(
        &self,
        n: usize,
        inputs: &[&[V]],
        acceptable: &mut [bool],
    ) -> Result<(), EvalError> {
        check_features(NUM_INPUTS, inputs.len())?;
        check_samples(n, inputs)?;
        if acceptable.len() < n {
            return Err(EvalError::BufferTooShort {
                expected: n,
                actual: acceptable.len(),
            });
        }

        for i in 0..n {
            acceptable[i] = (0..NUM_INPUTS)
                .all(|d| inputs[d][i] >= self.lo[d] && inputs[d][i] <= self.hi[d]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_membership() {
        let uq = BoundsUq::new([0.0f64, 0.0], [1.0, 10.0]);
        let density = [0.5, 2.0, 1.0];
        let energy = [5.0, 5.0, 11.0];
        let mut acceptable = [false; 3];

        uq.evaluate(3, &[&density, &energy], &mut acceptable).unwrap();
        assert_eq!(acceptable, [true, false, false]);
    }

    #[test]
    fn test_accept_all_reject_all() {
        let density = [1.0f64, -1e30];
        let energy = [0.0, 1e30];
        let mut acceptable = [false; 2];

        BoundsUq::accept_all()
            .evaluate(2, &[&density, &energy], &mut acceptable)
            .unwrap();
        assert_eq!(acceptable, [true, true]);

        BoundsUq::reject_all()
            .evaluate(2, &[&density, &energy], &mut acceptable)
            .unwrap();
        assert_eq!(acceptable, [false, false]);
    }

    #[test]
    fn test_short_flag_buffer() {
        let uq = BoundsUq::<f64>::accept_all();
        let density = [1.0, 2.0];
        let energy = [1.0, 2.0];
        let mut acceptable = [false; 1];
        let result = uq.evaluate(2, &[&density, &energy], &mut acceptable);
        assert!(matches!(result, Err(EvalError::BufferTooShort { .. })));
    }
}
