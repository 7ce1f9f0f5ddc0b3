// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A per-output affine surrogate.

use crate::contracts::{check_features, check_samples};
use crate::{EvalError, SurrogateModel, NUM_INPUTS, NUM_OUTPUTS};
use data_handler::Scalar;

/// An affine map from the two inputs to each of the four outputs:
/// `out[o] = w[o][0] · density + w[o][1] · energy + bias[o]`.
///
/// A stand-in for a trained network with the same calling convention;
/// enough to exercise the dispatch policy end-to-end.
#[derive(Debug, Clone, Copy)]
pub struct AffineSurrogate<V: Scalar> {
    weights: [[V; NUM_INPUTS]; NUM_OUTPUTS],
    bias: [V; NUM_OUTPUTS],
}

impl<V: Scalar> AffineSurrogate<V> {
    /// Creates a surrogate from per-output weights and biases.
    pub fn new(weights: [[V; NUM_INPUTS]; NUM_OUTPUTS], bias: [V; NUM_OUTPUTS]) -> Self {
        Self { weights, bias }
    }

    /// A surrogate that answers a constant for every output, ignoring
    /// its inputs.
    pub fn constant(value: V) -> Self {
        Self::new([[V::zero(); NUM_INPUTS]; NUM_OUTPUTS], [value; NUM_OUTPUTS])
    }

    /// A surrogate that replicates its first input (density) into every
    /// output. Useful as an identity-like probe.
    pub fn replicate_density() -> Self {
        let mut weights = [[V::zero(); NUM_INPUTS]; NUM_OUTPUTS];
        for row in &mut weights {
            row[0] = V::one();
        }
        Self::new(weights, [V::zero(); NUM_OUTPUTS])
    }
}

impl<V: Scalar> SurrogateModel<V> for AffineSurrogate<V> {
    fn eval(
        &self,
        n: usize,
        inputs: &[&[V]],
        outputs: &mut [&mut [V]],
    ) -> Result<(), EvalError> {
        check_features(NUM_INPUTS, inputs.len())?;
        check_features(NUM_OUTPUTS, outputs.len())?;
        check_samples(n, inputs)?;
        for output in outputs.iter() {
            if output.len() < n {
                return Err(EvalError::BufferTooShort {
                    expected: n,
                    actual: output.len(),
                });
            }
        }

        for (o, output) in outputs.iter_mut().enumerate() {
            let [w_density, w_energy] = self.weights[o];
            let bias = self.bias[o];
            for i in 0..n {
                output[i] = w_density * inputs[0][i] + w_energy * inputs[1][i] + bias;
            }
        }
        Ok(())
    }
}
