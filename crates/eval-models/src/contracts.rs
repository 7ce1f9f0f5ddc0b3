// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The evaluator traits.
//!
//! Contracts are purely algorithmic — no I/O in the trait surface —
//! making implementations trivially unit-testable and the core
//! independent of any model backend.

use crate::EvalError;
use data_handler::Scalar;

/// The physics equation of state.
///
/// Computes all four output quantities for `n` samples. Argument order
/// keeps energy first, matching the physics convention the evaluation
/// core calls with.
pub trait EosModel<V: Scalar>: Send + Sync {
    /// Evaluates the EOS for `n` samples.
    fn eval(
        &self,
        n: usize,
        energy: &[V],
        density: &[V],
        pressure: &mut [V],
        sound_speed_sq: &mut [V],
        bulk_modulus: &mut [V],
        temperature: &mut [V],
    ) -> Result<(), EvalError>;

    /// Root-mean-square error of previously computed outputs against a
    /// fresh physics evaluation, one value per output quantity.
    ///
    /// Debug aid for watching surrogate drift; not part of the hot path.
    #[cfg(feature = "surrogate-debug")]
    fn compute_rmse(
        &self,
        n: usize,
        energy: &[V],
        density: &[V],
        pressure: &[V],
        sound_speed_sq: &[V],
        bulk_modulus: &[V],
        temperature: &[V],
    ) -> Result<[f64; 4], EvalError> {
        let mut p = vec![V::zero(); n];
        let mut s = vec![V::zero(); n];
        let mut b = vec![V::zero(); n];
        let mut t = vec![V::zero(); n];
        self.eval(n, energy, density, &mut p, &mut s, &mut b, &mut t)?;

        let rmse = |reference: &[V], computed: &[V]| -> f64 {
            if n == 0 {
                return 0.0;
            }
            let sum: f64 = reference
                .iter()
                .zip(computed)
                .map(|(&r, &c)| {
                    let d = (r - c).to_f64().unwrap_or(f64::NAN);
                    d * d
                })
                .sum();
            (sum / n as f64).sqrt()
        };
        Ok([
            rmse(&p, pressure),
            rmse(&s, sound_speed_sq),
            rmse(&b, bulk_modulus),
            rmse(&t, temperature),
        ])
    }
}

/// The cheap approximation of the EOS.
///
/// `inputs` carries the two input features (density, energy), `outputs`
/// the four output quantities, each as a column of `n` samples.
pub trait SurrogateModel<V: Scalar>: Send + Sync {
    /// Produces approximate outputs for all `n` samples.
    fn eval(
        &self,
        n: usize,
        inputs: &[&[V]],
        outputs: &mut [&mut [V]],
    ) -> Result<(), EvalError>;
}

/// The uncertainty oracle deciding where the surrogate answer can stand.
pub trait UqModel<V: Scalar>: Send + Sync {
    /// Writes one acceptance flag per sample: `true` means "skip
    /// physics here".
    fn evaluate(
        &self,
        n: usize,
        inputs: &[&[V]],
        acceptable: &mut [bool],
    ) -> Result<(), EvalError>;
}

pub(crate) fn check_samples<V: Scalar>(n: usize, columns: &[&[V]]) -> Result<(), EvalError> {
    for column in columns {
        if column.len() < n {
            return Err(EvalError::BufferTooShort {
                expected: n,
                actual: column.len(),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_features(expected: usize, actual: usize) -> Result<(), EvalError> {
    if expected != actual {
        return Err(EvalError::FeatureCountMismatch { expected, actual });
    }
    Ok(())
}
