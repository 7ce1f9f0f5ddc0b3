// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The γ-law ideal gas equation of state.

use crate::contracts::check_samples;
use crate::{EosModel, EvalError};
use data_handler::Scalar;

/// Ideal-gas EOS with adiabatic index `γ` and constant specific heat.
///
/// For density `ρ` and specific internal energy `e`:
///
/// ```text
/// pressure        = (γ − 1) · ρ · e
/// sound_speed_sq  = γ · (γ − 1) · e
/// bulk_modulus    = γ · pressure
/// temperature     = e / c_v
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IdealGasEos<V: Scalar> {
    gamma: V,
    specific_heat: V,
}

impl<V: Scalar> IdealGasEos<V> {
    /// Creates an ideal-gas EOS with the given adiabatic index and
    /// specific heat.
    pub fn new(gamma: V, specific_heat: V) -> Self {
        Self {
            gamma,
            specific_heat,
        }
    }

    /// The adiabatic index γ.
    pub fn gamma(&self) -> V {
        self.gamma
    }
}

impl<V: Scalar> Default for IdealGasEos<V> {
    /// γ = 1.6, c_v = 1.0 — the mini-application's stock gas.
    fn default() -> Self {
        Self::new(V::from_other(1.6), V::one())
    }
}

impl<V: Scalar> EosModel<V> for IdealGasEos<V> {
    fn eval(
        &self,
        n: usize,
        energy: &[V],
        density: &[V],
        pressure: &mut [V],
        sound_speed_sq: &mut [V],
        bulk_modulus: &mut [V],
        temperature: &mut [V],
    ) -> Result<(), EvalError> {
        check_samples(n, &[energy, density])?;
        check_samples(n, &[pressure, sound_speed_sq, bulk_modulus, temperature])?;

        let gm1 = self.gamma - V::one();
        for i in 0..n {
            let e = energy[i];
            let rho = density[i];
            pressure[i] = gm1 * rho * e;
            sound_speed_sq[i] = self.gamma * gm1 * e;
            bulk_modulus[i] = self.gamma * pressure[i];
            temperature[i] = e / self.specific_heat;
        }
        Ok(())
    }
}
