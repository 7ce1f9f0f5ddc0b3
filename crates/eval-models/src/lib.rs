// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # eval-models
//!
//! The three polymorphic evaluator contracts consumed by the evaluation
//! core, and reference implementations for exercising the pipeline
//! end-to-end.
//!
//! # Contracts
//!
//! - [`EosModel`] — the expensive physics evaluator:
//!   `(energy, density) → (pressure, sound_speed_sq, bulk_modulus, temperature)`.
//! - [`SurrogateModel`] — the cheap approximation over the same mapping.
//! - [`UqModel`] — the acceptability oracle: one boolean per sample,
//!   `true` meaning the surrogate answer can stand.
//!
//! The core holds one optional evaluator of each kind per material
//! (`Option<Box<dyn …>>`); absence is a normal control state, not an
//! error. Evaluator failure, on the other hand, is fatal — the core never
//! retries.
//!
//! # Reference Implementations
//!
//! - [`IdealGasEos`] — the γ-law gas every EOS mini-application starts
//!   from.
//! - [`AffineSurrogate`] — a per-output affine map over the two inputs,
//!   standing in for a trained network.
//! - [`BoundsUq`] — accepts samples inside a trained input bounding box,
//!   standing in for a hash-domain distance cache.

mod affine;
mod bounds_uq;
mod contracts;
mod error;
mod ideal_gas;

pub use affine::AffineSurrogate;
pub use bounds_uq::BoundsUq;
pub use contracts::{EosModel, SurrogateModel, UqModel};
pub use error::EvalError;
pub use ideal_gas::IdealGasEos;

/// Input features per sample: density, energy.
pub const NUM_INPUTS: usize = 2;

/// Output quantities per sample: pressure, sound speed squared,
/// bulk modulus, temperature.
pub const NUM_OUTPUTS: usize = 4;
