// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # eos-runtime
//!
//! The surrogate-accelerated per-material EOS evaluation core.
//!
//! The runtime takes:
//! - Block tensors from the caller (`density`, `energy` in; `pressure`,
//!   `sound_speed_sq`, `bulk_modulus`, `temperature` out).
//! - A `SparseElementTable` describing which elements are active per
//!   material.
//! - Up to three evaluators per material from `eval-models`: the physics
//!   EOS, a surrogate, and a UQ oracle — any of them optional.
//!
//! And runs, per material and per memory-bounded partition:
//!
//! ```text
//! UQ check → surrogate inference → predicate pack → physics fallback
//!          → (optional DB store) → unpack
//! ```
//!
//! so the expensive physics evaluator touches only the samples the UQ
//! oracle rejected. Rejected samples optionally stream to an append-only
//! offline store to grow the surrogate's training set.
//!
//! # Dispatch Policy
//! Per sample, exactly one evaluator's answer survives: the surrogate's
//! where the predicate accepted, physics everywhere else. With no UQ
//! oracle the predicate stays all-false and physics covers everything;
//! with no surrogate the partition still runs and packing selects every
//! sample.
//!
//! # Feature Flags
//! - `db` — wires the offline store into the pipeline.
//! - `surrogate-debug` — per-partition RMSE of the surrogate against the
//!   physics EOS.

mod config;
mod driver;
mod error;
mod metrics;
mod pipeline;

pub use config::RuntimeConfig;
pub use driver::EosRuntime;
pub use error::RuntimeError;
pub use metrics::{EvaluationMetrics, MaterialMetrics};
