// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for evaluator calls.

/// Errors surfaced by evaluators. All of them are fatal to the
/// invocation; the core propagates the first one unchanged.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The evaluator itself failed (model backend, numeric blow-up, …).
    #[error("evaluator '{name}' failed: {detail}")]
    Failed { name: String, detail: String },

    /// The caller passed a different feature count than the evaluator
    /// was built for.
    #[error("evaluator feature count mismatch: expected {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    /// A sample buffer is shorter than the requested sample count.
    #[error("evaluator buffer too short: need {expected} samples, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },
}
