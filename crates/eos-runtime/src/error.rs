// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the evaluation runtime.

/// Errors that can occur during an evaluation run.
///
/// Every variant is fatal: the entry point surfaces the first one
/// unchanged, with no partial retry. Transient buffers are released on
/// the way out by their guards.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Scratch allocation failed.
    #[error("memory error: {0}")]
    Memory(#[from] resource_manager::MemoryError),

    /// A data-movement operation failed (shape mismatch, malformed
    /// index table, …).
    #[error("data error: {0}")]
    Data(#[from] data_handler::DataError),

    /// An evaluator failed while processing a material.
    #[error("evaluator error in material {mat_idx}: {source}")]
    Evaluator {
        mat_idx: usize,
        #[source]
        source: eval_models::EvalError,
    },

    /// Appending to the offline store failed.
    #[cfg(feature = "db")]
    #[error("offline store error: {0}")]
    Store(#[from] offline_store::StoreError),
}
