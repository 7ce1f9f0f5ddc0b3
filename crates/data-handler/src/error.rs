// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for data movement.

/// Errors that can occur in casting, packing, and layout transformation.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Pack/unpack feature-set sizes disagree.
    #[error("packing arrays size mismatch: {sparse} sparse vs {dense} dense features")]
    ShapeMismatch { sparse: usize, dense: usize },

    /// A buffer is shorter than the operation requires.
    #[error("buffer length mismatch: need at least {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A feature-set argument holds no features.
    #[error("empty feature set")]
    EmptyFeatureSet,

    /// The sparse element index table violates its layout invariants.
    #[error("malformed sparse element table: {0}")]
    MalformedIndexTable(String),

    /// A block tensor has different dimensions than the operation expects.
    #[error("block tensor dimension mismatch: expected (qpts, elems, mats) = {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// Scratch allocation failed.
    #[error(transparent)]
    Memory(#[from] resource_manager::MemoryError),
}
