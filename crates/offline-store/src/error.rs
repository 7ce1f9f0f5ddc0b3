// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the offline store.

use std::path::PathBuf;

/// Errors that can occur while appending records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file could not be opened for appending.
    #[error("cannot open store file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing records failed.
    #[error("store write failed: {0}")]
    Write(#[from] std::io::Error),

    /// The declared feature counts disagree with the provided buffers.
    #[error("store feature count mismatch: declared {declared}, got {actual}")]
    FeatureCountMismatch { declared: usize, actual: usize },

    /// A feature buffer is shorter than the declared sample count.
    #[error("store buffer too short: need {expected} samples, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },
}
