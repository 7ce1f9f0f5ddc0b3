// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # offline-store
//!
//! An append-only record sink. Samples the surrogate could not cover are
//! streamed here so the offline training set grows with exactly the
//! physics-fallback population.
//!
//! One record per sample, `n_in + n_out` whitespace-separated scalar
//! values per record, records in append order (partition order, and
//! positional order within each partition). The file is the whole schema;
//! anything beyond append semantics is someone else's job.

mod error;
mod store;

pub use error::StoreError;
pub use store::OfflineStore;
