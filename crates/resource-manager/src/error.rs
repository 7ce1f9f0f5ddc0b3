// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for scratch allocation.

/// Errors that can occur during allocation and space selection.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The requested allocation would exceed the scratch budget.
    #[error("out of memory: requested {requested_bytes} bytes, but only {available_bytes} available (budget: {budget_bytes})")]
    OutOfMemory {
        requested_bytes: usize,
        available_bytes: usize,
        budget_bytes: usize,
    },

    /// Attempted to allocate a zero-sized buffer.
    #[error("cannot allocate zero-sized buffer")]
    ZeroSizedAllocation,

    /// The configured allocator name is not recognised.
    #[error("unknown allocator '{0}'; expected 'host' or 'device'")]
    UnknownAllocator(String),

    /// A budget string could not be parsed.
    #[error("invalid memory budget: {0}")]
    InvalidBudget(String),
}
