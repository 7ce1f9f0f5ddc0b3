// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII scratch guard that releases its allocation on drop.
//!
//! [`ScratchGuard`] is what makes the transient-buffer discipline hold:
//! packed buffers, predicates, and dense gathers are all guards, so they
//! are released on every exit path of the scope that allocated them —
//! early returns and unwinding included.

use crate::manager::ManagerInner;
use crate::MemorySpace;
use std::sync::Arc;

/// An RAII guard wrapping a typed scratch buffer.
///
/// The buffer is zero-initialised on allocation. When the guard is
/// dropped, its bytes leave the manager's accounting and its address
/// leaves the registry.
///
/// # Example
/// ```ignore
/// let mut p = rm.allocate::<bool>(n)?;   // all-false predicate
/// uq.evaluate(n, inputs, p.as_mut_slice())?;
/// // `p` released here, error or not
/// ```
pub struct ScratchGuard<T: Copy + Send + Sync + 'static> {
    /// The buffer. Wrapped in `Option` so we can `take()` it in `drop()`.
    data: Option<Vec<T>>,
    /// Handle back to the manager for release accounting.
    inner: Arc<ManagerInner>,
    /// Space this buffer lives in.
    space: MemorySpace,
    /// Size of this allocation in bytes.
    size_bytes: usize,
    /// Registry key (start address of the buffer).
    addr: usize,
}

impl<T: Copy + Send + Sync + 'static> ScratchGuard<T> {
    pub(crate) fn new(
        data: Vec<T>,
        inner: Arc<ManagerInner>,
        space: MemorySpace,
        size_bytes: usize,
        addr: usize,
    ) -> Self {
        Self {
            data: Some(data),
            inner,
            space,
            size_bytes,
            addr,
        }
    }

    /// Returns an immutable view of the buffer.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_ref().expect("buffer already consumed")
    }

    /// Returns a mutable view of the buffer.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_mut().expect("buffer already consumed")
    }

    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Bulk-sets every element (the memset companion of allocation).
    pub fn fill(&mut self, value: T) {
        self.as_mut_slice().fill(value);
    }

    /// The memory space this buffer lives in.
    pub fn space(&self) -> MemorySpace {
        self.space
    }

    /// Size of this allocation in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

impl<T: Copy + Send + Sync + 'static> Drop for ScratchGuard<T> {
    fn drop(&mut self) {
        if let Some(buffer) = self.data.take() {
            self.inner.release(self.addr, self.size_bytes);
            drop(buffer);
        }
    }
}

impl<T: Copy + Send + Sync + 'static> std::fmt::Debug for ScratchGuard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchGuard")
            .field("space", &self.space)
            .field("size_bytes", &self.size_bytes)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}
