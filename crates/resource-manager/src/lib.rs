// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # resource-manager
//!
//! A typed scratch-allocation facade over host and device memory spaces.
//! Every transient buffer in the evaluation core — predicates, packed
//! feature buffers, dense per-material gathers — goes through this facade;
//! direct system allocators are not used.
//!
//! # Key Components
//!
//! - [`MemorySpace`] — host or device, selected per allocation or falling
//!   back to the manager's default (configured once at startup from the
//!   allocator name).
//! - [`MemoryBudget`] — an optional hard ceiling with human-readable
//!   parsing (`"512M"`, `"2G"`, etc.).
//! - [`ResourceManager`] — the allocator: hands out zero-initialised typed
//!   buffers, tracks live bytes against the budget, and keeps an address
//!   registry so `is_on_device` can answer for any pointer it produced.
//! - [`ScratchGuard`] — an RAII wrapper around an allocated buffer. When a
//!   guard is dropped, its bytes are released from the accounting on every
//!   exit path, including unwinding.
//! - [`AllocationStats`] — cumulative metrics (peak usage, OOM count).
//!
//! # Ownership Model
//!
//! ```text
//! ResourceManager::allocate::<V>(n)
//!       │
//!       ▼
//!   ScratchGuard<V>  ◄─── owns Vec<V>, holds Arc<ManagerInner>
//!       │
//!       │  drop()
//!       ▼
//!   ManagerInner::release()  ──► accounting + registry
//! ```
//!
//! # Example
//! ```
//! use resource_manager::{MemorySpace, ResourceManager};
//!
//! let rm = ResourceManager::new(MemorySpace::Host);
//! let mut buf = rm.allocate::<f64>(128).unwrap();
//! buf.as_mut_slice()[0] = 1.0;
//! assert_eq!(rm.allocated_bytes(), 128 * 8);
//!
//! drop(buf);
//! assert_eq!(rm.allocated_bytes(), 0);
//! ```

mod budget;
mod error;
mod guard;
mod manager;
mod space;
mod stats;

pub use budget::MemoryBudget;
pub use error::MemoryError;
pub use guard::ScratchGuard;
pub use manager::ResourceManager;
pub use space::MemorySpace;
pub use stats::AllocationStats;
