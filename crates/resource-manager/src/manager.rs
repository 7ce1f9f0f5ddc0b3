// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The typed allocation facade.
//!
//! [`ResourceManager`] hands out zero-initialised typed buffers on either
//! memory space, tracks live bytes against an optional ceiling, and keeps
//! an address registry so it can answer `is_on_device` for any pointer it
//! produced.
//!
//! # Thread Safety
//! `ResourceManager` is cheaply cloneable (`Arc` inside) and `Send + Sync`;
//! all interior mutability is behind `Mutex` or `AtomicUsize`.

use crate::{AllocationStats, MemoryBudget, MemoryError, MemorySpace, ScratchGuard};
use device_dispatch::DispatchContext;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A registered live allocation.
#[derive(Debug, Clone, Copy)]
struct Registration {
    len_bytes: usize,
    space: MemorySpace,
}

/// Internal manager state, shared with scratch guards via `Arc`.
pub(crate) struct ManagerInner {
    /// Default space for `allocate` (set once at startup).
    default_space: MemorySpace,
    /// Optional hard ceiling on live bytes.
    ceiling: Option<MemoryBudget>,
    /// Currently allocated bytes (live, not yet released).
    allocated_bytes: AtomicUsize,
    /// Live allocations keyed by start address.
    registry: Mutex<BTreeMap<usize, Registration>>,
    /// Statistics (behind a Mutex since updates are infrequent).
    stats: Mutex<AllocationStats>,
}

impl ManagerInner {
    /// Called by `ScratchGuard::drop` to release an allocation.
    pub(crate) fn release(&self, addr: usize, size_bytes: usize) {
        self.allocated_bytes.fetch_sub(size_bytes, Ordering::Release);
        if let Ok(mut registry) = self.registry.lock() {
            registry.remove(&addr);
        }
        if let Ok(mut stats) = self.stats.lock() {
            stats.record_deallocation();
        }
    }
}

/// The allocation facade every transient buffer goes through.
///
/// # Example
/// ```
/// use resource_manager::{MemorySpace, ResourceManager};
///
/// let rm = ResourceManager::new(MemorySpace::Device);
/// let buf = rm.allocate::<f64>(16).unwrap();
/// assert!(rm.is_on_device(buf.as_slice().as_ptr()));
/// assert!(rm.dispatch_context().is_device_execution());
/// ```
#[derive(Clone)]
pub struct ResourceManager {
    inner: Arc<ManagerInner>,
}

impl ResourceManager {
    /// Creates a manager whose default space is `default_space`, with no
    /// ceiling on live bytes.
    pub fn new(default_space: MemorySpace) -> Self {
        Self::build(default_space, None)
    }

    /// Creates a manager with a hard ceiling on live bytes.
    pub fn with_ceiling(default_space: MemorySpace, ceiling: MemoryBudget) -> Self {
        Self::build(default_space, Some(ceiling))
    }

    /// Creates a manager from a process-wide allocator name
    /// (`"host"` or `"device"`).
    pub fn from_allocator_name(name: &str) -> Result<Self, MemoryError> {
        let space = MemorySpace::parse(name)?;
        tracing::info!("resource manager: default allocator '{space}'");
        Ok(Self::new(space))
    }

    fn build(default_space: MemorySpace, ceiling: Option<MemoryBudget>) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                default_space,
                ceiling,
                allocated_bytes: AtomicUsize::new(0),
                registry: Mutex::new(BTreeMap::new()),
                stats: Mutex::new(AllocationStats::default()),
            }),
        }
    }

    /// Allocates `n` zero-initialised elements on the default space.
    pub fn allocate<T>(&self, n: usize) -> Result<ScratchGuard<T>, MemoryError>
    where
        T: Copy + Default + Send + Sync + 'static,
    {
        self.allocate_in(self.inner.default_space, n)
    }

    /// Allocates `n` zero-initialised elements pinned to `space`.
    pub fn allocate_in<T>(
        &self,
        space: MemorySpace,
        n: usize,
    ) -> Result<ScratchGuard<T>, MemoryError>
    where
        T: Copy + Default + Send + Sync + 'static,
    {
        if n == 0 {
            return Err(MemoryError::ZeroSizedAllocation);
        }
        let size_bytes = n * std::mem::size_of::<T>();

        if let Some(ceiling) = self.inner.ceiling {
            let current = self.inner.allocated_bytes.load(Ordering::Acquire);
            let budget = ceiling.as_bytes();
            if current + size_bytes > budget {
                if let Ok(mut stats) = self.inner.stats.lock() {
                    stats.record_oom();
                }
                return Err(MemoryError::OutOfMemory {
                    requested_bytes: size_bytes,
                    available_bytes: budget.saturating_sub(current),
                    budget_bytes: budget,
                });
            }
        }

        let data = vec![T::default(); n];
        let addr = data.as_ptr() as usize;

        if let Ok(mut registry) = self.inner.registry.lock() {
            registry.insert(
                addr,
                Registration {
                    len_bytes: size_bytes,
                    space,
                },
            );
        }
        self.inner
            .allocated_bytes
            .fetch_add(size_bytes, Ordering::Release);
        if let Ok(mut stats) = self.inner.stats.lock() {
            stats.record_allocation(size_bytes);
            let current = self.inner.allocated_bytes.load(Ordering::Acquire);
            stats.update_peak(current);
        }

        Ok(ScratchGuard::new(
            data,
            Arc::clone(&self.inner),
            space,
            size_bytes,
            addr,
        ))
    }

    /// The memory space a pointer belongs to, if the manager allocated it.
    pub fn space_of<T>(&self, ptr: *const T) -> Option<MemorySpace> {
        let addr = ptr as usize;
        let registry = self.inner.registry.lock().ok()?;
        let (&start, registration) = registry.range(..=addr).next_back()?;
        if addr < start + registration.len_bytes {
            Some(registration.space)
        } else {
            None
        }
    }

    /// Whether `ptr` refers to device memory. Pointers the manager never
    /// produced (e.g. caller-owned block tensors) answer `false`.
    pub fn is_on_device<T>(&self, ptr: *const T) -> bool {
        matches!(self.space_of(ptr), Some(MemorySpace::Device))
    }

    /// The default memory space (set at startup).
    pub fn default_space(&self) -> MemorySpace {
        self.inner.default_space
    }

    /// Whether the default space implies device execution.
    pub fn is_device_execution(&self) -> bool {
        self.inner.default_space.is_device()
    }

    /// A dispatch context matching the default space. Data-handler
    /// routines take this instead of re-reading global state.
    pub fn dispatch_context(&self) -> DispatchContext {
        DispatchContext::new(self.inner.default_space.execution_mode())
    }

    /// Currently allocated bytes (live, not yet released).
    pub fn allocated_bytes(&self) -> usize {
        self.inner.allocated_bytes.load(Ordering::Acquire)
    }

    /// Returns a snapshot of allocation statistics.
    pub fn stats(&self) -> AllocationStats {
        self.inner
            .stats
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManager")
            .field("default_space", &self.inner.default_space)
            .field("ceiling", &self.inner.ceiling)
            .field("allocated_bytes", &self.allocated_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_drop() {
        let rm = ResourceManager::new(MemorySpace::Host);

        let guard = rm.allocate::<f64>(128).unwrap();
        assert_eq!(rm.allocated_bytes(), 128 * 8);
        assert_eq!(guard.size_bytes(), 128 * 8);

        drop(guard);
        assert_eq!(rm.allocated_bytes(), 0);
    }

    #[test]
    fn test_buffers_are_zeroed() {
        let rm = ResourceManager::new(MemorySpace::Host);
        let predicate = rm.allocate::<bool>(64).unwrap();
        assert!(predicate.as_slice().iter().all(|&p| !p));

        let values = rm.allocate::<f64>(64).unwrap();
        assert!(values.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_allocation() {
        let rm = ResourceManager::new(MemorySpace::Host);
        let result = rm.allocate::<f64>(0);
        assert!(matches!(result, Err(MemoryError::ZeroSizedAllocation)));
    }

    #[test]
    fn test_ceiling_oom() {
        let rm = ResourceManager::with_ceiling(MemorySpace::Host, MemoryBudget::from_bytes(1024));

        let _a = rm.allocate::<u8>(512).unwrap();
        let _b = rm.allocate::<u8>(512).unwrap();
        let result = rm.allocate::<u8>(1);
        assert!(matches!(result, Err(MemoryError::OutOfMemory { .. })));

        let stats = rm.stats();
        assert_eq!(stats.oom_count, 1);
    }

    #[test]
    fn test_registry_space_lookup() {
        let rm = ResourceManager::new(MemorySpace::Host);
        let device = rm.allocate_in::<f64>(MemorySpace::Device, 8).unwrap();
        let host = rm.allocate_in::<f64>(MemorySpace::Host, 8).unwrap();

        assert!(rm.is_on_device(device.as_slice().as_ptr()));
        assert!(!rm.is_on_device(host.as_slice().as_ptr()));

        // Interior pointer still resolves.
        let interior = unsafe { device.as_slice().as_ptr().add(4) };
        assert!(rm.is_on_device(interior));

        // Unknown pointer answers false.
        let outside = vec![0.0f64; 4];
        assert!(!rm.is_on_device(outside.as_ptr()));
    }

    #[test]
    fn test_release_unregisters() {
        let rm = ResourceManager::new(MemorySpace::Device);
        let guard = rm.allocate::<f64>(8).unwrap();
        let ptr = guard.as_slice().as_ptr();
        assert!(rm.is_on_device(ptr));

        drop(guard);
        assert!(!rm.is_on_device(ptr));
    }

    #[test]
    fn test_dispatch_context_follows_space() {
        let host = ResourceManager::new(MemorySpace::Host);
        assert!(!host.dispatch_context().is_device_execution());

        let device = ResourceManager::new(MemorySpace::Device);
        assert!(device.dispatch_context().is_device_execution());
        assert!(device.is_device_execution());
    }

    #[test]
    fn test_from_allocator_name() {
        let rm = ResourceManager::from_allocator_name("device").unwrap();
        assert_eq!(rm.default_space(), MemorySpace::Device);
        assert!(ResourceManager::from_allocator_name("cuda-pinned").is_err());
    }

    #[test]
    fn test_stats_peak() {
        let rm = ResourceManager::new(MemorySpace::Host);
        let a = rm.allocate::<u8>(1000).unwrap();
        let b = rm.allocate::<u8>(2000).unwrap();
        drop(a);
        drop(b);

        let stats = rm.stats();
        assert_eq!(stats.peak_allocated_bytes, 3000);
        assert_eq!(stats.total_allocations, 2);
        assert_eq!(stats.total_deallocations, 2);
    }

    #[test]
    fn test_fill() {
        let rm = ResourceManager::new(MemorySpace::Host);
        let mut guard = rm.allocate::<f64>(4).unwrap();
        guard.fill(7.5);
        assert!(guard.as_slice().iter().all(|&v| v == 7.5));
    }
}
