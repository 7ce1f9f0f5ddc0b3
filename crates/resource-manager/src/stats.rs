// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Allocation statistics for profiling and diagnostics.
//!
//! [`AllocationStats`] tracks cumulative metrics about scratch usage:
//! peak footprint, allocation churn, and OOM events. Useful for tuning
//! the partition budget.

/// Cumulative statistics about scratch allocation.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AllocationStats {
    /// Total number of allocation requests.
    pub total_allocations: u64,
    /// Total number of buffer releases (guard drops).
    pub total_deallocations: u64,
    /// Number of allocation requests that failed due to budget exhaustion.
    pub oom_count: u64,
    /// Peak live memory in bytes.
    pub peak_allocated_bytes: usize,
    /// Total bytes ever allocated (including released buffers).
    pub cumulative_allocated_bytes: u64,
}

impl AllocationStats {
    /// Records a successful allocation.
    pub(crate) fn record_allocation(&mut self, size: usize) {
        self.total_allocations += 1;
        self.cumulative_allocated_bytes += size as u64;
    }

    /// Records an OOM event.
    pub(crate) fn record_oom(&mut self) {
        self.total_allocations += 1;
        self.oom_count += 1;
    }

    /// Records a release (guard dropped).
    pub(crate) fn record_deallocation(&mut self) {
        self.total_deallocations += 1;
    }

    /// Updates the peak high-water mark if needed.
    pub(crate) fn update_peak(&mut self, current_bytes: usize) {
        if current_bytes > self.peak_allocated_bytes {
            self.peak_allocated_bytes = current_bytes;
        }
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let peak_kb = self.peak_allocated_bytes as f64 / 1024.0;
        format!(
            "Allocations: {} total, {} released, {} OOMs, peak {:.1} KB",
            self.total_allocations, self.total_deallocations, self.oom_count, peak_kb,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let s = AllocationStats::default();
        assert_eq!(s.total_allocations, 0);
        assert_eq!(s.peak_allocated_bytes, 0);
    }

    #[test]
    fn test_peak_tracking() {
        let mut s = AllocationStats::default();
        s.update_peak(100);
        s.update_peak(50);
        assert_eq!(s.peak_allocated_bytes, 100); // Doesn't decrease.
        s.update_peak(200);
        assert_eq!(s.peak_allocated_bytes, 200);
    }

    #[test]
    fn test_cumulative_bytes() {
        let mut s = AllocationStats::default();
        s.record_allocation(1000);
        s.record_allocation(500);
        assert_eq!(s.cumulative_allocated_bytes, 1500);
        assert_eq!(s.total_allocations, 2);
    }

    #[test]
    fn test_summary() {
        let mut s = AllocationStats::default();
        s.record_allocation(2048);
        s.update_peak(2048);
        let summary = s.summary();
        assert!(summary.contains("1 total"));
        assert!(summary.contains("2.0 KB"));
    }
}
