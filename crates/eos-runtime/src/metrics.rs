// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Evaluation metrics.
//!
//! [`EvaluationMetrics`] records, per material, how the dispatch policy
//! split the samples between the surrogate and the physics fallback.
//! The fallback fraction is the number to watch when tuning UQ
//! thresholds.

use std::time::Duration;

/// Dispatch counts for one material.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MaterialMetrics {
    /// Material index.
    pub mat_idx: usize,
    /// Samples processed (`E_m · Q`).
    pub total_samples: usize,
    /// Samples the UQ oracle accepted (surrogate answer stands).
    pub accepted_samples: usize,
    /// Samples packed for the physics fallback.
    pub fallback_samples: usize,
    /// Partitions the sample stream was split into.
    pub partitions: usize,
    /// Whether the sparse gather path was taken.
    pub sparse_path: bool,
}

impl MaterialMetrics {
    pub(crate) fn new(mat_idx: usize, total_samples: usize, sparse_path: bool) -> Self {
        Self {
            mat_idx,
            total_samples,
            accepted_samples: 0,
            fallback_samples: 0,
            partitions: 0,
            sparse_path,
        }
    }

    /// Fraction of samples that fell back to physics, in `[0.0, 1.0]`.
    pub fn fallback_fraction(&self) -> f64 {
        if self.total_samples == 0 {
            return 0.0;
        }
        self.fallback_samples as f64 / self.total_samples as f64
    }

    /// Returns a human-readable summary line.
    pub fn summary(&self) -> String {
        format!(
            "material {}: physics/surrogate [{}/{}] ({:.2}) over {} partitions{}",
            self.mat_idx,
            self.fallback_samples,
            self.accepted_samples,
            self.fallback_fraction(),
            self.partitions,
            if self.sparse_path { ", sparse" } else { ", dense" },
        )
    }
}

/// Aggregate metrics for one `evaluate` invocation.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct EvaluationMetrics {
    /// Wall-clock time of the invocation.
    pub total_duration: Duration,
    /// Per-material dispatch counts, in processing order. Skipped
    /// materials (`E_m == 0`) have no entry.
    pub materials: Vec<MaterialMetrics>,
}

impl EvaluationMetrics {
    /// Total physics-fallback samples across materials.
    pub fn total_fallback_samples(&self) -> usize {
        self.materials.iter().map(|m| m.fallback_samples).sum()
    }

    /// Total UQ-accepted samples across materials.
    pub fn total_accepted_samples(&self) -> usize {
        self.materials.iter().map(|m| m.accepted_samples).sum()
    }

    /// Returns a human-readable multi-line summary.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "evaluate: {} materials in {:.2?}, physics {} / surrogate {}",
            self.materials.len(),
            self.total_duration,
            self.total_fallback_samples(),
            self.total_accepted_samples(),
        )];
        for material in &self.materials {
            lines.push(format!("  {}", material.summary()));
        }
        lines.join("\n")
    }
}
