// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! num_mats = 5
//! num_elems = 10000
//! num_qpts = 64
//! is_cpu = true
//! pack_sparse_mats = true
//! allocator = "host"
//! partition_budget = "2M"
//! db_path = "miniApp_data.txt"
//! ```

use crate::RuntimeError;
use resource_manager::{MemoryBudget, MemorySpace};
use std::path::{Path, PathBuf};

/// Construction parameters of the evaluation runtime. Immutable once the
/// runtime is built.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RuntimeConfig {
    /// Number of materials `M`.
    pub num_mats: usize,
    /// Maximum elements per material `E`.
    pub num_elems: usize,
    /// Quadrature points per element `Q`.
    pub num_qpts: usize,
    /// Whether this is a CPU platform. Must agree with `allocator`.
    pub is_cpu: bool,
    /// Whether the material loop may take the sparse gather path.
    /// Dense lookups win on GPUs; on CPUs with expensive EOS models the
    /// gather→evaluate→scatter route is faster.
    #[serde(default = "default_true")]
    pub pack_sparse_mats: bool,
    /// Process-wide allocator name: `"host"` or `"device"`. Selecting the
    /// device allocator implies device execution.
    #[serde(default = "default_allocator")]
    pub allocator: String,
    /// Per-partition scratch budget (human-readable, e.g. `"2M"`).
    #[serde(default = "default_budget")]
    pub partition_budget: String,
    /// Offline store file for physics-fallback samples. Only consulted
    /// when the `db` feature is enabled.
    pub db_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_allocator() -> String {
    "host".to_string()
}

fn default_budget() -> String {
    "2M".to_string()
}

impl RuntimeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::Config(format!("TOML serialise error: {e}")))
    }

    /// Parses the allocator name into a memory space.
    pub fn parse_allocator(&self) -> Result<MemorySpace, RuntimeError> {
        MemorySpace::parse(&self.allocator)
            .map_err(|e| RuntimeError::Config(format!("invalid allocator: {e}")))
    }

    /// Parses the partition budget string.
    pub fn parse_partition_budget(&self) -> Result<MemoryBudget, RuntimeError> {
        MemoryBudget::parse(&self.partition_budget)
            .map_err(|e| RuntimeError::Config(format!("invalid partition budget: {e}")))
    }

    /// Checks dimensional and platform consistency.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.num_mats == 0 || self.num_elems == 0 || self.num_qpts == 0 {
            return Err(RuntimeError::Config(format!(
                "mesh dimensions must be nonzero: num_mats={}, num_elems={}, num_qpts={}",
                self.num_mats, self.num_elems, self.num_qpts
            )));
        }
        let space = self.parse_allocator()?;
        if self.is_cpu == space.is_device() {
            return Err(RuntimeError::Config(format!(
                "is_cpu = {} contradicts allocator '{}'",
                self.is_cpu, self.allocator
            )));
        }
        self.parse_partition_budget()?;
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            num_mats: 5,
            num_elems: 10000,
            num_qpts: 64,
            is_cpu: true,
            pack_sparse_mats: true,
            allocator: default_allocator(),
            partition_budget: default_budget(),
            db_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        let c = RuntimeConfig::default();
        c.validate().unwrap();
        assert_eq!(c.num_mats, 5);
        assert!(c.pack_sparse_mats);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
num_mats = 3
num_elems = 100
num_qpts = 4
is_cpu = false
allocator = "device"
partition_budget = "512K"
"#;
        let c = RuntimeConfig::from_toml(toml).unwrap();
        c.validate().unwrap();
        assert_eq!(c.num_mats, 3);
        assert!(!c.is_cpu);
        assert_eq!(c.parse_allocator().unwrap(), MemorySpace::Device);
        assert_eq!(c.parse_partition_budget().unwrap().as_bytes(), 512 * 1024);
        assert!(c.pack_sparse_mats); // defaulted
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = RuntimeConfig::default();
        let toml = c.to_toml().unwrap();
        let back = RuntimeConfig::from_toml(&toml).unwrap();
        assert_eq!(back.num_mats, c.num_mats);
        assert_eq!(back.allocator, c.allocator);
        assert_eq!(back.partition_budget, c.partition_budget);
    }

    #[test]
    fn test_rejects_zero_dims() {
        let c = RuntimeConfig {
            num_qpts: 0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_platform_contradiction() {
        let c = RuntimeConfig {
            is_cpu: true,
            allocator: "device".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());

        let c = RuntimeConfig {
            is_cpu: false,
            allocator: "host".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_budget() {
        let c = RuntimeConfig {
            partition_budget: "lots".into(),
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }
}
