// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Memory spaces and allocator-name parsing.

use crate::MemoryError;
use device_dispatch::ExecutionMode;
use std::fmt;

/// The memory space an allocation lives in.
///
/// Selecting the device allocator at startup implies device execution:
/// the manager's [`dispatch context`](crate::ResourceManager::dispatch_context)
/// mirrors its default space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySpace {
    /// Ordinary host memory.
    Host,
    /// Device-resident memory.
    Device,
}

impl MemorySpace {
    /// Parses a process-wide allocator name configured at startup.
    ///
    /// Accepts `"host"` and `"device"` (case-insensitive).
    pub fn parse(name: &str) -> Result<Self, MemoryError> {
        match name.trim().to_lowercase().as_str() {
            "host" => Ok(Self::Host),
            "device" => Ok(Self::Device),
            other => Err(MemoryError::UnknownAllocator(other.to_string())),
        }
    }

    /// The execution mode implied by this space.
    pub fn execution_mode(self) -> ExecutionMode {
        match self {
            Self::Host => ExecutionMode::Host,
            Self::Device => ExecutionMode::Device,
        }
    }

    /// Returns `true` for [`MemorySpace::Device`].
    pub fn is_device(self) -> bool {
        matches!(self, Self::Device)
    }
}

impl fmt::Display for MemorySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => f.write_str("host"),
            Self::Device => f.write_str("device"),
        }
    }
}
