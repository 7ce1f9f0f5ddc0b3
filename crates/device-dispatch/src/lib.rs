// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # device-dispatch
//!
//! Host/device execution mode and the data-parallel kernel entry points
//! used by the data handler.
//!
//! # Key Components
//!
//! - [`ExecutionMode`] — whether sample-dimension loops run as sequential
//!   host scans or as data-parallel device kernels.
//! - [`DispatchContext`] — the small context object threaded into every
//!   data-handler routine. The mode is fixed at construction; there is no
//!   way to flip it mid-invocation.
//! - [`kernels`] — the device-side companions of the data-handler
//!   operations: feature linearization, predicate compaction (pack/unpack
//!   in both the predicate-preserving and index-materialising variants),
//!   and per-material gather/scatter.
//!
//! # Execution Model
//!
//! Every kernel is parallel over the sample dimension and joins before
//! returning, so a kernel call behaves as a blocking operation from the
//! caller's point of view: any subsequent host read observes completed
//! writes.

mod context;
pub mod kernels;

pub use context::{DispatchContext, ExecutionMode};
