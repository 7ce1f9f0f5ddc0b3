// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The file-backed append-only store.

use crate::StoreError;
use data_handler::Scalar;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends sample records to a single text file.
///
/// # Example
/// ```no_run
/// use offline_store::OfflineStore;
///
/// let mut store = OfflineStore::open("miniApp_data.txt").unwrap();
/// let density = [1.0f64];
/// let energy = [2.0f64];
/// let outputs = [[3.0f64], [4.0], [5.0], [6.0]];
/// store
///     .store(1, 2, 4, &[&density, &energy], &[&outputs[0], &outputs[1], &outputs[2], &outputs[3]])
///     .unwrap();
/// ```
pub struct OfflineStore {
    path: PathBuf,
    writer: BufWriter<std::fs::File>,
    records_appended: u64,
}

impl OfflineStore {
    /// Opens (or creates) the store file for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;
        tracing::info!("offline store: appending to '{}'", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            records_appended: 0,
        })
    }

    /// Appends `n` records, each the concatenation of the `n_in` input
    /// and `n_out` output values of one sample, in positional order.
    pub fn store<V: Scalar>(
        &mut self,
        n: usize,
        n_in: usize,
        n_out: usize,
        inputs: &[&[V]],
        outputs: &[&[V]],
    ) -> Result<(), StoreError> {
        if inputs.len() != n_in {
            return Err(StoreError::FeatureCountMismatch {
                declared: n_in,
                actual: inputs.len(),
            });
        }
        if outputs.len() != n_out {
            return Err(StoreError::FeatureCountMismatch {
                declared: n_out,
                actual: outputs.len(),
            });
        }
        for column in inputs.iter().chain(outputs.iter()) {
            if column.len() < n {
                return Err(StoreError::BufferTooShort {
                    expected: n,
                    actual: column.len(),
                });
            }
        }

        for i in 0..n {
            for (d, column) in inputs.iter().chain(outputs.iter()).enumerate() {
                if d > 0 {
                    self.writer.write_all(b" ")?;
                }
                write!(self.writer, "{}", column[i])?;
            }
            self.writer.write_all(b"\n")?;
        }
        self.records_appended += n as u64;
        Ok(())
    }

    /// Flushes buffered records to the file.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Total records appended through this handle.
    pub fn records_appended(&self) -> u64 {
        self.records_appended
    }

    /// The store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OfflineStore {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("offline store: final flush failed: {e}");
        }
    }
}

impl std::fmt::Debug for OfflineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineStore")
            .field("path", &self.path)
            .field("records_appended", &self.records_appended)
            .finish()
    }
}
