// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The per-material evaluation pipeline.
//!
//! For one material's sample stream the pipeline runs:
//!
//! ```text
//! UQ check → surrogate inference → predicate pack → physics fallback
//!          → (optional DB store) → unpack
//! ```
//!
//! over memory-bounded partitions. The surrogate writes *every* output
//! position of a partition first; the physics unpack then overwrites the
//! rejected subset. At partition exit every output position holds exactly
//! one value: surrogate where the predicate accepted, physics where it
//! did not.
//!
//! Packing limits scratch to the partition budget and indirectly bounds
//! the surrogate's batch size. Partitions can be imbalanced: the
//! predicate is only inspected per partition window, so packed buffers
//! fill to at most the window size and are often half-empty.

use crate::{MaterialMetrics, RuntimeError};
use data_handler::{
    compute_partition_size, pack, pack_indexed, unpack, unpack_indexed, Scalar,
};
use device_dispatch::DispatchContext;
use eval_models::{EosModel, SurrogateModel, UqModel, NUM_INPUTS, NUM_OUTPUTS};
use resource_manager::{MemoryBudget, ResourceManager};

/// One material's view of the runtime: its three optional evaluators plus
/// the shared allocation facade and dispatch context.
pub(crate) struct MaterialPipeline<'a, V: Scalar> {
    pub rm: &'a ResourceManager,
    pub ctx: DispatchContext,
    pub partition_budget: MemoryBudget,
    pub eos: Option<&'a dyn EosModel<V>>,
    pub surrogate: Option<&'a dyn SurrogateModel<V>>,
    pub uq: Option<&'a dyn UqModel<V>>,
    #[cfg(feature = "db")]
    pub store: Option<&'a mut offline_store::OfflineStore>,
}

impl<V: Scalar> MaterialPipeline<'_, V> {
    /// Runs the pipeline over `n` samples of material `mat_idx`.
    ///
    /// The six buffers may alias the driver's dense gather buffers or
    /// point straight into the caller's block tensors; the pipeline only
    /// sees flat sample streams.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn evaluate(
        &mut self,
        mat_idx: usize,
        n: usize,
        density: &[V],
        energy: &[V],
        pressure: &mut [V],
        sound_speed_sq: &mut [V],
        bulk_modulus: &mut [V],
        temperature: &mut [V],
        metrics: &mut MaterialMetrics,
    ) -> Result<(), RuntimeError> {
        // Zero-initialised predicate: with no UQ oracle nothing is
        // acceptable and physics covers every sample.
        let mut acceptable = self.rm.allocate::<bool>(n)?;

        if let Some(uq) = self.uq {
            uq.evaluate(n, &[density, energy], acceptable.as_mut_slice())
                .map_err(|source| RuntimeError::Evaluator { mat_idx, source })?;
        }

        // The reindex slot is budgeted whether or not this partition ends
        // up materialising indices.
        let part =
            compute_partition_size::<V>(self.partition_budget, NUM_INPUTS, NUM_OUTPUTS, true);

        let mut p_id = 0;
        while p_id < n {
            let len = part.min(n - p_id);
            self.run_partition(
                mat_idx,
                p_id,
                len,
                &acceptable.as_slice()[p_id..p_id + len],
                density,
                energy,
                pressure,
                sound_speed_sq,
                bulk_modulus,
                temperature,
                metrics,
            )?;
            p_id += part;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn run_partition(
        &mut self,
        mat_idx: usize,
        p_id: usize,
        len: usize,
        predicate: &[bool],
        density: &[V],
        energy: &[V],
        pressure: &mut [V],
        sound_speed_sq: &mut [V],
        bulk_modulus: &mut [V],
        temperature: &mut [V],
        metrics: &mut MaterialMetrics,
    ) -> Result<(), RuntimeError> {
        let sparse_density = &density[p_id..p_id + len];
        let sparse_energy = &energy[p_id..p_id + len];

        let mut packed_density = self.rm.allocate::<V>(len)?;
        let mut packed_energy = self.rm.allocate::<V>(len)?;
        let mut packed_pressure = self.rm.allocate::<V>(len)?;
        let mut packed_sound_speed_sq = self.rm.allocate::<V>(len)?;
        let mut packed_bulk_modulus = self.rm.allocate::<V>(len)?;
        let mut packed_temperature = self.rm.allocate::<V>(len)?;
        // The device path materialises reverse indices instead of
        // re-scanning the predicate at unpack time.
        let mut reindex = if self.ctx.is_device_execution() {
            Some(self.rm.allocate::<u32>(len)?)
        } else {
            None
        };

        if let Some(surrogate) = self.surrogate {
            // The surrogate covers the whole partition up front; packing
            // below also caps its batch size at the partition length.
            surrogate
                .eval(
                    len,
                    &[sparse_density, sparse_energy],
                    &mut [
                        &mut pressure[p_id..p_id + len],
                        &mut sound_speed_sq[p_id..p_id + len],
                        &mut bulk_modulus[p_id..p_id + len],
                        &mut temperature[p_id..p_id + len],
                    ],
                )
                .map_err(|source| RuntimeError::Evaluator { mat_idx, source })?;

            #[cfg(feature = "surrogate-debug")]
            if let Some(eos) = self.eos {
                let rmse = eos
                    .compute_rmse(
                        len,
                        sparse_energy,
                        sparse_density,
                        &pressure[p_id..p_id + len],
                        &sound_speed_sq[p_id..p_id + len],
                        &bulk_modulus[p_id..p_id + len],
                        &temperature[p_id..p_id + len],
                    )
                    .map_err(|source| RuntimeError::Evaluator { mat_idx, source })?;
                tracing::debug!("material {mat_idx}: surrogate rmse {rmse:?}");
            }
        }

        // Collect the rejected samples (predicate == false).
        let npacked = match reindex.as_mut() {
            Some(reindex) => pack_indexed(
                self.ctx,
                predicate,
                reindex.as_mut_slice(),
                len,
                &[sparse_density, sparse_energy],
                &mut [packed_density.as_mut_slice(), packed_energy.as_mut_slice()],
                false,
            )?,
            None => pack(
                self.ctx,
                predicate,
                len,
                &[sparse_density, sparse_energy],
                &mut [packed_density.as_mut_slice(), packed_energy.as_mut_slice()],
                false,
            )?,
        };

        tracing::debug!(
            "material {mat_idx}: partition at {p_id}: physics/surrogate [{}/{}] ({:.2})",
            npacked,
            len - npacked,
            npacked as f64 / len as f64,
        );
        metrics.partitions += 1;
        metrics.accepted_samples += len - npacked;
        metrics.fallback_samples += npacked;

        if npacked > 0 {
            if let Some(eos) = self.eos {
                eos.eval(
                    npacked,
                    packed_energy.as_slice(),
                    packed_density.as_slice(),
                    packed_pressure.as_mut_slice(),
                    packed_sound_speed_sq.as_mut_slice(),
                    packed_bulk_modulus.as_mut_slice(),
                    packed_temperature.as_mut_slice(),
                )
                .map_err(|source| RuntimeError::Evaluator { mat_idx, source })?;

                // The fallback samples are the training set: inputs and
                // freshly computed physics outputs, packed length only.
                #[cfg(feature = "db")]
                if let Some(store) = self.store.as_deref_mut() {
                    store.store(
                        npacked,
                        NUM_INPUTS,
                        NUM_OUTPUTS,
                        &[
                            &packed_density.as_slice()[..npacked],
                            &packed_energy.as_slice()[..npacked],
                        ],
                        &[
                            &packed_pressure.as_slice()[..npacked],
                            &packed_sound_speed_sq.as_slice()[..npacked],
                            &packed_bulk_modulus.as_slice()[..npacked],
                            &packed_temperature.as_slice()[..npacked],
                        ],
                    )?;
                }

                // Scatter physics outputs over the surrogate's earlier
                // write at the rejected positions.
                let packed_outputs = [
                    &packed_pressure.as_slice()[..npacked],
                    &packed_sound_speed_sq.as_slice()[..npacked],
                    &packed_bulk_modulus.as_slice()[..npacked],
                    &packed_temperature.as_slice()[..npacked],
                ];
                let mut sparse_outputs = [
                    &mut pressure[p_id..p_id + len],
                    &mut sound_speed_sq[p_id..p_id + len],
                    &mut bulk_modulus[p_id..p_id + len],
                    &mut temperature[p_id..p_id + len],
                ];
                match reindex.as_ref() {
                    Some(reindex) => unpack_indexed(
                        self.ctx,
                        reindex.as_slice(),
                        npacked,
                        &packed_outputs,
                        &mut sparse_outputs,
                    )?,
                    None => unpack(
                        self.ctx,
                        predicate,
                        len,
                        &packed_outputs,
                        &mut sparse_outputs,
                        false,
                    )?,
                }
            } else {
                tracing::debug!(
                    "material {mat_idx}: no EOS registered, {npacked} rejected samples keep their prior values",
                );
            }
        }

        // Packed buffers (and the reindex table) release here.
        Ok(())
    }
}
