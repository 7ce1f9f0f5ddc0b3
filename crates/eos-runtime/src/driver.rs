// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The material loop driver.
//!
//! [`EosRuntime`] owns the per-material evaluator registrations and walks
//! the materials in index order. For each material with active elements
//! it either gathers the active samples into dense buffers and runs the
//! pipeline there (sparse path), or runs the pipeline directly on the
//! material's slice of the block tensors (dense path).
//!
//! Sparse lookups win on GPUs, but on CPUs with expensive EOS models the
//! gather→evaluate→scatter route is faster, so the sparse path is taken
//! when the platform is CPU, sparse packing is enabled, and the material
//! does not cover the whole mesh.
//!
//! The driver is a stateless sequence per invocation: no state machine,
//! materials in index order, partitions in index order.

use crate::pipeline::MaterialPipeline;
use crate::{EvaluationMetrics, MaterialMetrics, RuntimeConfig, RuntimeError};
use data_handler::{
    gather_material, scatter_material, BlockTensor, DataError, Scalar, SparseElementTable,
};
use device_dispatch::DispatchContext;
use eval_models::{EosModel, SurrogateModel, UqModel};
#[cfg(feature = "db")]
use offline_store::OfflineStore;
use resource_manager::{MemoryBudget, ResourceManager};
use std::time::Instant;

/// The surrogate-accelerated EOS evaluation runtime.
///
/// Construction parameters are fixed at [`EosRuntime::new`]; collaborators
/// are registered per material afterwards, any of them optional.
///
/// # Example
/// ```
/// use data_handler::{BlockTensor, SparseElementTable};
/// use eos_runtime::{EosRuntime, RuntimeConfig};
/// use eval_models::IdealGasEos;
///
/// let config = RuntimeConfig {
///     num_mats: 1,
///     num_elems: 4,
///     num_qpts: 2,
///     ..Default::default()
/// };
/// let mut runtime = EosRuntime::<f64>::new(config).unwrap();
/// runtime.register_eos(0, Box::new(IdealGasEos::default()));
///
/// let density = BlockTensor::from_fn(2, 4, 1, |_, _, _| 1.0);
/// let energy = BlockTensor::from_fn(2, 4, 1, |_, _, _| 2.0);
/// let table = SparseElementTable::from_material_lists(&[vec![0, 1, 2, 3]], 4).unwrap();
/// let mut pressure = BlockTensor::zeros(2, 4, 1);
/// let mut sound_speed_sq = BlockTensor::zeros(2, 4, 1);
/// let mut bulk_modulus = BlockTensor::zeros(2, 4, 1);
/// let mut temperature = BlockTensor::zeros(2, 4, 1);
///
/// runtime
///     .evaluate(
///         &density,
///         &energy,
///         &table,
///         &mut pressure,
///         &mut sound_speed_sq,
///         &mut bulk_modulus,
///         &mut temperature,
///     )
///     .unwrap();
/// ```
pub struct EosRuntime<V: Scalar> {
    config: RuntimeConfig,
    rm: ResourceManager,
    ctx: DispatchContext,
    partition_budget: MemoryBudget,
    eoses: Vec<Option<Box<dyn EosModel<V>>>>,
    surrogates: Vec<Option<Box<dyn SurrogateModel<V>>>>,
    uq_models: Vec<Option<Box<dyn UqModel<V>>>>,
    #[cfg(feature = "db")]
    store: Option<OfflineStore>,
    last_metrics: EvaluationMetrics,
}

impl<V: Scalar> EosRuntime<V> {
    /// Builds a runtime from validated construction parameters.
    ///
    /// The allocator name selects the default memory space, which in turn
    /// fixes the dispatch context for every invocation.
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        let space = config.parse_allocator()?;
        let rm = ResourceManager::new(space);
        let ctx = rm.dispatch_context();
        let partition_budget = config.parse_partition_budget()?;

        #[cfg(feature = "db")]
        let store = config
            .db_path
            .as_ref()
            .map(OfflineStore::open)
            .transpose()?;

        tracing::info!(
            "runtime: {} materials × {} elems × {} qpts, {} execution, partition budget {partition_budget}",
            config.num_mats,
            config.num_elems,
            config.num_qpts,
            ctx.mode(),
        );

        let num_mats = config.num_mats;
        Ok(Self {
            config,
            rm,
            ctx,
            partition_budget,
            eoses: (0..num_mats).map(|_| None).collect(),
            surrogates: (0..num_mats).map(|_| None).collect(),
            uq_models: (0..num_mats).map(|_| None).collect(),
            #[cfg(feature = "db")]
            store,
            last_metrics: EvaluationMetrics::default(),
        })
    }

    /// Registers the physics EOS for material `mat_idx`.
    ///
    /// # Panics
    /// Panics if `mat_idx >= num_mats`.
    pub fn register_eos(&mut self, mat_idx: usize, model: Box<dyn EosModel<V>>) {
        assert!(mat_idx < self.config.num_mats, "material {mat_idx} out of bounds");
        self.eoses[mat_idx] = Some(model);
    }

    /// Registers the surrogate for material `mat_idx`.
    ///
    /// # Panics
    /// Panics if `mat_idx >= num_mats`.
    pub fn register_surrogate(&mut self, mat_idx: usize, model: Box<dyn SurrogateModel<V>>) {
        assert!(mat_idx < self.config.num_mats, "material {mat_idx} out of bounds");
        self.surrogates[mat_idx] = Some(model);
    }

    /// Registers the UQ oracle for material `mat_idx`.
    ///
    /// # Panics
    /// Panics if `mat_idx >= num_mats`.
    pub fn register_uq(&mut self, mat_idx: usize, model: Box<dyn UqModel<V>>) {
        assert!(mat_idx < self.config.num_mats, "material {mat_idx} out of bounds");
        self.uq_models[mat_idx] = Some(model);
    }

    /// Evaluates every material: reads `density` and `energy`, writes the
    /// four output tensors at all active positions. Inactive positions
    /// keep their prior values.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &mut self,
        density: &BlockTensor<V>,
        energy: &BlockTensor<V>,
        table: &SparseElementTable,
        pressure: &mut BlockTensor<V>,
        sound_speed_sq: &mut BlockTensor<V>,
        bulk_modulus: &mut BlockTensor<V>,
        temperature: &mut BlockTensor<V>,
    ) -> Result<(), RuntimeError> {
        let expected = (
            self.config.num_qpts,
            self.config.num_elems,
            self.config.num_mats,
        );
        for dims in [
            density.dims(),
            energy.dims(),
            pressure.dims(),
            sound_speed_sq.dims(),
            bulk_modulus.dims(),
            temperature.dims(),
        ] {
            if dims != expected {
                return Err(DataError::DimensionMismatch {
                    expected,
                    actual: dims,
                }
                .into());
            }
        }
        if table.num_mats() != self.config.num_mats {
            return Err(RuntimeError::Config(format!(
                "sparse element table covers {} materials, runtime expects {}",
                table.num_mats(),
                self.config.num_mats
            )));
        }

        let started = Instant::now();
        self.last_metrics = EvaluationMetrics::default();

        for mat_idx in 0..self.config.num_mats {
            let active = table.active_elems(mat_idx);
            if active == 0 {
                tracing::debug!("material {mat_idx}: no active elements, skipping");
                continue;
            }

            let sparse_path = self.config.is_cpu
                && self.config.pack_sparse_mats
                && active < self.config.num_elems;

            let mat_metrics = if sparse_path {
                self.evaluate_sparse(
                    mat_idx,
                    active,
                    density,
                    energy,
                    table,
                    pressure,
                    sound_speed_sq,
                    bulk_modulus,
                    temperature,
                )?
            } else {
                self.evaluate_dense(
                    mat_idx,
                    active,
                    density,
                    energy,
                    pressure,
                    sound_speed_sq,
                    bulk_modulus,
                    temperature,
                )?
            };
            tracing::info!("{}", mat_metrics.summary());
            self.last_metrics.materials.push(mat_metrics);
        }

        self.last_metrics.total_duration = started.elapsed();
        tracing::debug!("{}", self.rm.stats().summary());
        Ok(())
    }

    /// Sparse path: gather the material's active elements into dense
    /// buffers, run the pipeline there, scatter the results back.
    #[allow(clippy::too_many_arguments)]
    fn evaluate_sparse(
        &mut self,
        mat_idx: usize,
        active: usize,
        density: &BlockTensor<V>,
        energy: &BlockTensor<V>,
        table: &SparseElementTable,
        pressure: &mut BlockTensor<V>,
        sound_speed_sq: &mut BlockTensor<V>,
        bulk_modulus: &mut BlockTensor<V>,
        temperature: &mut BlockTensor<V>,
    ) -> Result<MaterialMetrics, RuntimeError> {
        let n = active * self.config.num_qpts;
        tracing::info!("material {mat_idx}: using sparse packing for {active} elems");

        let mut dense_density = self.rm.allocate::<V>(n)?;
        let mut dense_energy = self.rm.allocate::<V>(n)?;
        let mut dense_pressure = self.rm.allocate::<V>(n)?;
        let mut dense_sound_speed_sq = self.rm.allocate::<V>(n)?;
        let mut dense_bulk_modulus = self.rm.allocate::<V>(n)?;
        let mut dense_temperature = self.rm.allocate::<V>(n)?;

        gather_material(
            self.ctx,
            mat_idx,
            table,
            &[density, energy],
            &mut [dense_density.as_mut_slice(), dense_energy.as_mut_slice()],
        )?;

        let mut metrics = MaterialMetrics::new(mat_idx, n, true);
        let mut pipeline = MaterialPipeline {
            rm: &self.rm,
            ctx: self.ctx,
            partition_budget: self.partition_budget,
            eos: self.eoses[mat_idx].as_deref(),
            surrogate: self.surrogates[mat_idx].as_deref(),
            uq: self.uq_models[mat_idx].as_deref(),
            #[cfg(feature = "db")]
            store: self.store.as_mut(),
        };
        pipeline.evaluate(
            mat_idx,
            n,
            dense_density.as_slice(),
            dense_energy.as_slice(),
            dense_pressure.as_mut_slice(),
            dense_sound_speed_sq.as_mut_slice(),
            dense_bulk_modulus.as_mut_slice(),
            dense_temperature.as_mut_slice(),
            &mut metrics,
        )?;

        scatter_material(
            self.ctx,
            mat_idx,
            table,
            &[
                dense_pressure.as_slice(),
                dense_sound_speed_sq.as_slice(),
                dense_bulk_modulus.as_slice(),
                dense_temperature.as_slice(),
            ],
            &mut [pressure, sound_speed_sq, bulk_modulus, temperature],
        )?;

        // Dense per-material buffers release here.
        Ok(metrics)
    }

    /// Dense path: run the pipeline directly on the material's slice of
    /// the block tensors, covering all `E · Q` positions.
    #[allow(clippy::too_many_arguments)]
    fn evaluate_dense(
        &mut self,
        mat_idx: usize,
        active: usize,
        density: &BlockTensor<V>,
        energy: &BlockTensor<V>,
        pressure: &mut BlockTensor<V>,
        sound_speed_sq: &mut BlockTensor<V>,
        bulk_modulus: &mut BlockTensor<V>,
        temperature: &mut BlockTensor<V>,
    ) -> Result<MaterialMetrics, RuntimeError> {
        let n = self.config.num_elems * self.config.num_qpts;
        tracing::info!("material {mat_idx}: using dense path for {active} elems");

        let mut metrics = MaterialMetrics::new(mat_idx, n, false);
        let mut pipeline = MaterialPipeline {
            rm: &self.rm,
            ctx: self.ctx,
            partition_budget: self.partition_budget,
            eos: self.eoses[mat_idx].as_deref(),
            surrogate: self.surrogates[mat_idx].as_deref(),
            uq: self.uq_models[mat_idx].as_deref(),
            #[cfg(feature = "db")]
            store: self.store.as_mut(),
        };
        pipeline.evaluate(
            mat_idx,
            n,
            density.mat_slice(mat_idx),
            energy.mat_slice(mat_idx),
            pressure.mat_slice_mut(mat_idx),
            sound_speed_sq.mat_slice_mut(mat_idx),
            bulk_modulus.mat_slice_mut(mat_idx),
            temperature.mat_slice_mut(mat_idx),
            &mut metrics,
        )?;
        Ok(metrics)
    }

    /// The construction parameters.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Metrics of the most recent `evaluate` invocation.
    pub fn metrics(&self) -> &EvaluationMetrics {
        &self.last_metrics
    }

    /// The allocation facade backing this runtime.
    pub fn resource_manager(&self) -> &ResourceManager {
        &self.rm
    }

    /// The dispatch context invocations run under.
    pub fn dispatch_context(&self) -> DispatchContext {
        self.ctx
    }

    /// Flushes the offline store, if one is attached.
    #[cfg(feature = "db")]
    pub fn flush_store(&mut self) -> Result<(), RuntimeError> {
        if let Some(store) = self.store.as_mut() {
            store.flush()?;
        }
        Ok(())
    }

    /// Records appended to the offline store so far.
    #[cfg(feature = "db")]
    pub fn store_records(&self) -> u64 {
        self.store.as_ref().map_or(0, |s| s.records_appended())
    }
}

impl<V: Scalar> std::fmt::Debug for EosRuntime<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EosRuntime")
            .field("config", &self.config)
            .field("mode", &self.ctx.mode())
            .finish()
    }
}
