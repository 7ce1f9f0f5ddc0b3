// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Mini-application driver: a synthetic multi-material mesh evaluated
//! through the surrogate-accelerated pipeline.
//!
//! Builds a mesh where materials cover staggered element ranges, registers
//! an ideal-gas EOS everywhere, and gives the first materials a surrogate
//! plus a bounding-box UQ oracle, so the run shows all three dispatch
//! outcomes: surrogate-covered, physics-fallback, and pure physics.
//!
//! ```sh
//! cargo run --example miniapp
//! ```

use data_handler::{BlockTensor, SparseElementTable};
use eos_runtime::{EosRuntime, RuntimeConfig};
use eval_models::{AffineSurrogate, BoundsUq, IdealGasEos};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = RuntimeConfig {
        num_mats: 3,
        num_elems: 2000,
        num_qpts: 16,
        partition_budget: "64K".into(),
        ..Default::default()
    };
    let (num_qpts, num_elems, num_mats) = (config.num_qpts, config.num_elems, config.num_mats);

    let mut runtime = EosRuntime::<f64>::new(config)?;
    for m in 0..num_mats {
        runtime.register_eos(m, Box::new(IdealGasEos::new(1.6, 1.0)));
    }
    // Material 0: surrogate trusted inside the trained box.
    runtime.register_surrogate(
        0,
        Box::new(AffineSurrogate::new(
            [[0.6, 0.0], [0.0, 0.96], [0.96, 0.0], [0.0, 1.0]],
            [0.0; 4],
        )),
    );
    runtime.register_uq(0, Box::new(BoundsUq::new([0.5, 0.5], [1.5, 2.5])));
    // Material 1: surrogate present but nothing vouches for it, so the
    // all-false predicate sends every sample to physics.
    runtime.register_surrogate(1, Box::new(AffineSurrogate::constant(0.0)));
    // Material 2: pure physics.

    // Staggered coverage: material m is active on elements where
    // (e + m) % (m + 1) == 0, so later materials are sparser.
    let lists: Vec<Vec<usize>> = (0..num_mats)
        .map(|m| (0..num_elems).filter(|e| (e + m) % (m + 1) == 0).collect())
        .collect();
    let table = SparseElementTable::from_material_lists(&lists, num_elems)?;

    let density = BlockTensor::from_fn(num_qpts, num_elems, num_mats, |q, e, m| {
        1.0 + ((q + e + m) % 7) as f64 * 0.2
    });
    let energy = BlockTensor::from_fn(num_qpts, num_elems, num_mats, |q, e, m| {
        1.0 + ((q * e + m) % 11) as f64 * 0.25
    });
    let mut pressure = BlockTensor::zeros(num_qpts, num_elems, num_mats);
    let mut sound_speed_sq = BlockTensor::zeros(num_qpts, num_elems, num_mats);
    let mut bulk_modulus = BlockTensor::zeros(num_qpts, num_elems, num_mats);
    let mut temperature = BlockTensor::zeros(num_qpts, num_elems, num_mats);

    runtime.evaluate(
        &density,
        &energy,
        &table,
        &mut pressure,
        &mut sound_speed_sq,
        &mut bulk_modulus,
        &mut temperature,
    )?;

    println!("{}", runtime.metrics().summary());
    println!(
        "sample output: pressure(0, 0, 0) = {:.4}, temperature(0, 0, 2) = {:.4}",
        pressure.at(0, 0, 0),
        temperature.at(0, 0, 2),
    );
    Ok(())
}
