// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scalar-type casting and feature linearization.

use crate::{DataError, Scalar};
use device_dispatch::{kernels, DispatchContext};
use num_traits::{NumCast, ToPrimitive};
use resource_manager::{ResourceManager, ScratchGuard};
use std::any::TypeId;

/// The result of [`cast_to`]: either the source buffer viewed at the
/// target type (no allocation happened) or a converted copy the caller
/// now owns through its scratch guard.
///
/// Which case applies is observable via [`CastBuffer::is_owned`], so the
/// caller knows whether it is holding a fresh allocation.
pub enum CastBuffer<'a, V: Scalar> {
    /// Source already had type `V`; this borrows it.
    Borrowed(&'a [V]),
    /// A freshly converted copy.
    Owned(ScratchGuard<V>),
}

impl<V: Scalar> CastBuffer<'_, V> {
    /// The values at type `V`, whichever case applies.
    pub fn as_slice(&self) -> &[V] {
        match self {
            Self::Borrowed(slice) => slice,
            Self::Owned(guard) => guard.as_slice(),
        }
    }

    /// Whether a new allocation occurred (and is owned here).
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

/// Casts a source buffer to the invocation scalar type `V`.
///
/// When `T` already is `V` the source is borrowed unchanged; otherwise a
/// scratch buffer is allocated through the resource manager and filled
/// element-wise.
pub fn cast_to<'a, T, V>(
    rm: &ResourceManager,
    src: &'a [T],
) -> Result<CastBuffer<'a, V>, DataError>
where
    T: ToPrimitive + Copy + 'static,
    V: Scalar,
{
    if TypeId::of::<T>() == TypeId::of::<V>() {
        // SAFETY: T and V are the same type; reinterpreting the borrow
        // changes nothing about layout or lifetime.
        let same = unsafe { std::slice::from_raw_parts(src.as_ptr() as *const V, src.len()) };
        return Ok(CastBuffer::Borrowed(same));
    }

    let mut guard = rm.allocate::<V>(src.len())?;
    for (dst, &value) in guard.as_mut_slice().iter_mut().zip(src) {
        *dst = V::from_other(value);
    }
    Ok(CastBuffer::Owned(guard))
}

/// Casts from the invocation scalar type into a caller-owned buffer.
pub fn cast_from<T, V>(dst: &mut [T], src: &[V]) -> Result<(), DataError>
where
    T: NumCast + Default + Copy,
    V: Scalar,
{
    if dst.len() < src.len() {
        return Err(DataError::LengthMismatch {
            expected: src.len(),
            actual: dst.len(),
        });
    }
    for (dst, &value) in dst.iter_mut().zip(src) {
        *dst = NumCast::from(value).unwrap_or_default();
    }
    Ok(())
}

/// Linearizes per-feature columns into one row-major scratch buffer:
/// `out[i · F + d] = V(features[d][i])`.
///
/// The host path is a nested loop; the device path — taken when the
/// context says so or when the features already live on the device —
/// dispatches to the linearize kernel.
pub fn linearize_features<T, V>(
    rm: &ResourceManager,
    ctx: DispatchContext,
    ndata: usize,
    features: &[&[T]],
) -> Result<ScratchGuard<V>, DataError>
where
    T: ToPrimitive + Copy + Send + Sync,
    V: Scalar,
{
    if features.is_empty() {
        return Err(DataError::EmptyFeatureSet);
    }
    for feature in features {
        if feature.len() < ndata {
            return Err(DataError::LengthMismatch {
                expected: ndata,
                actual: feature.len(),
            });
        }
    }

    let nfeatures = features.len();
    let mut out = rm.allocate::<V>(ndata * nfeatures)?;

    let features_on_device = rm.is_on_device(features[0].as_ptr());
    if ctx.is_device_execution() || features_on_device {
        kernels::linearize(out.as_mut_slice(), features, ndata);
    } else {
        let out = out.as_mut_slice();
        for (d, feature) in features.iter().enumerate() {
            for i in 0..ndata {
                out[i * nfeatures + d] = V::from_other(feature[i]);
            }
        }
    }
    Ok(out)
}
