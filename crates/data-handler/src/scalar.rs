// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The scalar value type shared by all buffers of an invocation.

use num_traits::{Float, NumCast, ToPrimitive};
use std::fmt;

/// The real type `V` every buffer within one invocation shares.
///
/// Implemented for `f32` and `f64`. The bound set is what the compaction
/// kernels and evaluators need: float arithmetic, zero-initialised scratch
/// (`Default`), and cross-thread sharing.
pub trait Scalar:
    Float + NumCast + Default + Send + Sync + fmt::Debug + fmt::Display + 'static
{
    /// Converts from any numeric source, as a plain `as` cast would.
    ///
    /// Float targets represent every numeric source (possibly with
    /// rounding or overflow to infinity); the NaN arm is the unreachable
    /// fallback the conversion API requires.
    fn from_other<T: ToPrimitive>(value: T) -> Self {
        NumCast::from(value).unwrap_or_else(Self::nan)
    }
}

impl Scalar for f32 {}
impl Scalar for f64 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_other_widening() {
        let v: f64 = Scalar::from_other(1.5f32);
        assert_eq!(v, 1.5);
    }

    #[test]
    fn test_from_other_narrowing() {
        let v: f32 = Scalar::from_other(2.25f64);
        assert_eq!(v, 2.25);
    }

    #[test]
    fn test_from_other_integer() {
        let v: f64 = Scalar::from_other(7u32);
        assert_eq!(v, 7.0);
    }
}
