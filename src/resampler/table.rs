// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fmt;

use super::coefficient::Coefficient;

/// A phase-indexed table of filter coefficients.
///
/// Rows are stored contiguously, one row of `TAPS` coefficients per phase. Tables are
/// only produced by the generators in this module tree and are never mutated afterwards.
#[derive(Clone, PartialEq)]
pub struct FilterTable<C, const PHASES: usize, const TAPS: usize> {
    coefficients: Box<[C]>,
}

impl<C: Coefficient, const PHASES: usize, const TAPS: usize> FilterTable<C, PHASES, TAPS> {
    /// A table with every coefficient set to zero.
    pub fn zeroed() -> Self {
        Self {
            coefficients: vec![C::default(); PHASES * TAPS].into_boxed_slice(),
        }
    }

    /// Builds a table by evaluating `f(phase, tap)` for every entry in row order.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> C) -> Self {
        let mut coefficients = Vec::with_capacity(PHASES * TAPS);
        for phase in 0..PHASES {
            for tap in 0..TAPS {
                coefficients.push(f(phase, tap));
            }
        }
        Self {
            coefficients: coefficients.into_boxed_slice(),
        }
    }

    /// Wraps coefficients already laid out row by row.
    pub(crate) fn from_vec(coefficients: Vec<C>) -> Self {
        debug_assert_eq!(coefficients.len(), PHASES * TAPS);
        Self {
            coefficients: coefficients.into_boxed_slice(),
        }
    }

    /// Number of phases (rows).
    pub const fn phases(&self) -> usize {
        PHASES
    }

    /// Number of taps per row.
    pub const fn taps(&self) -> usize {
        TAPS
    }

    /// Total number of coefficients.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The coefficient for a single phase and tap.
    pub fn at(&self, phase: usize, tap: usize) -> C {
        self.row(phase)[tap]
    }

    /// The full coefficient row for a phase.
    pub fn row(&self, phase: usize) -> &[C] {
        let start = phase * TAPS;
        &self.coefficients[start..start + TAPS]
    }

    /// All coefficients, row after row.
    pub fn as_slice(&self) -> &[C] {
        &self.coefficients
    }

    /// Sum of a row in the continuous-amplitude domain.
    pub fn row_sum(&self, phase: usize, shift: u32) -> f64 {
        self.row(phase)
            .iter()
            .map(|coefficient| coefficient.dequantize(shift))
            .sum()
    }

    /// Smallest and largest row sum over all phases.
    pub fn gain_range(&self, shift: u32) -> (f64, f64) {
        (0..PHASES)
            .map(|phase| self.row_sum(phase, shift))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), sum| {
                (min.min(sum), max.max(sum))
            })
    }
}

impl<C: Coefficient, const PHASES: usize, const TAPS: usize> fmt::Debug
    for FilterTable<C, PHASES, TAPS>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterTable")
            .field("representation", &C::NAME)
            .field("phases", &PHASES)
            .field("taps", &TAPS)
            .finish()
    }
}
