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
//! Evaluation of the interpolation kernels against sample data.
use std::ops::{Add, AddAssign, Neg, Sub};

use super::coefficient::{Coefficient, CUBIC_QUANTSHIFT, SINC_QUANTSHIFT, WFIR_QUANTSHIFT};
use super::cubic::CubicTable;
use super::sinc::{SincTable, SINC_MASK, SINC_PHASES_BITS, SINC_WIDTH};
use super::wfir::{WindowedFirTable, WFIR_FRACBITS, WFIR_LOG2WIDTH, WFIR_WIDTH};

/// Fraction shift that maps a 32-bit fraction onto a cubic or sinc phase.
const PHASE_SHIFT: u32 = 32 - SINC_PHASES_BITS;

/// Rounding offset added to the 16-bit fraction before selecting a windowed FIR row.
const WFIR_FRACHALVE: u32 = 1 << (16 - (WFIR_FRACBITS + 2));

/// Increments above this use the 1.333x downsampling table (1.1875 in 32.32).
const DOWNSAMPLE_13X_THRESHOLD: i64 = 0x1_3000_0000;

/// Increments above this use the 2x downsampling table (1.5 in 32.32).
const DOWNSAMPLE_2X_THRESHOLD: i64 = 0x1_8000_0000;

/// A signed sample position or increment in 32.32 fixed point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SamplePosition(i64);

impl SamplePosition {
    pub const ZERO: SamplePosition = SamplePosition(0);
    pub const ONE: SamplePosition = SamplePosition(1 << 32);

    pub const fn from_raw(raw: i64) -> Self {
        SamplePosition(raw)
    }

    pub fn from_f64(value: f64) -> Self {
        SamplePosition((value * 4_294_967_296.0).round() as i64)
    }

    /// The increment that plays `source_rate` material at `target_rate`, or `None`
    /// when the target rate is zero or the ratio does not fit in 32.32.
    pub fn checked_from_ratio(source_rate: u32, target_rate: u32) -> Option<Self> {
        if target_rate == 0 {
            return None;
        }
        let raw = (i128::from(source_rate) << 32) / i128::from(target_rate);
        i64::try_from(raw).ok().map(SamplePosition)
    }

    /// Like [`SamplePosition::checked_from_ratio`], with zero for unusable ratios.
    pub fn from_ratio(source_rate: u32, target_rate: u32) -> Self {
        SamplePosition::checked_from_ratio(source_rate, target_rate).unwrap_or(SamplePosition::ZERO)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// The whole-sample part, rounded towards negative infinity.
    pub const fn integer(self) -> i64 {
        self.0 >> 32
    }

    /// The fractional part as a 32-bit fraction.
    pub const fn fraction(self) -> u32 {
        self.0 as u32
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 4_294_967_296.0
    }

    pub const fn abs(self) -> Self {
        SamplePosition(self.0.abs())
    }
}

impl Add for SamplePosition {
    type Output = SamplePosition;

    fn add(self, rhs: SamplePosition) -> SamplePosition {
        SamplePosition(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for SamplePosition {
    fn add_assign(&mut self, rhs: SamplePosition) {
        *self = *self + rhs;
    }
}

impl Sub for SamplePosition {
    type Output = SamplePosition;

    fn sub(self, rhs: SamplePosition) -> SamplePosition {
        SamplePosition(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for SamplePosition {
    type Output = SamplePosition;

    fn neg(self) -> SamplePosition {
        SamplePosition(self.0.wrapping_neg())
    }
}

/// Which of the three polyphase sinc tables an increment should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolyphaseTable {
    KaiserSinc,
    Downsample13x,
    Downsample2x,
}

impl PolyphaseTable {
    /// Picks the table with enough lowpass to avoid aliasing at this playback speed.
    pub fn for_increment(increment: SamplePosition) -> Self {
        let speed = increment.raw().unsigned_abs();
        if speed > DOWNSAMPLE_2X_THRESHOLD as u64 {
            PolyphaseTable::Downsample2x
        } else if speed > DOWNSAMPLE_13X_THRESHOLD as u64 {
            PolyphaseTable::Downsample13x
        } else {
            PolyphaseTable::KaiserSinc
        }
    }
}

/// The phase row of a cubic or sinc table for a fraction.
pub fn sinc_phase(fraction: u32) -> usize {
    ((fraction >> PHASE_SHIFT) & SINC_MASK) as usize
}

/// The windowed FIR row for a fraction, in `0..=8192`.
pub fn windowed_fir_row(fraction: u32) -> usize {
    (((fraction >> 16) + WFIR_FRACHALVE) >> WFIR_LOG2WIDTH) as usize
}

#[derive(Clone, Copy, Debug)]
enum Kernel<'a, C: Coefficient> {
    Nearest,
    Linear,
    Cubic(&'a CubicTable<C>),
    Polyphase(&'a SincTable<C>),
    WindowedFir(&'a WindowedFirTable<C>),
}

/// Evaluates one interpolation kernel against sample data.
///
/// Positions are relative to the start of the input slice. Samples outside the slice
/// read as silence, so any position is safe to evaluate.
#[derive(Clone, Copy, Debug)]
pub struct Interpolator<'a, C: Coefficient> {
    kernel: Kernel<'a, C>,
}

impl<'a, C: Coefficient> Interpolator<'a, C> {
    pub fn nearest() -> Self {
        Interpolator {
            kernel: Kernel::Nearest,
        }
    }

    pub fn linear() -> Self {
        Interpolator {
            kernel: Kernel::Linear,
        }
    }

    pub fn cubic(table: &'a CubicTable<C>) -> Self {
        Interpolator {
            kernel: Kernel::Cubic(table),
        }
    }

    pub fn polyphase(table: &'a SincTable<C>) -> Self {
        Interpolator {
            kernel: Kernel::Polyphase(table),
        }
    }

    pub fn windowed_fir(table: &'a WindowedFirTable<C>) -> Self {
        Interpolator {
            kernel: Kernel::WindowedFir(table),
        }
    }

    /// Number of input samples that contribute to one output sample.
    pub fn taps(&self) -> usize {
        match self.kernel {
            Kernel::Nearest => 1,
            Kernel::Linear => 2,
            Kernel::Cubic(_) => 4,
            Kernel::Polyphase(_) => SINC_WIDTH,
            Kernel::WindowedFir(_) => WFIR_WIDTH,
        }
    }

    /// Interpolates the input at `position`.
    pub fn sample_at(&self, input: &[C::Sample], position: SamplePosition) -> C::Sample {
        let base = position.integer();
        let fraction = position.fraction();

        match self.kernel {
            Kernel::Nearest => sample(input, base),
            Kernel::Linear => C::lerp(sample(input, base), sample(input, base + 1), fraction),
            Kernel::Cubic(table) => {
                let taps: [C::Sample; 4] = gather(input, base - 1);
                C::convolve(table.row(sinc_phase(fraction)), &taps, CUBIC_QUANTSHIFT)
            }
            Kernel::Polyphase(table) => {
                let taps: [C::Sample; SINC_WIDTH] = gather(input, base - 3);
                C::convolve(table.row(sinc_phase(fraction)), &taps, SINC_QUANTSHIFT)
            }
            Kernel::WindowedFir(table) => {
                let taps: [C::Sample; WFIR_WIDTH] = gather(input, base - 3);
                C::convolve(table.row(windowed_fir_row(fraction)), &taps, WFIR_QUANTSHIFT)
            }
        }
    }

    /// Produces output samples starting at position zero and advancing by `increment`
    /// until the position leaves the input. A non-positive increment yields nothing.
    pub fn resample(&self, input: &[C::Sample], increment: SamplePosition) -> Vec<C::Sample> {
        if input.is_empty() || increment.raw() <= 0 {
            return Vec::new();
        }

        let length = input.len() as i64;
        let estimate = ((length << 32) / increment.raw()) as usize + 1;
        let mut output = Vec::with_capacity(estimate);
        let mut position = SamplePosition::ZERO;
        while position.integer() < length {
            output.push(self.sample_at(input, position));
            position += increment;
        }
        output
    }
}

/// Reads one sample, treating everything outside the slice as silence.
fn sample<S: Copy + Default>(input: &[S], index: i64) -> S {
    usize::try_from(index)
        .ok()
        .and_then(|index| input.get(index))
        .copied()
        .unwrap_or_default()
}

/// Reads `N` consecutive samples starting at `start`.
fn gather<S: Copy + Default, const N: usize>(input: &[S], start: i64) -> [S; N] {
    std::array::from_fn(|offset| sample(input, start + offset as i64))
}
