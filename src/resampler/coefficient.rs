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

/// Fractional bits of fixed-point polyphase sinc coefficients.
pub const SINC_QUANTSHIFT: u32 = 15;

/// Fractional bits of the literal cubic spline table.
pub const CUBIC_QUANTSHIFT: u32 = 14;

/// Fractional bits of fixed-point windowed FIR coefficients.
pub const WFIR_QUANTSHIFT: u32 = 15;

/// Scale of a fixed-point mixing sample (16-bit range).
const FIXED_SAMPLE_SCALE: f32 = 32768.0;

/// Numeric representation of a filter coefficient and of the samples it is mixed with.
///
/// The mixing engine is built around one representation, chosen when the crate is
/// configured (see [`MixCoefficient`]). Generation and evaluation code is written once
/// against this trait so both representations produce tables from the same arithmetic.
pub trait Coefficient: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The sample type this coefficient is multiplied against while mixing.
    type Sample: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Whether coefficients are stored as scaled integers.
    const FIXED_POINT: bool;

    /// Human readable name of the representation.
    const NAME: &'static str;

    /// Converts a real-valued coefficient. Fixed-point values are scaled by `2^shift`,
    /// rounded half away from zero and saturated.
    fn quantize(value: f64, shift: u32) -> Self;

    /// Converts back to the continuous-amplitude domain.
    fn dequantize(self, shift: u32) -> f64;

    /// Converts an entry of the 14-bit literal cubic spline table.
    fn from_cubic_fixed(value: i16) -> Self;

    /// Converts a normalized `[-1.0, 1.0]` sample into the mixing representation.
    fn sample_from_f32(value: f32) -> Self::Sample;

    /// Converts a mixing sample back to a normalized float.
    fn sample_to_f32(sample: Self::Sample) -> f32;

    /// Multiplies a coefficient row against the matching sample taps and rescales the sum.
    fn convolve(row: &[Self], taps: &[Self::Sample], shift: u32) -> Self::Sample;

    /// Linear interpolation between two samples with a 32-bit fraction.
    fn lerp(from: Self::Sample, to: Self::Sample, fraction: u32) -> Self::Sample;
}

impl Coefficient for i16 {
    type Sample = i32;

    const FIXED_POINT: bool = true;
    const NAME: &'static str = "fixed";

    fn quantize(value: f64, shift: u32) -> Self {
        let scaled = value * f64::from(1u32 << shift);
        // f64::round rounds half away from zero.
        scaled.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
    }

    fn dequantize(self, shift: u32) -> f64 {
        f64::from(self) / f64::from(1u32 << shift)
    }

    fn from_cubic_fixed(value: i16) -> Self {
        value
    }

    fn sample_from_f32(value: f32) -> Self::Sample {
        (value * FIXED_SAMPLE_SCALE)
            .round()
            .clamp(-FIXED_SAMPLE_SCALE, FIXED_SAMPLE_SCALE - 1.0) as i32
    }

    fn sample_to_f32(sample: Self::Sample) -> f32 {
        sample as f32 / FIXED_SAMPLE_SCALE
    }

    fn convolve(row: &[Self], taps: &[Self::Sample], shift: u32) -> Self::Sample {
        let sum: i64 = row
            .iter()
            .zip(taps)
            .map(|(&coefficient, &sample)| i64::from(coefficient) * i64::from(sample))
            .sum();
        let rounded = (sum + (1i64 << (shift - 1))) >> shift;
        rounded.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    fn lerp(from: Self::Sample, to: Self::Sample, fraction: u32) -> Self::Sample {
        let fraction = i64::from(fraction >> 16);
        let delta = i64::from(to) - i64::from(from);
        (i64::from(from) + ((delta * fraction) >> 16)) as i32
    }
}

impl Coefficient for f32 {
    type Sample = f32;

    const FIXED_POINT: bool = false;
    const NAME: &'static str = "float";

    fn quantize(value: f64, _shift: u32) -> Self {
        value as f32
    }

    fn dequantize(self, _shift: u32) -> f64 {
        f64::from(self)
    }

    fn from_cubic_fixed(value: i16) -> Self {
        f32::from(value) * (1.0 / 16384.0)
    }

    fn sample_from_f32(value: f32) -> Self::Sample {
        value
    }

    fn sample_to_f32(sample: Self::Sample) -> f32 {
        sample
    }

    fn convolve(row: &[Self], taps: &[Self::Sample], _shift: u32) -> Self::Sample {
        row.iter()
            .zip(taps)
            .map(|(&coefficient, &sample)| coefficient * sample)
            .sum()
    }

    fn lerp(from: Self::Sample, to: Self::Sample, fraction: u32) -> Self::Sample {
        let fraction = fraction as f32 * (1.0 / 4_294_967_296.0);
        from + (to - from) * fraction
    }
}

/// The coefficient representation used by the mixing engine.
#[cfg(feature = "int-mixer")]
pub type MixCoefficient = i16;

/// The coefficient representation used by the mixing engine.
#[cfg(not(feature = "int-mixer"))]
pub type MixCoefficient = f32;

/// The sample representation used by the mixing engine.
pub type MixSample = <MixCoefficient as Coefficient>::Sample;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_quantize_rounds_half_away_from_zero() {
        assert_eq!(i16::quantize(0.5 / 32768.0, 15), 1);
        assert_eq!(i16::quantize(-0.5 / 32768.0, 15), -1);
        assert_eq!(i16::quantize(0.97, 15), 31785);
        assert_eq!(i16::quantize(0.425, 15), 13926);
    }

    #[test]
    fn test_fixed_quantize_saturates() {
        assert_eq!(i16::quantize(1.0, 15), i16::MAX);
        assert_eq!(i16::quantize(-1.5, 15), i16::MIN);
        assert_eq!(i16::quantize(4.0, 14), i16::MAX);
    }

    #[test]
    fn test_dequantize() {
        assert_eq!(16384i16.dequantize(14), 1.0);
        assert_eq!((-16384i16).dequantize(15), -0.5);
        assert_eq!(0.25f32.dequantize(15), 0.25);
    }

    #[test]
    fn test_cubic_fixed_conversion() {
        assert_eq!(i16::from_cubic_fixed(16384), 16384);
        assert_eq!(f32::from_cubic_fixed(16384), 1.0);
        assert_eq!(f32::from_cubic_fixed(-8192), -0.5);
    }

    #[test]
    fn test_fixed_sample_conversion() {
        assert_eq!(i16::sample_from_f32(0.5), 16384);
        assert_eq!(i16::sample_from_f32(1.0), 32767);
        assert_eq!(i16::sample_from_f32(-1.0), -32768);
        assert_eq!(i16::sample_to_f32(-16384), -0.5);
    }

    #[test]
    fn test_convolve_unity_row() {
        let fixed_row = [0i16, 16384, 0, 0];
        assert_eq!(i16::convolve(&fixed_row, &[10, 2000, 30, 40], 14), 2000);

        let float_row = [0.0f32, 1.0, 0.0, 0.0];
        assert_eq!(f32::convolve(&float_row, &[0.1, 0.2, 0.3, 0.4], 14), 0.2);
    }

    #[test]
    fn test_lerp_midpoint() {
        assert_eq!(i16::lerp(0, 32768, 0x8000_0000), 16384);
        assert_eq!(i16::lerp(100, -100, 0), 100);
        assert_eq!(f32::lerp(0.0, 1.0, 0x8000_0000), 0.5);
        assert_eq!(f32::lerp(-1.0, 1.0, 0), -1.0);
    }
}
