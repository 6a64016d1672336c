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
//! Windowed FIR interpolation table with a selectable window and cutoff.
use std::f64::consts::PI;
use std::{fmt, str::FromStr};

use serde::Deserialize;
use tracing::warn;

use super::coefficient::{Coefficient, WFIR_QUANTSHIFT};
use super::error::SettingsParseError;
use super::settings::DEFAULT_WFIR_CUTOFF;
use super::table::FilterTable;

/// log2 of the number of precalculated rows per half sample.
pub const WFIR_FRACBITS: u32 = 12;
pub const WFIR_LUTLEN: usize = (1 << (WFIR_FRACBITS + 1)) + 1;
pub const WFIR_LOG2WIDTH: u32 = 3;
pub const WFIR_WIDTH: usize = 1 << WFIR_LOG2WIDTH;

pub type WindowedFirTable<C> = FilterTable<C, WFIR_LUTLEN, WFIR_WIDTH>;

/// Lowest cutoff the table is generated for. Below it row sums vanish and
/// normalization stops being meaningful.
pub const MIN_WFIR_CUTOFF: f64 = 0.01;

/// Highest cutoff, the Nyquist frequency.
pub const MAX_WFIR_CUTOFF: f64 = 1.0;

/// Limits a cutoff to `MIN_WFIR_CUTOFF..=MAX_WFIR_CUTOFF`. NaN becomes the default cutoff.
pub fn clamp_wfir_cutoff(cutoff: f64) -> f64 {
    let clamped = if cutoff.is_nan() {
        DEFAULT_WFIR_CUTOFF
    } else {
        cutoff.clamp(MIN_WFIR_CUTOFF, MAX_WFIR_CUTOFF)
    };
    if clamped != cutoff {
        warn!(cutoff, clamped, "Clamping windowed FIR cutoff");
    }
    clamped
}

/// Window applied to the sinc kernel of the windowed FIR table.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowType {
    #[serde(rename = "hann")]
    Hann,
    #[serde(rename = "hamming")]
    Hamming,
    #[serde(rename = "blackman-exact")]
    BlackmanExact,
    #[serde(rename = "blackman-3t61")]
    Blackman3T61,
    #[serde(rename = "blackman-3t67")]
    Blackman3T67,
    /// Blackman-Harris.
    #[serde(rename = "blackman-harris")]
    Blackman4T92,
    #[serde(rename = "blackman-4t74")]
    Blackman4T74,
    /// Four-term approximation of a Kaiser window with alpha 7.5.
    #[default]
    #[serde(rename = "kaiser-4t")]
    Kaiser4T,
}

impl WindowType {
    pub const ALL: [WindowType; 8] = [
        WindowType::Hann,
        WindowType::Hamming,
        WindowType::BlackmanExact,
        WindowType::Blackman3T61,
        WindowType::Blackman3T67,
        WindowType::Blackman4T92,
        WindowType::Blackman4T74,
        WindowType::Kaiser4T,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::BlackmanExact => "blackman-exact",
            WindowType::Blackman3T61 => "blackman-3t61",
            WindowType::Blackman3T67 => "blackman-3t67",
            WindowType::Blackman4T92 => "blackman-harris",
            WindowType::Blackman4T74 => "blackman-4t74",
            WindowType::Kaiser4T => "kaiser-4t",
        }
    }

    /// Cosine-sum terms `a0 - a1 cos(w) + a2 cos(2w) - a3 cos(3w)`.
    fn terms(self) -> [f64; 4] {
        match self {
            WindowType::Hann => [0.50, 0.50, 0.0, 0.0],
            WindowType::Hamming => [0.54, 0.46, 0.0, 0.0],
            WindowType::BlackmanExact => [0.42, 0.50, 0.08, 0.0],
            WindowType::Blackman3T61 => [0.44959, 0.49364, 0.05677, 0.0],
            WindowType::Blackman3T67 => [0.42323, 0.49755, 0.07922, 0.0],
            WindowType::Blackman4T92 => [0.35875, 0.48829, 0.14128, 0.01168],
            WindowType::Blackman4T74 => [0.40217, 0.49703, 0.09392, 0.00183],
            WindowType::Kaiser4T => [0.40243, 0.49804, 0.09831, 0.00122],
        }
    }

    /// Evaluates the window at angle `w`.
    fn evaluate(self, w: f64) -> f64 {
        let [a0, a1, a2, a3] = self.terms();
        a0 - a1 * w.cos() + a2 * (2.0 * w).cos() - a3 * (3.0 * w).cos()
    }
}

impl FromStr for WindowType {
    type Err = SettingsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowType::ALL
            .into_iter()
            .find(|window| window.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SettingsParseError::UnknownWindowType(s.to_string()))
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One unnormalized kernel coefficient for tap `tap` at sub-sample offset `offset`.
fn coefficient(tap: usize, offset: f64, cutoff: f64, window: WindowType) -> f64 {
    const EPSILON: f64 = 1e-8;
    let width_m1 = (WFIR_WIDTH - 1) as f64;
    let width_m1_half = 0.5 * width_m1;
    let pos_u = tap as f64 - offset;
    let idl = (2.0 * PI) / width_m1;
    let pos = pos_u - width_m1_half;

    if pos.abs() < EPSILON {
        return cutoff;
    }

    let pos = pos * PI;
    window.evaluate(idl * pos_u) * (cutoff * pos).sin() / pos
}

/// Generates the windowed FIR table.
///
/// Row `r` holds the taps for a fractional offset of `(r - 4096) / 8192` samples
/// around the half-sample point, so row 0 lines up tap 3 with the integer position
/// and the last row lines up tap 4. Each row is normalized to unity gain.
/// The cutoff is limited with [`clamp_wfir_cutoff`].
pub fn generate_windowed_fir_table<C: Coefficient>(
    cutoff: f64,
    window: WindowType,
) -> WindowedFirTable<C> {
    if cfg!(feature = "fuzzing") {
        return WindowedFirTable::zeroed();
    }

    let cutoff = clamp_wfir_cutoff(cutoff);

    let rows_per_half = f64::from(1u32 << WFIR_FRACBITS);
    let norm = 1.0 / (2.0 * rows_per_half);
    let mut coefficients = Vec::with_capacity(WFIR_LUTLEN * WFIR_WIDTH);

    for row in 0..WFIR_LUTLEN {
        let offset = (row as f64 - rows_per_half) * norm;
        let mut taps = [0.0; WFIR_WIDTH];
        for (tap, value) in taps.iter_mut().enumerate() {
            *value = coefficient(tap, offset, cutoff, window);
        }

        let gain = 1.0 / taps.iter().sum::<f64>();
        coefficients.extend(
            taps.iter()
                .map(|&value| C::quantize(value * gain, WFIR_QUANTSHIFT)),
        );
    }

    WindowedFirTable::from_vec(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_type_from_str() {
        assert_eq!(WindowType::from_str("hann").unwrap(), WindowType::Hann);
        assert_eq!(
            WindowType::from_str("Blackman-Harris").unwrap(),
            WindowType::Blackman4T92
        );
        assert_eq!(WindowType::from_str("kaiser-4t").unwrap(), WindowType::Kaiser4T);
        assert_eq!(
            WindowType::from_str("triangle"),
            Err(SettingsParseError::UnknownWindowType("triangle".to_string()))
        );
    }

    #[test]
    fn test_window_type_display_round_trips() {
        for window in WindowType::ALL {
            assert_eq!(WindowType::from_str(&window.to_string()).unwrap(), window);
        }
    }

    #[test]
    fn test_clamp_wfir_cutoff() {
        assert_eq!(clamp_wfir_cutoff(0.97), 0.97);
        assert_eq!(clamp_wfir_cutoff(1.0), 1.0);
        assert_eq!(clamp_wfir_cutoff(1.5), MAX_WFIR_CUTOFF);
        assert_eq!(clamp_wfir_cutoff(0.0), MIN_WFIR_CUTOFF);
        assert_eq!(clamp_wfir_cutoff(-1.0), MIN_WFIR_CUTOFF);
        assert_eq!(clamp_wfir_cutoff(f64::NEG_INFINITY), MIN_WFIR_CUTOFF);
        assert_eq!(clamp_wfir_cutoff(f64::INFINITY), MAX_WFIR_CUTOFF);
        assert_eq!(clamp_wfir_cutoff(f64::NAN), DEFAULT_WFIR_CUTOFF);
    }

    #[test]
    fn test_default_window_is_kaiser() {
        assert_eq!(WindowType::default(), WindowType::Kaiser4T);
    }

    #[test]
    fn test_table_shape() {
        assert_eq!(WFIR_LUTLEN, 8193);
        assert_eq!(WFIR_WIDTH, 8);
    }

    #[cfg(not(feature = "fuzzing"))]
    mod generation {
        use super::*;

        #[test]
        fn test_rows_have_unity_gain() {
            for window in WindowType::ALL {
                let table = generate_windowed_fir_table::<f32>(0.97, window);
                let (min, max) = table.gain_range(WFIR_QUANTSHIFT);
                assert!((min - 1.0).abs() < 1e-5, "{}: min gain {}", window, min);
                assert!((max - 1.0).abs() < 1e-5, "{}: max gain {}", window, max);
            }
        }

        #[test]
        fn test_fixed_rows_have_unity_gain() {
            let table = generate_windowed_fir_table::<i16>(0.97, WindowType::Kaiser4T);
            for row in 0..WFIR_LUTLEN {
                let sum: i32 = table.row(row).iter().map(|&c| i32::from(c)).sum();
                assert!((sum - 32768).abs() <= 4, "row {} sums to {}", row, sum);
            }
        }

        #[test]
        fn test_first_row_centers_tap_three() {
            let table = generate_windowed_fir_table::<f32>(0.97, WindowType::Kaiser4T);
            let row = table.row(0);
            let (max_tap, _) = row
                .iter()
                .enumerate()
                .fold((0, f32::MIN), |best, (tap, &c)| if c > best.1 { (tap, c) } else { best });
            assert_eq!(max_tap, 3);
            assert!((row[3] - 0.9704).abs() < 1e-3);
        }

        #[test]
        fn test_middle_row_is_symmetric() {
            let table = generate_windowed_fir_table::<f32>(0.97, WindowType::Hamming);
            let row = table.row(WFIR_LUTLEN / 2);
            for tap in 0..WFIR_WIDTH / 2 {
                assert!((row[tap] - row[WFIR_WIDTH - 1 - tap]).abs() < 1e-6);
            }
        }

        #[test]
        fn test_degenerate_cutoffs_give_finite_tables() {
            for cutoff in [0.0, -0.5, 1e-320, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                let table = generate_windowed_fir_table::<f32>(cutoff, WindowType::Kaiser4T);
                assert!(
                    table.as_slice().iter().all(|c| c.is_finite()),
                    "cutoff {} produced non-finite coefficients",
                    cutoff
                );
                let (min, max) = table.gain_range(WFIR_QUANTSHIFT);
                assert!((min - 1.0).abs() < 1e-5 && (max - 1.0).abs() < 1e-5);
            }

            assert_eq!(
                generate_windowed_fir_table::<i16>(0.0, WindowType::Hann),
                generate_windowed_fir_table::<i16>(MIN_WFIR_CUTOFF, WindowType::Hann)
            );
            assert_eq!(
                generate_windowed_fir_table::<i16>(f64::NAN, WindowType::Hann),
                generate_windowed_fir_table::<i16>(DEFAULT_WFIR_CUTOFF, WindowType::Hann)
            );
        }

        #[test]
        fn test_last_row_is_first_row_shifted() {
            let table = generate_windowed_fir_table::<f32>(0.97, WindowType::Kaiser4T);
            let first = table.row(0);
            let last = table.row(WFIR_LUTLEN - 1);
            for tap in 0..WFIR_WIDTH - 1 {
                assert!((first[tap] - last[tap + 1]).abs() < 1e-6, "tap {}", tap);
            }
        }

        #[test]
        fn test_cutoff_changes_table() {
            let wide = generate_windowed_fir_table::<i16>(0.97, WindowType::Kaiser4T);
            let narrow = generate_windowed_fir_table::<i16>(0.5, WindowType::Kaiser4T);
            assert_ne!(wide, narrow);
        }

        #[test]
        fn test_window_changes_table() {
            let kaiser = generate_windowed_fir_table::<f32>(0.97, WindowType::Kaiser4T);
            let hann = generate_windowed_fir_table::<f32>(0.97, WindowType::Hann);
            assert_ne!(kaiser, hann);
        }

        #[test]
        fn test_regeneration_is_bit_identical() {
            assert_eq!(
                generate_windowed_fir_table::<f32>(0.8, WindowType::Blackman4T92),
                generate_windowed_fir_table::<f32>(0.8, WindowType::Blackman4T92)
            );
        }
    }
}
