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
//! Kaiser-windowed sinc coefficients for the 8-tap polyphase resampler.
use std::f64::consts::PI;

use tracing::warn;

use super::coefficient::{Coefficient, SINC_QUANTSHIFT};
use super::table::FilterTable;

pub const SINC_PHASES_BITS: u32 = 8;
pub const SINC_PHASES: usize = 1 << SINC_PHASES_BITS;
pub const SINC_WIDTH: usize = 8;
pub const SINC_MASK: u32 = (SINC_PHASES - 1) as u32;

/// Highest usable cutoff. A cutoff of 1.0 overflows the fixed-point mixer.
pub const MAX_SINC_CUTOFF: f64 = 0.999;

/// Relative size of the last series term at which [`izero`] stops.
const IZERO_EPSILON: f64 = 1e-7;

pub type SincTable<C> = FilterTable<C, SINC_PHASES, SINC_WIDTH>;

/// Zeroth-order modified Bessel function of the first kind, evaluated as a power series.
pub fn izero(y: f64) -> f64 {
    let y_squared = y * y;
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut d = 0.0;
    loop {
        d += 2.0;
        term *= y_squared / (d * d);
        sum += term;
        // NaN fails every comparison, so it has to stop the series explicitly.
        if term.is_nan() || term <= IZERO_EPSILON * sum {
            return sum;
        }
    }
}

/// Kaiser window shape and lowpass cutoff of one sinc table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowParameters {
    beta: f64,
    cutoff: f64,
}

impl WindowParameters {
    /// Upsampling and 1:1 playback.
    pub const UPSAMPLE: WindowParameters = WindowParameters {
        beta: 9.6377,
        cutoff: 0.97,
    };

    /// Downsampling by up to 1.333x.
    pub const DOWNSAMPLE_13X: WindowParameters = WindowParameters {
        beta: 8.5,
        cutoff: 0.5,
    };

    /// Downsampling by 2x and beyond.
    pub const DOWNSAMPLE_2X: WindowParameters = WindowParameters {
        beta: 7.0,
        cutoff: 0.425,
    };

    /// Creates window parameters, clamping the cutoff to [`MAX_SINC_CUTOFF`].
    /// A cutoff that is not finite is replaced by [`MAX_SINC_CUTOFF`].
    pub fn new(beta: f64, cutoff: f64) -> WindowParameters {
        let clamped = if !cutoff.is_finite() || cutoff >= MAX_SINC_CUTOFF {
            if cutoff != MAX_SINC_CUTOFF {
                warn!(cutoff, max = MAX_SINC_CUTOFF, "Clamping sinc cutoff");
            }
            MAX_SINC_CUTOFF
        } else {
            cutoff
        };

        WindowParameters {
            beta,
            cutoff: clamped,
        }
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

/// Generates a polyphase sinc table.
///
/// Each of the `8 * SINC_PHASES` kernel offsets is sampled at a distance of
/// `(offset - 4 * SINC_PHASES) / SINC_PHASES` input samples from the kernel center.
/// Offsets are stored so that row `phase` holds the taps for fractional position
/// `phase / SINC_PHASES`, with tap `t` taken from offset `(7 - t) * SINC_PHASES + phase`.
/// Tap 3 of phase 0 is the kernel center.
///
/// The kernel is scaled by the cutoff so the passband keeps unity gain.
pub fn generate_sinc_table<C: Coefficient>(params: WindowParameters) -> SincTable<C> {
    if cfg!(feature = "fuzzing") {
        return SincTable::zeroed();
    }

    let beta = params.beta;
    let cutoff = params.cutoff.min(MAX_SINC_CUTOFF);
    let izero_beta = izero(beta);
    let k_pi = PI * cutoff;
    let center = 4 * SINC_PHASES;

    SincTable::from_fn(|phase, tap| {
        let offset = (SINC_WIDTH - 1 - tap) * SINC_PHASES + phase;
        let fsinc = if offset == center {
            1.0
        } else {
            let x = (offset as f64 - center as f64) * (1.0 / SINC_PHASES as f64);
            let x_pi = x * k_pi;
            let window = izero(beta * (1.0 - x * x * (1.0 / 16.0)).sqrt());
            x_pi.sin() * window / (izero_beta * x_pi)
        };
        C::quantize(fsinc * cutoff, SINC_QUANTSHIFT)
    })
}
