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
use std::error::Error;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Test signals and their measurements.
pub mod signal {
    use std::f64::consts::TAU;

    /// A sine at `frequency` Hz, evaluated in f64 so long signals keep their phase.
    pub fn sine(frequency: f64, amplitude: f32, sample_rate: u32, frames: usize) -> Vec<f32> {
        let step = TAU * frequency / f64::from(sample_rate);
        (0..frames)
            .map(|frame| amplitude * (step * frame as f64).sin() as f32)
            .collect()
    }

    /// Ratio of reference power to error power in dB. Mismatched lengths score 0.
    pub fn snr_db(reference: &[f32], measured: &[f32]) -> f32 {
        if reference.len() != measured.len() {
            return 0.0;
        }

        let (signal, error) = reference.iter().zip(measured).fold(
            (0.0f64, 0.0f64),
            |(signal, error), (&expected, &actual)| {
                let difference = f64::from(expected - actual);
                (
                    signal + f64::from(expected).powi(2),
                    error + difference * difference,
                )
            },
        );
        if error == 0.0 {
            return f32::INFINITY;
        }
        (10.0 * (signal / error).log10()) as f32
    }
}

/// Writes interleaved samples in [-1.0, 1.0] as a 16-bit WAV file.
pub fn write_wav_i16<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    channels: u16,
    samples: &[f32],
) -> Result<(), Box<dyn Error>> {
    let mut writer = WavWriter::create(
        path,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;
    for &sample in samples {
        writer.write_sample((sample * f32::from(i16::MAX)) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
