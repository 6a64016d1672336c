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
//! Offline rendering of WAV files through the resampler.
use std::path::Path;
use std::time::Instant;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use crate::resampler::{
    Coefficient, MixCoefficient, MixSample, Resampler, ResamplingMode, SamplePosition,
};

/// Error types for rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Invalid target sample rate: {0}Hz")]
    InvalidRate(u32),

    #[error("Unsupported resampling ratio: {0}Hz -> {1}Hz")]
    UnsupportedRatio(u32, u32),

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),
}

/// What a render did.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub mode: ResamplingMode,
    pub channels: u16,
    pub source_rate: u32,
    pub target_rate: u32,
    pub input_frames: usize,
    pub output_frames: usize,
}

/// Splits interleaved samples into one buffer per channel.
pub fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<MixSample>> {
    if channels == 0 {
        return Vec::new();
    }
    (0..channels)
        .map(|channel| {
            samples
                .iter()
                .skip(channel)
                .step_by(channels)
                .map(|&sample| MixCoefficient::sample_from_f32(sample))
                .collect()
        })
        .collect()
}

/// Resamples every channel by the given step, channels in parallel.
pub fn resample_channels(
    resampler: &Resampler,
    channels: &[Vec<MixSample>],
    increment: SamplePosition,
) -> Vec<Vec<MixSample>> {
    let interpolator = resampler.interpolator(increment);
    channels
        .par_iter()
        .map(|channel| interpolator.resample(channel, increment))
        .collect()
}

/// The playback increment for converting `source_rate` to `target_rate`.
pub fn playback_increment(
    source_rate: u32,
    target_rate: u32,
) -> Result<SamplePosition, RenderError> {
    if source_rate == 0 {
        return Err(RenderError::InvalidRate(source_rate));
    }
    if target_rate == 0 {
        return Err(RenderError::InvalidRate(target_rate));
    }
    SamplePosition::checked_from_ratio(source_rate, target_rate)
        .ok_or(RenderError::UnsupportedRatio(source_rate, target_rate))
}

/// Reads a WAV file as interleaved samples scaled to [-1.0, 1.0].
fn read_samples<R: std::io::Read>(reader: WavReader<R>) -> Result<Vec<f32>, RenderError> {
    let spec = reader.spec();
    match spec.sample_format {
        SampleFormat::Float => Ok(reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?),
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(RenderError::UnsupportedBitDepth(spec.bits_per_sample));
            }
            // i64 keeps 32-bit files from overflowing the shift.
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            let samples = reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|sample| sample as f32 * scale))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(samples)
        }
    }
}

/// Resamples `input` to `target_rate` and writes the result as a 32-bit float WAV.
pub fn render_file(
    input: &Path,
    output: &Path,
    target_rate: u32,
    resampler: &Resampler,
) -> Result<RenderSummary, RenderError> {
    if target_rate == 0 {
        return Err(RenderError::InvalidRate(target_rate));
    }

    let span = span!(Level::INFO, "render", input = %input.display());
    let _enter = span.enter();

    let reader = WavReader::open(input)?;
    let spec = reader.spec();
    let increment = playback_increment(spec.sample_rate, target_rate)?;
    let channel_count = usize::from(spec.channels);
    let samples = read_samples(reader)?;
    let channels = deinterleave(&samples, channel_count);
    let input_frames = channels.first().map_or(0, Vec::len);

    debug!(
        source_rate = spec.sample_rate,
        target_rate,
        increment = increment.to_f64(),
        "Resampling"
    );

    let start = Instant::now();
    let resampled = resample_channels(resampler, &channels, increment);
    let output_frames = resampled.first().map_or(0, Vec::len);

    let mut writer = WavWriter::create(
        output,
        WavSpec {
            channels: spec.channels,
            sample_rate: target_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        },
    )?;
    for frame in 0..output_frames {
        for channel in &resampled {
            writer.write_sample(MixCoefficient::sample_to_f32(channel[frame]))?;
        }
    }
    writer.finalize()?;

    let summary = RenderSummary {
        mode: resampler.settings().mode,
        channels: spec.channels,
        source_rate: spec.sample_rate,
        target_rate,
        input_frames,
        output_frames,
    };
    info!(
        mode = %summary.mode,
        input_frames,
        output_frames,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rendered"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resampler::ResamplerSettings;
    use crate::testutil::{signal, write_wav_i16};

    fn read_float_wav(path: &Path) -> (WavSpec, Vec<f32>) {
        let reader = WavReader::open(path).unwrap();
        let spec = reader.spec();
        let samples = reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        (spec, samples)
    }

    #[test]
    fn test_deinterleave() {
        let channels = deinterleave(&[0.0, 0.5, 0.25, -0.5, 0.125, -0.25], 2);
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].len(), 3);
        assert_eq!(channels[1].len(), 3);
        assert_eq!(channels[1][0], MixCoefficient::sample_from_f32(0.5));
        assert_eq!(channels[0][2], MixCoefficient::sample_from_f32(0.125));
        assert!(deinterleave(&[0.0, 1.0], 0).is_empty());
    }

    #[test]
    fn test_render_halves_frame_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.wav");
        let output = dir.path().join("output.wav");

        let sine = signal::sine(441.0, 0.5, 44100, 4410);
        let stereo: Vec<f32> = sine.iter().flat_map(|&s| [s, -s]).collect();
        write_wav_i16(&input, 44100, 2, &stereo).unwrap();

        let resampler = Resampler::new(ResamplerSettings::default());
        let summary = render_file(&input, &output, 22050, &resampler).unwrap();
        assert_eq!(summary.input_frames, 4410);
        assert_eq!(summary.output_frames, 2205);
        assert_eq!(summary.channels, 2);

        let (spec, samples) = read_float_wav(&output);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        assert_eq!(samples.len(), 2205 * 2);

        // Channels stay separated.
        for frame in samples.chunks(2).skip(10).take(2000) {
            assert!((frame[0] + frame[1]).abs() < 0.01, "{frame:?}");
        }
        if !cfg!(feature = "fuzzing") {
            let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
            assert!(peak > 0.4 && peak < 0.6, "peak {peak}");
        }
    }

    #[test]
    fn test_render_upsample_with_cubic() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.wav");
        let output = dir.path().join("output.wav");

        let sine = signal::sine(1000.0, 0.5, 22050, 2205);
        write_wav_i16(&input, 22050, 1, &sine).unwrap();

        let settings = ResamplerSettings::default().with_mode(ResamplingMode::Cubic);
        let resampler = Resampler::new(settings);
        let summary = render_file(&input, &output, 44100, &resampler).unwrap();
        assert_eq!(summary.mode, ResamplingMode::Cubic);
        assert_eq!(summary.output_frames, 4410);

        let (_, samples) = read_float_wav(&output);
        assert_eq!(samples.len(), 4410);
    }

    #[test]
    fn test_render_rejects_zero_rate() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.wav");
        write_wav_i16(&input, 44100, 1, &[0.0; 16]).unwrap();

        let resampler = Resampler::default();
        let result = render_file(&input, &dir.path().join("out.wav"), 0, &resampler);
        assert!(matches!(result, Err(RenderError::InvalidRate(0))));
    }

    #[test]
    fn test_playback_increment() {
        assert_eq!(playback_increment(44100, 22050).unwrap(), SamplePosition::from_f64(2.0));
        assert!(matches!(
            playback_increment(44100, 0),
            Err(RenderError::InvalidRate(0))
        ));
        assert!(matches!(
            playback_increment(0, 48000),
            Err(RenderError::InvalidRate(0))
        ));
        assert!(matches!(
            playback_increment(u32::MAX, 1),
            Err(RenderError::UnsupportedRatio(u32::MAX, 1))
        ));
        let increment = playback_increment(3_000_000_000, 48000).unwrap();
        assert!(increment.raw() > 0);
    }

    #[test]
    fn test_render_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let resampler = Resampler::default();
        let result = render_file(
            &dir.path().join("missing.wav"),
            &dir.path().join("out.wav"),
            48000,
            &resampler,
        );
        assert!(matches!(result, Err(RenderError::Wav(_))));
    }
}
