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
use clap::{crate_version, Parser, Subcommand, ValueEnum};
use modresample::config::{parse_resampler_config, ResamplerConfig};
use modresample::render::render_file;
use modresample::resampler::coefficient::{CUBIC_QUANTSHIFT, SINC_QUANTSHIFT, WFIR_QUANTSHIFT};
use modresample::resampler::{Coefficient, MixCoefficient, Resampler, ResamplingMode};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Tracker-style interpolation tables and resampler."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TableName {
    KaiserSinc,
    Downsample13x,
    Downsample2x,
    CubicSpline,
    WindowedFir,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the generated tables along with their shape and gain.
    Tables {
        /// The path to a resampler config.
        #[arg[short, long]]
        config: Option<PathBuf>,
    },
    /// Prints the coefficients of one table.
    Dump {
        /// The table to print.
        #[arg(value_enum)]
        table: TableName,
        /// Only print this phase.
        #[arg[short, long]]
        phase: Option<usize>,
        /// The path to a resampler config.
        #[arg[short, long]]
        config: Option<PathBuf>,
    },
    /// Resamples a WAV file to a new sample rate.
    Render {
        /// The WAV file to read.
        input: PathBuf,
        /// The WAV file to write.
        output: PathBuf,
        /// The target sample rate in Hz.
        #[arg[short, long]]
        rate: u32,
        /// The path to a resampler config.
        #[arg[short, long]]
        config: Option<PathBuf>,
        /// Overrides the interpolation mode of the config.
        #[arg[short, long]]
        mode: Option<ResamplingMode>,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<ResamplerConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(parse_resampler_config(&path)?),
        None => Ok(ResamplerConfig::default()),
    }
}

fn print_rows<C: Coefficient>(rows: &[C], taps: usize, shift: u32, only: Option<usize>) {
    for (phase, row) in rows.chunks(taps).enumerate() {
        if only.is_some_and(|only| only != phase) {
            continue;
        }
        let values: Vec<String> = row
            .iter()
            .map(|c| format!("{:>10.6}", c.dequantize(shift)))
            .collect();
        println!("{:>4}: {}", phase, values.join(" "));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tables { config } => {
            let settings = load_config(config)?.to_settings()?;
            let resampler = Resampler::new(settings);

            println!(
                "Tables ({}, window: {}, cutoff: {}):",
                MixCoefficient::NAME,
                settings.wfir_type,
                settings.wfir_cutoff
            );
            let sinc = [
                ("kaiser-sinc", resampler.kaiser_sinc()),
                ("downsample13x", resampler.downsample_13x()),
                ("downsample2x", resampler.downsample_2x()),
            ];
            for (name, table) in sinc {
                let (min, max) = table.gain_range(SINC_QUANTSHIFT);
                println!(
                    "- {}: {}x{}, gain {:.5}..{:.5}",
                    name,
                    table.phases(),
                    table.taps(),
                    min,
                    max
                );
            }
            let cubic = resampler.cubic_spline();
            let (min, max) = cubic.gain_range(CUBIC_QUANTSHIFT);
            println!(
                "- cubic-spline: {}x{}, gain {:.5}..{:.5}",
                cubic.phases(),
                cubic.taps(),
                min,
                max
            );
            let wfir = resampler.windowed_fir();
            let (min, max) = wfir.gain_range(WFIR_QUANTSHIFT);
            println!(
                "- windowed-fir: {}x{}, gain {:.5}..{:.5}",
                wfir.phases(),
                wfir.taps(),
                min,
                max
            );
        }
        Commands::Dump {
            table,
            phase,
            config,
        } => {
            let settings = load_config(config)?.to_settings()?;
            let resampler = Resampler::new(settings);
            match table {
                TableName::KaiserSinc => {
                    let table = resampler.kaiser_sinc();
                    print_rows(table.as_slice(), table.taps(), SINC_QUANTSHIFT, phase)
                }
                TableName::Downsample13x => {
                    let table = resampler.downsample_13x();
                    print_rows(table.as_slice(), table.taps(), SINC_QUANTSHIFT, phase)
                }
                TableName::Downsample2x => {
                    let table = resampler.downsample_2x();
                    print_rows(table.as_slice(), table.taps(), SINC_QUANTSHIFT, phase)
                }
                TableName::CubicSpline => {
                    let table = resampler.cubic_spline();
                    print_rows(table.as_slice(), table.taps(), CUBIC_QUANTSHIFT, phase)
                }
                TableName::WindowedFir => {
                    let table = resampler.windowed_fir();
                    print_rows(table.as_slice(), table.taps(), WFIR_QUANTSHIFT, phase)
                }
            }
        }
        Commands::Render {
            input,
            output,
            rate,
            config,
            mode,
        } => {
            let settings = load_config(config)?.with_mode(mode).to_settings()?;
            let resampler = Resampler::new(settings);
            let summary = render_file(&input, &output, rate, &resampler)?;
            println!(
                "Rendered {} frames at {}Hz into {} frames at {}Hz ({}, {} channels).",
                summary.input_frames,
                summary.source_rate,
                summary.output_frames,
                summary.target_rate,
                summary.mode,
                summary.channels
            );
        }
    }

    Ok(())
}
