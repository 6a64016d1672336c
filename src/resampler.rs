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
//! Interpolation coefficient tables and the resampler that owns them.
use tracing::debug;

pub mod coefficient;
pub mod cubic;
pub mod error;
pub mod interpolate;
pub mod settings;
pub mod sinc;
pub mod table;
pub mod tables;
pub mod wfir;


pub use coefficient::{Coefficient, MixCoefficient, MixSample};
pub use cubic::CubicTable;
pub use error::SettingsParseError;
pub use interpolate::{Interpolator, PolyphaseTable, SamplePosition};
pub use settings::{ResamplerSettings, ResamplingMode};
pub use sinc::{SincTable, WindowParameters};
pub use tables::{ResamplerTableSet, SharedTableCache, SincTableSet, TableSource};
pub use wfir::{WindowType, WindowedFirTable};

/// Owns the interpolation tables used by the mixer and hands out read-only views of them.
#[derive(Clone, Debug)]
pub struct Resampler {
    settings: ResamplerSettings,
    tables: ResamplerTableSet,
}

impl Resampler {
    /// Creates a resampler backed by the process-wide table cache.
    pub fn new(settings: ResamplerSettings) -> Self {
        Resampler::build(settings, TableSource::Cache)
    }

    /// Creates a resampler that computes all of its tables itself.
    pub fn with_fresh_tables(settings: ResamplerSettings) -> Self {
        Resampler::build(settings, TableSource::Scratch)
    }

    /// Creates a resampler from the given table source.
    pub fn build(settings: ResamplerSettings, source: TableSource) -> Self {
        debug!(mode = %settings.mode, ?source, "Creating resampler");
        Resampler {
            tables: ResamplerTableSet::build(&settings, source),
            settings,
        }
    }

    pub fn settings(&self) -> &ResamplerSettings {
        &self.settings
    }

    /// Replaces the settings and regenerates dependent tables if needed.
    /// Returns whether the windowed FIR table was regenerated.
    pub fn set_settings(&mut self, settings: ResamplerSettings) -> bool {
        self.settings = settings;
        self.update_tables()
    }

    /// Brings the windowed FIR table in line with the current settings.
    pub fn update_tables(&mut self) -> bool {
        self.initialize_tables_from_scratch(false)
    }

    /// See [`ResamplerTableSet::initialize_from_scratch`].
    pub fn initialize_tables_from_scratch(&mut self, force: bool) -> bool {
        self.tables.initialize_from_scratch(&self.settings, force)
    }

    /// Switches this instance over to the shared tables.
    pub fn initialize_tables_from_cache(&mut self) {
        self.tables.initialize_from_cache(&self.settings);
    }

    pub fn tables(&self) -> &ResamplerTableSet {
        &self.tables
    }

    pub fn kaiser_sinc(&self) -> &SincTable<MixCoefficient> {
        &self.tables.sinc().kaiser_sinc
    }

    pub fn downsample_13x(&self) -> &SincTable<MixCoefficient> {
        &self.tables.sinc().downsample_13x
    }

    pub fn downsample_2x(&self) -> &SincTable<MixCoefficient> {
        &self.tables.sinc().downsample_2x
    }

    pub fn cubic_spline(&self) -> &CubicTable<MixCoefficient> {
        &self.tables.sinc().cubic_spline
    }

    pub fn windowed_fir(&self) -> &WindowedFirTable<MixCoefficient> {
        self.tables.windowed_fir()
    }

    /// The polyphase sinc table suited to playing back at `increment`.
    pub fn polyphase_table(&self, increment: SamplePosition) -> &SincTable<MixCoefficient> {
        match PolyphaseTable::for_increment(increment) {
            PolyphaseTable::KaiserSinc => self.kaiser_sinc(),
            PolyphaseTable::Downsample13x => self.downsample_13x(),
            PolyphaseTable::Downsample2x => self.downsample_2x(),
        }
    }

    /// An interpolator for the configured mode at the given playback increment.
    pub fn interpolator(&self, increment: SamplePosition) -> Interpolator<'_, MixCoefficient> {
        match self.settings.mode {
            ResamplingMode::Nearest => Interpolator::nearest(),
            ResamplingMode::Linear => Interpolator::linear(),
            ResamplingMode::Cubic => Interpolator::cubic(self.cubic_spline()),
            ResamplingMode::Sinc8 => Interpolator::windowed_fir(self.windowed_fir()),
            ResamplingMode::Sinc8Lowpass => Interpolator::polyphase(self.polyphase_table(increment)),
        }
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Resampler::new(ResamplerSettings::default())
    }
}
