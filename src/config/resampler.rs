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
use serde::Deserialize;

use super::error::ConfigError;
use crate::resampler::settings::DEFAULT_WFIR_CUTOFF;
use crate::resampler::{ResamplerSettings, ResamplingMode, WindowType};

/// A YAML representation of the resampler configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ResamplerConfig {
    /// Interpolation mode (default: "sinc8-lowpass").
    mode: Option<ResamplingMode>,

    /// Cutoff of the windowed FIR table, relative to Nyquist (default: 0.97).
    wfir_cutoff: Option<f64>,

    /// Window of the windowed FIR table (default: "kaiser-4t").
    wfir_type: Option<WindowType>,
}

impl ResamplerConfig {
    /// New will create a new resampler configuration.
    pub fn new(
        mode: Option<ResamplingMode>,
        wfir_cutoff: Option<f64>,
        wfir_type: Option<WindowType>,
    ) -> ResamplerConfig {
        ResamplerConfig {
            mode,
            wfir_cutoff,
            wfir_type,
        }
    }

    /// Returns the interpolation mode.
    pub fn mode(&self) -> ResamplingMode {
        self.mode.unwrap_or_default()
    }

    /// Returns the windowed FIR cutoff, validated to lie within (0, 1].
    pub fn wfir_cutoff(&self) -> Result<f64, ConfigError> {
        let cutoff = self.wfir_cutoff.unwrap_or(DEFAULT_WFIR_CUTOFF);
        if !(cutoff > 0.0 && cutoff <= 1.0) {
            return Err(ConfigError::InvalidCutoff(cutoff));
        }
        Ok(cutoff)
    }

    /// Returns the windowed FIR window type.
    pub fn wfir_type(&self) -> WindowType {
        self.wfir_type.unwrap_or_default()
    }

    /// Overrides the mode, e.g. from the command line.
    pub fn with_mode(self, mode: Option<ResamplingMode>) -> ResamplerConfig {
        ResamplerConfig {
            mode: mode.or(self.mode),
            ..self
        }
    }

    /// Converts the configuration into resampler settings.
    pub fn to_settings(&self) -> Result<ResamplerSettings, ConfigError> {
        Ok(ResamplerSettings::new(
            self.mode(),
            self.wfir_cutoff()?,
            self.wfir_type(),
        ))
    }
}
