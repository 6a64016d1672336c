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
use std::{fmt, str::FromStr};

use serde::Deserialize;

use super::error::SettingsParseError;
use super::wfir::WindowType;

/// Default cutoff of the windowed FIR table.
pub const DEFAULT_WFIR_CUTOFF: f64 = 0.97;

/// Interpolation quality used when mixing a sample.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ResamplingMode {
    /// No interpolation.
    Nearest,
    /// Two-point linear interpolation.
    Linear,
    /// Four-tap cubic spline.
    Cubic,
    /// Eight-tap windowed FIR.
    Sinc8,
    /// Eight-tap polyphase Kaiser sinc with automatic anti-aliasing when downsampling.
    #[default]
    Sinc8Lowpass,
}

impl ResamplingMode {
    pub const ALL: [ResamplingMode; 5] = [
        ResamplingMode::Nearest,
        ResamplingMode::Linear,
        ResamplingMode::Cubic,
        ResamplingMode::Sinc8,
        ResamplingMode::Sinc8Lowpass,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResamplingMode::Nearest => "nearest",
            ResamplingMode::Linear => "linear",
            ResamplingMode::Cubic => "cubic",
            ResamplingMode::Sinc8 => "sinc8",
            ResamplingMode::Sinc8Lowpass => "sinc8-lowpass",
        }
    }

    /// Number of input samples that contribute to one output sample.
    pub fn taps(self) -> usize {
        match self {
            ResamplingMode::Nearest => 1,
            ResamplingMode::Linear => 2,
            ResamplingMode::Cubic => 4,
            ResamplingMode::Sinc8 | ResamplingMode::Sinc8Lowpass => 8,
        }
    }
}

impl FromStr for ResamplingMode {
    type Err = SettingsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResamplingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SettingsParseError::UnknownMode(s.to_string()))
    }
}

impl fmt::Display for ResamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime resampler settings.
///
/// Only the windowed FIR table depends on these; every other table is fixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResamplerSettings {
    pub mode: ResamplingMode,
    pub wfir_cutoff: f64,
    pub wfir_type: WindowType,
}

impl ResamplerSettings {
    pub fn new(mode: ResamplingMode, wfir_cutoff: f64, wfir_type: WindowType) -> Self {
        ResamplerSettings {
            mode,
            wfir_cutoff,
            wfir_type,
        }
    }

    pub fn with_mode(self, mode: ResamplingMode) -> Self {
        ResamplerSettings { mode, ..self }
    }

    pub fn with_wfir_cutoff(self, wfir_cutoff: f64) -> Self {
        ResamplerSettings {
            wfir_cutoff,
            ..self
        }
    }

    pub fn with_wfir_type(self, wfir_type: WindowType) -> Self {
        ResamplerSettings { wfir_type, ..self }
    }
}

impl Default for ResamplerSettings {
    fn default() -> Self {
        ResamplerSettings {
            mode: ResamplingMode::default(),
            wfir_cutoff: DEFAULT_WFIR_CUTOFF,
            wfir_type: WindowType::default(),
        }
    }
}
