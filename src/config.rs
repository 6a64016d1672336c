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
use std::path::Path;

use config::{Config, File, FileFormat};
use tracing::debug;

pub mod error;
pub mod resampler;

pub use error::ConfigError;
pub use resampler::ResamplerConfig;

/// Parses a resampler configuration from a YAML file.
pub fn parse_resampler_config(file: &Path) -> Result<ResamplerConfig, ConfigError> {
    let config: ResamplerConfig = Config::builder()
        .add_source(File::from(file).format(FileFormat::Yaml))
        .build()?
        .try_deserialize()?;
    debug!(file = %file.display(), ?config, "Loaded resampler config");
    Ok(config)
}
