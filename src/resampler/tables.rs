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
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{debug, info, span, Level};

use super::coefficient::{Coefficient, MixCoefficient};
use super::cubic::{cubic_spline_table, CubicTable};
use super::settings::ResamplerSettings;
use super::sinc::{generate_sinc_table, SincTable, WindowParameters};
use super::wfir::{generate_windowed_fir_table, WindowedFirTable};

/// The tables that do not depend on runtime settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SincTableSet<C: Coefficient> {
    /// Upsampling and 1:1 playback.
    pub kaiser_sinc: SincTable<C>,
    /// Downsampling by up to 1.333x.
    pub downsample_13x: SincTable<C>,
    /// Downsampling by 2x and beyond.
    pub downsample_2x: SincTable<C>,
    pub cubic_spline: CubicTable<C>,
}

impl<C: Coefficient> SincTableSet<C> {
    /// Computes all parameter independent tables.
    pub fn generate() -> Self {
        let start = Instant::now();
        let set = SincTableSet {
            kaiser_sinc: generate_sinc_table(WindowParameters::UPSAMPLE),
            downsample_13x: generate_sinc_table(WindowParameters::DOWNSAMPLE_13X),
            downsample_2x: generate_sinc_table(WindowParameters::DOWNSAMPLE_2X),
            cubic_spline: cubic_spline_table(),
        };
        debug!(
            representation = C::NAME,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Generated sinc tables"
        );
        set
    }
}

/// Generates the windowed FIR table for the given settings.
fn windowed_fir_for<C: Coefficient>(settings: &ResamplerSettings) -> WindowedFirTable<C> {
    let start = Instant::now();
    let table = generate_windowed_fir_table(settings.wfir_cutoff, settings.wfir_type);
    debug!(
        cutoff = settings.wfir_cutoff,
        window = %settings.wfir_type,
        representation = C::NAME,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Generated windowed FIR table"
    );
    table
}

/// Where a table set takes its parameter independent tables from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableSource {
    /// Compute everything for this instance.
    Scratch,
    /// Share the process-wide tables, computing them on first use.
    Cache,
}

/// All coefficient tables owned by one resampler.
///
/// Tables are held behind `Arc` so instances built from the cache share one immutable
/// copy. Regeneration replaces the `Arc` and never writes through it, so other holders
/// keep the data they already read.
#[derive(Clone, Debug)]
pub struct ResamplerTableSet {
    sinc: Arc<SincTableSet<MixCoefficient>>,
    windowed_fir: Arc<WindowedFirTable<MixCoefficient>>,
    /// The settings the windowed FIR table was last generated for.
    applied: ResamplerSettings,
}

impl ResamplerTableSet {
    /// Builds a table set for `settings`. This is the only place tables are acquired;
    /// both the scratch and the cached path go through it.
    pub fn build(settings: &ResamplerSettings, source: TableSource) -> Self {
        let (sinc, windowed_fir) = match source {
            TableSource::Scratch => (
                Arc::new(SincTableSet::generate()),
                Arc::new(windowed_fir_for(settings)),
            ),
            TableSource::Cache => {
                let cache = SharedTableCache::get();
                let windowed_fir = cache
                    .windowed_fir_for(settings)
                    .unwrap_or_else(|| Arc::new(windowed_fir_for(settings)));
                (Arc::clone(&cache.tables.sinc), windowed_fir)
            }
        };

        ResamplerTableSet {
            sinc,
            windowed_fir,
            applied: *settings,
        }
    }

    /// Recomputes tables for `settings`.
    ///
    /// With `force`, every table is computed again for this instance. Otherwise the
    /// parameter independent tables are kept, and the windowed FIR table is only
    /// regenerated when `settings` differ from the ones it was built for.
    /// Returns whether the windowed FIR table was regenerated.
    pub fn initialize_from_scratch(&mut self, settings: &ResamplerSettings, force: bool) -> bool {
        if force {
            self.sinc = Arc::new(SincTableSet::generate());
        }

        if !force && self.applied == *settings {
            return false;
        }

        self.windowed_fir = Arc::new(windowed_fir_for(settings));
        self.applied = *settings;
        true
    }

    /// Replaces this instance's tables with the shared ones.
    pub fn initialize_from_cache(&mut self, settings: &ResamplerSettings) {
        *self = ResamplerTableSet::build(settings, TableSource::Cache);
    }

    pub fn sinc(&self) -> &SincTableSet<MixCoefficient> {
        &self.sinc
    }

    pub fn windowed_fir(&self) -> &WindowedFirTable<MixCoefficient> {
        &self.windowed_fir
    }

    /// The settings the windowed FIR table currently reflects.
    pub fn applied_settings(&self) -> &ResamplerSettings {
        &self.applied
    }

    /// Whether both sets hold the same parameter independent tables in memory.
    pub fn shares_sinc_tables(&self, other: &ResamplerTableSet) -> bool {
        Arc::ptr_eq(&self.sinc, &other.sinc)
    }

    /// Whether both sets hold the same windowed FIR table in memory.
    pub fn shares_windowed_fir(&self, other: &ResamplerTableSet) -> bool {
        Arc::ptr_eq(&self.windowed_fir, &other.windowed_fir)
    }
}

static SHARED_TABLES: OnceLock<SharedTableCache> = OnceLock::new();
static SHARED_TABLE_BUILDS: AtomicUsize = AtomicUsize::new(0);

/// Process-wide immutable tables, computed from scratch exactly once on first access.
///
/// Concurrent first accesses block until the single initializer finishes.
#[derive(Debug)]
pub struct SharedTableCache {
    tables: ResamplerTableSet,
}

impl SharedTableCache {
    /// Returns the shared tables, computing them if this is the first access.
    pub fn get() -> &'static SharedTableCache {
        SHARED_TABLES.get_or_init(|| {
            let span = span!(Level::INFO, "shared resampler tables");
            let _enter = span.enter();

            let start = Instant::now();
            let settings = ResamplerSettings::default();
            let tables = ResamplerTableSet::build(&settings, TableSource::Scratch);
            SHARED_TABLE_BUILDS.fetch_add(1, Ordering::Relaxed);
            info!(
                elapsed_us = start.elapsed().as_micros() as u64,
                "Initialized shared resampler tables"
            );
            SharedTableCache { tables }
        })
    }

    /// Whether the shared tables have been computed in this process.
    pub fn is_initialized() -> bool {
        SHARED_TABLES.get().is_some()
    }

    /// How many times the shared tables were computed. Never exceeds one.
    pub fn build_count() -> usize {
        SHARED_TABLE_BUILDS.load(Ordering::Relaxed)
    }

    pub fn tables(&self) -> &ResamplerTableSet {
        &self.tables
    }

    /// The cached windowed FIR table, if it was built for the same cutoff and window.
    fn windowed_fir_for(
        &self,
        settings: &ResamplerSettings,
    ) -> Option<Arc<WindowedFirTable<MixCoefficient>>> {
        let cached = &self.tables.applied;
        (cached.wfir_cutoff == settings.wfir_cutoff && cached.wfir_type == settings.wfir_type)
            .then(|| Arc::clone(&self.tables.windowed_fir))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::resampler::settings::ResamplingMode;
    use crate::resampler::wfir::WindowType;

    #[test]
    fn test_cached_sets_share_tables() {
        let settings = ResamplerSettings::default();
        let first = ResamplerTableSet::build(&settings, TableSource::Cache);
        let second = ResamplerTableSet::build(&settings, TableSource::Cache);
        assert!(first.shares_sinc_tables(&second));
        assert!(first.shares_windowed_fir(&second));
        assert!(SharedTableCache::is_initialized());
    }

    #[test]
    fn test_cache_reuses_windowed_fir_only_for_matching_parameters() {
        let settings = ResamplerSettings::default().with_wfir_cutoff(0.8);
        let custom = ResamplerTableSet::build(&settings, TableSource::Cache);
        let cache = SharedTableCache::get();
        assert!(custom.shares_sinc_tables(cache.tables()));
        assert!(!custom.shares_windowed_fir(cache.tables()));
        assert_eq!(custom.applied_settings(), &settings);

        // The mode does not influence the windowed FIR table.
        let linear = ResamplerSettings::default().with_mode(ResamplingMode::Linear);
        let linear = ResamplerTableSet::build(&linear, TableSource::Cache);
        assert!(linear.shares_windowed_fir(cache.tables()));
    }

    #[test]
    fn test_scratch_sets_do_not_share() {
        let settings = ResamplerSettings::default();
        let cached = ResamplerTableSet::build(&settings, TableSource::Cache);
        let scratch = ResamplerTableSet::build(&settings, TableSource::Scratch);
        assert!(!cached.shares_sinc_tables(&scratch));
        assert!(!cached.shares_windowed_fir(&scratch));
    }

    #[test]
    fn test_scratch_and_cache_agree() {
        let settings = ResamplerSettings::default();
        let cached = ResamplerTableSet::build(&settings, TableSource::Cache);
        let scratch = ResamplerTableSet::build(&settings, TableSource::Scratch);
        assert_eq!(cached.sinc(), scratch.sinc());
        assert_eq!(cached.windowed_fir(), scratch.windowed_fir());
    }

    #[test]
    fn test_initialize_without_force_is_idempotent() {
        let settings = ResamplerSettings::default();
        let mut set = ResamplerTableSet::build(&settings, TableSource::Scratch);
        let before = set.clone();

        assert!(!set.initialize_from_scratch(&settings, false));
        assert!(!set.initialize_from_scratch(&settings, false));
        assert!(set.shares_sinc_tables(&before));
        assert!(set.shares_windowed_fir(&before));
    }

    #[test]
    fn test_settings_change_regenerates_windowed_fir_only() {
        let settings = ResamplerSettings::default();
        let mut set = ResamplerTableSet::build(&settings, TableSource::Scratch);
        let before = set.clone();

        let changed = settings.with_wfir_cutoff(0.6).with_wfir_type(WindowType::Hann);
        assert!(set.initialize_from_scratch(&changed, false));
        assert!(set.shares_sinc_tables(&before));
        assert!(!set.shares_windowed_fir(&before));
        if !cfg!(feature = "fuzzing") {
            assert_ne!(set.windowed_fir(), before.windowed_fir());
        }
        assert_eq!(set.applied_settings(), &changed);

        // Applying the same settings again is a no-op.
        assert!(!set.initialize_from_scratch(&changed, false));
    }

    #[test]
    fn test_force_regenerates_everything() {
        let settings = ResamplerSettings::default();
        let mut set = ResamplerTableSet::build(&settings, TableSource::Cache);
        let before = set.clone();

        assert!(set.initialize_from_scratch(&settings, true));
        assert!(!set.shares_sinc_tables(&before));
        assert!(!set.shares_windowed_fir(&before));
        assert_eq!(set.sinc(), before.sinc());
        assert_eq!(set.windowed_fir(), before.windowed_fir());
    }

    #[test]
    fn test_initialize_from_cache_restores_sharing() {
        let settings = ResamplerSettings::default();
        let mut set = ResamplerTableSet::build(&settings, TableSource::Scratch);
        set.initialize_from_cache(&settings);
        assert!(set.shares_sinc_tables(SharedTableCache::get().tables()));
    }

    // Other tests in this binary may have built the cache already, so this only checks
    // that racing callers agree on one instance. tests/shared_cache.rs covers a cold start.
    #[test]
    fn test_concurrent_access_sees_one_instance() {
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    SharedTableCache::get() as *const SharedTableCache as usize
                })
            })
            .collect();
        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(SharedTableCache::build_count(), 1);
    }
}
