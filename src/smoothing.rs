//! Adaptive smoothing of link positions for the rendered strap.

use crate::config::SmoothingConfig;
use crate::float::Float;
use crate::vec::Vec3;
use alloc::collections::BTreeMap;

/// Smoothed copies of link positions, keyed by link index.
///
/// Entries are created on first observation and live until [`clear`]. The
/// solver's bodies are never touched: this is a side table owned by the strap.
///
/// [`clear`]: LinkSmoother::clear
#[derive(Clone, Debug)]
pub struct LinkSmoother<F: Float> {
    config: SmoothingConfig<F>,
    smoothed: BTreeMap<usize, Vec3<F>>,
}

impl<F: Float> LinkSmoother<F> {
    pub fn new(config: SmoothingConfig<F>) -> Self {
        LinkSmoother { config, smoothed: BTreeMap::new() }
    }

    pub fn config(&self) -> &SmoothingConfig<F> {
        &self.config
    }

    /// Move link `index`'s smoothed position toward `raw` and return it.
    /// The first call for an index just records `raw`.
    pub fn update(&mut self, index: usize, raw: Vec3<F>, dt: F) -> Vec3<F> {
        let config = self.config;
        let entry = self.smoothed.entry(index).or_insert(raw);
        let factor = config.factor(dt, entry.distance(raw));
        *entry = entry.lerp(raw, factor);
        log::trace!("link {} smoothing factor {:?}", index, factor);
        *entry
    }

    pub fn get(&self, index: usize) -> Option<Vec3<F>> {
        self.smoothed.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.smoothed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smoothed.is_empty()
    }

    pub fn clear(&mut self) {
        self.smoothed.clear();
    }
}
