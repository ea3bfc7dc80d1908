use core::fmt;

use indexmap::IndexMap;

use crate::state::MeasurementSnapshot;
use crate::{EstimateChanged, SizeCacheOptions};

/// Why a measurement was not recorded.
///
/// Rejections never disturb the cache: the item keeps resolving to the running estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureError {
    /// Zero or negative size, typically from an element that is not laid out yet.
    NonPositiveSize { index: usize, size: f64 },
    /// NaN or infinite size.
    NonFiniteSize { index: usize },
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureError::NonPositiveSize { index, size } => {
                write!(f, "item {index}: size {size} is not positive")
            }
            MeasureError::NonFiniteSize { index } => {
                write!(f, "item {index}: size is not finite")
            }
        }
    }
}

impl std::error::Error for MeasureError {}

/// Bounded cache of measured item sizes plus the running estimate used for everything
/// that has not been measured.
///
/// Entries are evicted in insertion order. Re-measuring an index updates the value in
/// place without refreshing its position in the eviction queue.
///
/// The estimate is the mean of the cached sizes, recomputed at most once per debounce
/// window (see [`ItemSizeCache::poll_estimate`]) and only adopted when it moves outside a
/// hysteresis band, so that a burst of first measurements produces a single update.
#[derive(Clone, Debug)]
pub struct ItemSizeCache {
    options: SizeCacheOptions,
    sizes: IndexMap<usize, f64>,
    estimate: f64,
    pending_since_ms: Option<u64>,
}

impl ItemSizeCache {
    pub fn new(options: SizeCacheOptions) -> Self {
        let options = options.sanitized();
        vdebug!(
            default_estimate = options.default_estimate,
            capacity = options.capacity,
            "ItemSizeCache::new"
        );
        Self {
            estimate: options.default_estimate,
            sizes: IndexMap::with_capacity(options.capacity.min(4096)),
            pending_since_ms: None,
            options,
        }
    }

    pub fn options(&self) -> &SizeCacheOptions {
        &self.options
    }

    /// Records a measured size for `index`.
    ///
    /// Invalid sizes are logged and rejected; the error is informational only.
    pub fn record(&mut self, index: usize, size: f64, now_ms: u64) -> Result<(), MeasureError> {
        if !size.is_finite() {
            vwarn!(index, "rejecting non-finite measurement");
            return Err(MeasureError::NonFiniteSize { index });
        }
        if size <= 0.0 {
            vwarn!(index, size, "rejecting non-positive measurement");
            return Err(MeasureError::NonPositiveSize { index, size });
        }

        self.sizes.insert(index, size);
        if self.sizes.len() > self.options.capacity {
            self.evict_oldest();
        }
        if self.pending_since_ms.is_none() {
            self.pending_since_ms = Some(now_ms);
        }
        Ok(())
    }

    fn evict_oldest(&mut self) {
        let batch = (self.options.capacity as f64 * self.options.eviction_fraction).ceil() as usize;
        let batch = batch.max(1).min(self.sizes.len());
        vtrace!(batch, len = self.sizes.len(), "evicting oldest measurements");
        self.sizes.drain(..batch);
    }

    /// Returns the measured size of `index`, or the estimate when it is not cached.
    pub fn get(&self, index: usize) -> f64 {
        self.sizes.get(&index).copied().unwrap_or(self.estimate)
    }

    pub fn has(&self, index: usize) -> bool {
        self.sizes.contains_key(&index)
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.options.capacity
    }

    /// Whether measurements arrived since the estimate was last recomputed.
    pub fn has_pending_estimate(&self) -> bool {
        self.pending_since_ms.is_some()
    }

    /// Recomputes the estimate once the debounce window opened by the first pending
    /// measurement has elapsed.
    ///
    /// Returns `Some` only when the estimate actually moved.
    pub fn poll_estimate(&mut self, now_ms: u64) -> Option<EstimateChanged> {
        let since = self.pending_since_ms?;
        if now_ms.saturating_sub(since) < self.options.estimate_debounce_ms {
            return None;
        }
        self.recompute_estimate()
    }

    /// Recomputes the estimate immediately if any measurement is pending.
    pub fn flush_estimate(&mut self) -> Option<EstimateChanged> {
        self.pending_since_ms?;
        self.recompute_estimate()
    }

    fn recompute_estimate(&mut self) -> Option<EstimateChanged> {
        self.pending_since_ms = None;
        if self.sizes.is_empty() {
            return None;
        }

        let mean = self.sizes.values().sum::<f64>() / self.sizes.len() as f64;
        let band = self
            .options
            .hysteresis_min
            .max(self.estimate * self.options.hysteresis_ratio);
        if (mean - self.estimate).abs() <= band {
            vtrace!(mean, estimate = self.estimate, "estimate within hysteresis band");
            return None;
        }

        let previous = self.estimate;
        self.estimate = mean;
        vdebug!(previous, current = mean, samples = self.sizes.len(), "estimate changed");
        Some(EstimateChanged {
            previous,
            current: mean,
        })
    }

    /// Sums item sizes.
    ///
    /// With `Some(total_items)`, returns the size of `[0, total_items)` using measured
    /// sizes where cached and the estimate elsewhere. With `None`, returns the sum of the
    /// cached measurements only.
    pub fn total_size(&self, total_items: Option<usize>) -> f64 {
        match total_items {
            Some(total_items) => {
                let correction: f64 = self
                    .sizes
                    .iter()
                    .filter(|(index, _)| **index < total_items)
                    .map(|(_, size)| size - self.estimate)
                    .sum();
                total_items as f64 * self.estimate + correction
            }
            None => self.sizes.values().sum(),
        }
    }

    /// Forgets all measurements. The current estimate is kept.
    pub fn clear(&mut self) {
        vdebug!(len = self.sizes.len(), "ItemSizeCache::clear");
        self.sizes.clear();
        self.pending_since_ms = None;
    }

    /// Restores the configured default estimate.
    pub fn reset_estimate(&mut self) {
        self.estimate = self.options.default_estimate;
        self.pending_since_ms = None;
    }

    /// Exports the cached measurements in eviction order (oldest first).
    pub fn export_measurements(&self) -> MeasurementSnapshot {
        MeasurementSnapshot {
            estimate: self.estimate,
            entries: self.sizes.iter().map(|(&i, &s)| (i, s)).collect(),
        }
    }

    /// Replaces the cached measurements with `snapshot` and recomputes the estimate.
    ///
    /// Invalid entries are skipped. Returns the number of accepted entries.
    pub fn import_measurements(&mut self, snapshot: MeasurementSnapshot) -> usize {
        self.clear();
        if snapshot.estimate.is_finite() && snapshot.estimate > 0.0 {
            self.estimate = snapshot.estimate;
        }

        let mut accepted = 0usize;
        for (index, size) in snapshot.entries {
            if self.record(index, size, 0).is_ok() {
                accepted += 1;
            }
        }
        vdebug!(accepted, "import_measurements");
        self.flush_estimate();
        accepted
    }
}

impl Default for ItemSizeCache {
    fn default() -> Self {
        Self::new(SizeCacheOptions::default())
    }
}
