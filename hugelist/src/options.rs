/// Largest scroll extent handed to the host surface.
///
/// Browsers and most native toolkits stop honoring element sizes somewhere between 15 and
/// 35 million pixels; 10 million leaves headroom on all of them.
pub const DEFAULT_MAX_VIRTUAL_SIZE: f64 = 10_000_000.0;

/// Size assumed for items before anything has been measured.
pub const DEFAULT_ESTIMATE: f64 = 60.0;

/// Number of measurements kept before the oldest ones are evicted.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Length of one scheduling tick (one paint frame at 60Hz).
pub const DEFAULT_ESTIMATE_DEBOUNCE_MS: u64 = 16;

/// Configuration for [`crate::ItemSizeCache`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeCacheOptions {
    /// Estimate used until enough measurements move it. Must be positive.
    pub default_estimate: f64,
    pub capacity: usize,
    /// Share of `capacity` dropped (oldest first) when the cache overflows.
    pub eviction_fraction: f64,
    /// Measurements recorded within this window are folded into one recompute.
    pub estimate_debounce_ms: u64,
    /// The estimate only moves when the new mean differs by more than
    /// `max(hysteresis_min, hysteresis_ratio * estimate)`.
    pub hysteresis_min: f64,
    pub hysteresis_ratio: f64,
}

impl Default for SizeCacheOptions {
    fn default() -> Self {
        Self {
            default_estimate: DEFAULT_ESTIMATE,
            capacity: DEFAULT_CACHE_CAPACITY,
            eviction_fraction: 0.1,
            estimate_debounce_ms: DEFAULT_ESTIMATE_DEBOUNCE_MS,
            hysteresis_min: 2.0,
            hysteresis_ratio: 0.05,
        }
    }
}

impl SizeCacheOptions {
    pub fn new(default_estimate: f64) -> Self {
        Self::default().with_default_estimate(default_estimate)
    }

    pub fn with_default_estimate(mut self, default_estimate: f64) -> Self {
        self.default_estimate = default_estimate;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_eviction_fraction(mut self, eviction_fraction: f64) -> Self {
        self.eviction_fraction = eviction_fraction;
        self
    }

    pub fn with_estimate_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.estimate_debounce_ms = debounce_ms;
        self
    }

    pub fn with_hysteresis(mut self, min: f64, ratio: f64) -> Self {
        self.hysteresis_min = min;
        self.hysteresis_ratio = ratio;
        self
    }

    /// Returns a copy with out-of-domain values replaced by their defaults.
    pub(crate) fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.default_estimate.is_finite() && self.default_estimate > 0.0) {
            vwarn!(
                default_estimate = self.default_estimate,
                "SizeCacheOptions: invalid default estimate, using {}",
                DEFAULT_ESTIMATE
            );
            self.default_estimate = defaults.default_estimate;
        }
        if self.capacity == 0 {
            self.capacity = 1;
        }
        if !(self.eviction_fraction.is_finite() && self.eviction_fraction > 0.0) {
            self.eviction_fraction = defaults.eviction_fraction;
        }
        self.eviction_fraction = self.eviction_fraction.min(1.0);
        if !(self.hysteresis_min.is_finite() && self.hysteresis_min >= 0.0) {
            self.hysteresis_min = defaults.hysteresis_min;
        }
        if !(self.hysteresis_ratio.is_finite() && self.hysteresis_ratio >= 0.0) {
            self.hysteresis_ratio = defaults.hysteresis_ratio;
        }
        self
    }
}

/// Configuration for [`crate::CoordinateMapper`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapperOptions {
    /// Size of the viewport along the scroll axis.
    pub viewport_size: f64,
    /// Items added on each side of the strictly visible range.
    pub overscan: usize,
    pub max_virtual_size: f64,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            viewport_size: 0.0,
            overscan: 1,
            max_virtual_size: DEFAULT_MAX_VIRTUAL_SIZE,
        }
    }
}

impl MapperOptions {
    pub fn new(viewport_size: f64) -> Self {
        Self::default().with_viewport_size(viewport_size)
    }

    pub fn with_viewport_size(mut self, viewport_size: f64) -> Self {
        self.viewport_size = viewport_size;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_max_virtual_size(mut self, max_virtual_size: f64) -> Self {
        self.max_virtual_size = max_virtual_size;
        self
    }

    pub(crate) fn sanitized(mut self) -> Self {
        self.viewport_size = sanitize_extent(self.viewport_size);
        if !(self.max_virtual_size.is_finite() && self.max_virtual_size > 0.0) {
            vwarn!(
                max_virtual_size = self.max_virtual_size,
                "MapperOptions: invalid max virtual size, using default"
            );
            self.max_virtual_size = DEFAULT_MAX_VIRTUAL_SIZE;
        }
        self
    }
}

/// Clamps host-reported extents (viewport sizes, scroll offsets) to finite, non-negative
/// values.
pub(crate) fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
