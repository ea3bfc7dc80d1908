use hugelist::{MapperOptions, SizeCacheOptions};

/// Configuration for [`crate::WindowManager`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowOptions {
    pub cache: SizeCacheOptions,
    pub mapper: MapperOptions,
    /// Items beyond each side of the viewport requested at low priority. `0` disables
    /// prefetching.
    pub prefetch: usize,
}

impl WindowOptions {
    /// Options for a viewport of `viewport_size` with items estimated at `estimate`.
    pub fn new(viewport_size: f64, estimate: f64) -> Self {
        Self {
            cache: SizeCacheOptions::new(estimate),
            mapper: MapperOptions::new(viewport_size),
            prefetch: 0,
        }
    }

    pub fn with_cache(mut self, cache: SizeCacheOptions) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_mapper(mut self, mapper: MapperOptions) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.mapper.overscan = overscan;
        self
    }

    pub fn with_prefetch(mut self, prefetch: usize) -> Self {
        self.prefetch = prefetch;
        self
    }

    pub fn with_max_virtual_size(mut self, max_virtual_size: f64) -> Self {
        self.mapper.max_virtual_size = max_virtual_size;
        self
    }
}
