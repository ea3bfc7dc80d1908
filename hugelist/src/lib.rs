//! Size estimation and virtual coordinates for lists with millions of items.
//!
//! Host scroll surfaces have a hard ceiling on their pixel size, far below
//! `items × average size` for large collections. This crate owns the math that keeps
//! such lists scrollable:
//!
//! - [`ItemSizeCache`]: bounded cache of measured sizes and the running estimate used
//!   for everything unmeasured (debounced, with hysteresis).
//! - [`CoordinateMapper`]: index ↔ scroll-position mapping, compressing the space when it
//!   would exceed the host limit, and the visible range query with tail interpolation.
//!
//! It is UI-agnostic and holds no view objects. Element windowing, recycling and
//! positioning live in the `hugelist-window` crate.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod mapper;
mod options;
mod size_cache;
mod state;
mod types;


pub use mapper::CoordinateMapper;
pub use options::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_ESTIMATE, DEFAULT_ESTIMATE_DEBOUNCE_MS,
    DEFAULT_MAX_VIRTUAL_SIZE, MapperOptions, SizeCacheOptions,
};
pub use size_cache::{ItemSizeCache, MeasureError};
pub use state::{MeasurementSnapshot, ScrollSnapshot};
pub use types::{Align, CoordinateSpace, EstimateChanged, IndexRange, VirtualSizeChanged};
