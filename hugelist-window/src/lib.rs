//! Element windowing on top of the `hugelist` coordinate engine.
//!
//! `hugelist` answers "which indices are visible and where do they go". This crate keeps
//! live view elements for exactly those indices:
//!
//! - creates elements through an [`ElementFactory`] once their item is loaded,
//! - recycles elements that leave the window,
//! - requests missing ranges from a [`DataSource`] (visible items first, prefetch after),
//! - measures new elements on the next paint-safe tick and feeds the sizes back into the
//!   estimate,
//! - positions every element back to back from the mapper's origin.
//!
//! The host toolkit is abstracted behind [`ViewElement`]; no UI framework is linked.
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod deferred;
mod element;
mod event;
mod loads;
mod options;
mod pool;
mod source;
mod window;

#[cfg(test)]
mod tests;

pub use element::{ElementFactory, ElementLayout, Rendered, TemplateError, ViewElement};
pub use event::{EngineEvent, RebuildStats, RenderOutcome, SkipReason};
pub use options::WindowOptions;
pub use source::{DataSource, LoadError, LoadId, LoadPriority, LoadRequest};
pub use window::WindowManager;

pub use hugelist::{
    Align, CoordinateMapper, CoordinateSpace, EstimateChanged, IndexRange, ItemSizeCache,
    MapperOptions, MeasurementSnapshot, ScrollSnapshot, SizeCacheOptions, VirtualSizeChanged,
};
