use core::fmt;

use alloc::string::String;

use hugelist::IndexRange;

/// How urgently a range is needed.
///
/// Ordered so that `High > Low`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadPriority {
    /// Prefetch beyond the viewport.
    Low,
    /// Currently visible items.
    High,
}

/// Identifies one load request issued to a [`DataSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadId(pub u64);

/// A request for the data source to backfill the items of `range`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadRequest {
    pub id: LoadId,
    pub range: IndexRange,
    pub priority: LoadPriority,
}

/// Why a load request did not complete.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadError {
    /// The source gave up on the request (network error, backend rejection, ...).
    Failed(String),
    /// The source dropped the request before it resolved.
    Cancelled,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Failed(reason) => write!(f, "load failed: {reason}"),
            LoadError::Cancelled => f.write_str("load cancelled"),
        }
    }
}

impl std::error::Error for LoadError {}

/// The collection being windowed.
///
/// Items are sparse: `item_at` returns `None` for indices that are not loaded yet. The
/// window manager never owns item data; it only reads availability.
///
/// Loading is asynchronous. `load_missing_ranges` only starts a request; the owner reports
/// its outcome through `WindowManager::complete_load` whenever it resolves. Requests may
/// overlap and resolve in any order.
pub trait DataSource {
    type Item;

    fn total_items(&self) -> usize;

    /// Number of items currently held locally.
    fn loaded_count(&self) -> usize;

    fn item_at(&self, index: usize) -> Option<&Self::Item>;

    fn load_missing_ranges(&mut self, request: LoadRequest);
}
