use alloc::vec::Vec;

/// A serializable copy of the measurement cache.
///
/// Useful for persisting measurements across screens or sessions so that a fresh cache
/// starts from a realistic estimate instead of the configured default.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasurementSnapshot {
    pub estimate: f64,
    /// `(index, size)` pairs, oldest first.
    pub entries: Vec<(usize, f64)>,
}

/// A serializable snapshot of where a list was scrolled to.
///
/// The position is stored both as a raw scroll offset and as the item it pointed at, so a
/// restore can fall back to the item when the coordinate space changed in between (for
/// example because the collection grew past the compression threshold).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollSnapshot {
    pub scroll_position: f64,
    pub total_items: usize,
    pub anchor_index: usize,
    pub virtual_total_size: f64,
}
