/// How a target item should be aligned in the viewport by scroll-to helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Keeps the current position when the item is already fully visible, otherwise
    /// scrolls the minimal distance.
    Auto,
}

/// An inclusive `[start, end]` range of item indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start: usize,
    pub end: usize, // inclusive
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "IndexRange: start > end ({start} > {end})");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn covers(&self, other: &IndexRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Grows the range by `amount` on both sides, clamped to `[0, last]`.
    pub fn expand(&self, amount: usize, last: usize) -> IndexRange {
        IndexRange {
            start: self.start.saturating_sub(amount),
            end: self.end.saturating_add(amount).min(last),
        }
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// The bounded scroll space exposed to the host surface.
///
/// `actual_total_size` is what the collection would measure at the current estimate;
/// `virtual_total_size` is that value capped at the mapper's maximum. The ratio between
/// the two is the compression applied to every index ↔ position conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateSpace {
    pub actual_total_size: f64,
    pub virtual_total_size: f64,
    pub compression_ratio: f64,
}

impl CoordinateSpace {
    pub const EMPTY: CoordinateSpace = CoordinateSpace {
        actual_total_size: 0.0,
        virtual_total_size: 0.0,
        compression_ratio: 1.0,
    };

    pub fn is_compressed(&self) -> bool {
        self.compression_ratio < 1.0
    }
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Emitted when the running size estimate moves outside its hysteresis band.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimateChanged {
    pub previous: f64,
    pub current: f64,
}

/// Emitted when the capped virtual size changes. Consumers typically resize the
/// scrollbar track in response.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualSizeChanged {
    pub previous: f64,
    pub current: f64,
    pub compressed: bool,
}
