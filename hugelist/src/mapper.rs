use crate::options::sanitize_extent;
use crate::state::ScrollSnapshot;
use crate::{Align, CoordinateSpace, IndexRange, MapperOptions, VirtualSizeChanged};

/// Maps between item indices and the bounded scroll space of the host surface.
///
/// While `total_items * estimate` fits under [`MapperOptions::max_virtual_size`] the
/// mapping is a plain multiply by the estimate. Beyond that the space is compressed: an
/// index maps to the same *fraction* of the capped virtual size as it is of the item
/// count. Per-item precision is given up in exchange for boundedness; exact sizes are only
/// applied locally, around the rendered window.
///
/// Ratio rounding makes the compressed window stall short of the last item during the
/// final viewport of scroll travel. [`CoordinateMapper::fractional_start`] bends toward the
/// last full window over that stretch so that maximum scroll always reveals the last item;
/// the range and the layout origin both derive from it.
#[derive(Clone, Debug)]
pub struct CoordinateMapper {
    options: MapperOptions,
    total_items: usize,
    estimate: f64,
    space: CoordinateSpace,
}

impl CoordinateMapper {
    /// Creates a mapper for an empty collection. `estimate` must be positive.
    pub fn new(options: MapperOptions, estimate: f64) -> Self {
        let options = options.sanitized();
        let estimate = if estimate.is_finite() && estimate > 0.0 {
            estimate
        } else {
            vwarn!(estimate, "CoordinateMapper::new: invalid estimate, using 1");
            1.0
        };
        vdebug!(
            viewport_size = options.viewport_size,
            overscan = options.overscan,
            max_virtual_size = options.max_virtual_size,
            "CoordinateMapper::new"
        );
        Self {
            options,
            total_items: 0,
            estimate,
            space: CoordinateSpace::EMPTY,
        }
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    pub fn is_compressed(&self) -> bool {
        self.space.is_compressed()
    }

    pub fn viewport_size(&self) -> f64 {
        self.options.viewport_size
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn set_viewport_size(&mut self, viewport_size: f64) {
        self.options.viewport_size = sanitize_extent(viewport_size);
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
    }

    /// Adopts a new per-item estimate and recomputes the space for the current count.
    ///
    /// Non-positive or non-finite estimates are ignored.
    pub fn set_estimate(&mut self, estimate: f64) -> Option<VirtualSizeChanged> {
        if !(estimate.is_finite() && estimate > 0.0) {
            vwarn!(estimate, "ignoring invalid estimate");
            return None;
        }
        self.estimate = estimate;
        self.recompute_space()
    }

    /// Recomputes the coordinate space for `total_items` at the current estimate.
    ///
    /// Returns `Some` only when the capped virtual size changed.
    pub fn update_total_virtual_size(&mut self, total_items: usize) -> Option<VirtualSizeChanged> {
        self.total_items = total_items;
        self.recompute_space()
    }

    fn recompute_space(&mut self) -> Option<VirtualSizeChanged> {
        let actual = self.total_items as f64 * self.estimate;
        let capped = actual.min(self.options.max_virtual_size);
        let compression_ratio = if actual > capped { capped / actual } else { 1.0 };
        let next = CoordinateSpace {
            actual_total_size: actual,
            virtual_total_size: capped,
            compression_ratio,
        };

        let prev = core::mem::replace(&mut self.space, next);
        if prev.virtual_total_size == next.virtual_total_size {
            vtrace!(
                virtual_total_size = next.virtual_total_size,
                "virtual size unchanged"
            );
            return None;
        }
        if prev.is_compressed() != next.is_compressed() {
            vdebug!(
                compressed = next.is_compressed(),
                actual_total_size = actual,
                ratio = compression_ratio,
                "compression toggled"
            );
        }
        Some(VirtualSizeChanged {
            previous: prev.virtual_total_size,
            current: next.virtual_total_size,
            compressed: next.is_compressed(),
        })
    }

    pub fn max_scroll_position(&self) -> f64 {
        (self.space.virtual_total_size - self.options.viewport_size).max(0.0)
    }

    pub fn clamp_scroll_position(&self, position: f64) -> f64 {
        sanitize_extent(position).min(self.max_scroll_position())
    }

    /// Number of items (at the estimate) needed to fill the viewport.
    pub fn items_per_viewport(&self) -> usize {
        let n = (self.options.viewport_size / self.estimate).ceil();
        (n as usize).max(1)
    }

    /// Scroll position of the start of `index`.
    ///
    /// `index == total_items` is accepted and yields the end of the space.
    pub fn position_for_index(&self, index: usize) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        let index = index.min(self.total_items) as f64;
        if self.space.is_compressed() {
            index / self.total_items as f64 * self.space.virtual_total_size
        } else {
            index * self.estimate
        }
    }

    /// Index of the item at `position`, clamped to the collection.
    pub fn index_for_position(&self, position: f64) -> usize {
        if self.total_items == 0 {
            return 0;
        }
        let position = sanitize_extent(position);
        let raw = if self.space.is_compressed() {
            position / self.space.virtual_total_size * self.total_items as f64
        } else {
            position / self.estimate
        };
        (raw.floor() as usize).min(self.total_items - 1)
    }

    /// Items intersecting the viewport at `scroll_position`, without overscan.
    ///
    /// `None` when the collection is empty or the viewport has no size yet.
    pub fn viewport_range(&self, scroll_position: f64) -> Option<IndexRange> {
        if self.total_items == 0 || self.options.viewport_size <= 0.0 {
            return None;
        }

        let last = self.total_items - 1;
        let per_viewport = self.items_per_viewport();
        let scroll = self.clamp_scroll_position(scroll_position);

        let mut start = self.fractional_start(scroll).floor() as usize;
        if !self.space.is_compressed() && scroll >= self.max_scroll_position() {
            // Float error can leave the last window one item short at max scroll.
            start = start.max(self.total_items.saturating_sub(per_viewport));
        }

        let start = start.min(last);
        let end = start.saturating_add(per_viewport - 1).min(last);
        Some(IndexRange { start, end })
    }

    /// [`Self::viewport_range`] expanded by the overscan on both sides.
    pub fn visible_range(&self, scroll_position: f64) -> Option<IndexRange> {
        let range = self.viewport_range(scroll_position)?;
        Some(range.expand(self.options.overscan, self.total_items - 1))
    }

    /// The item at the top edge of the viewport, as a fractional index.
    ///
    /// `3.25` means a quarter of item 3 has scrolled out above the viewport. Non-decreasing
    /// in `scroll_position`. In the compressed tail it is bent toward `total_items -
    /// viewport / estimate`, the position at which the last item ends flush with the
    /// bottom of the viewport.
    pub fn fractional_start(&self, scroll_position: f64) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        let scroll = self.clamp_scroll_position(scroll_position);
        if !self.space.is_compressed() {
            return scroll / self.estimate;
        }

        let total = self.total_items as f64;
        let raw = scroll / self.space.virtual_total_size * total;
        let Some(t) = self.tail_factor(scroll) else {
            return raw;
        };
        // Never bend backwards: the target is at least the ratio position.
        let flush = (total - self.options.viewport_size / self.estimate).max(0.0);
        let target = flush.max(raw);
        if t >= 1.0 {
            return target;
        }
        let start = raw + (target - raw) * t;
        vtrace!(scroll, raw, start, t, "tail interpolation");
        start
    }

    /// Interpolation factor in `[0, 1]` for the final viewport of compressed scroll
    /// travel; `None` outside of it (or when uncompressed).
    fn tail_factor(&self, scroll: f64) -> Option<f64> {
        let viewport = self.options.viewport_size;
        if !self.space.is_compressed() || viewport <= 0.0 {
            return None;
        }
        let distance = (self.max_scroll_position() - scroll).max(0.0);
        if distance > viewport {
            return None;
        }
        Some((1.0 - distance / viewport).clamp(0.0, 1.0))
    }

    /// Where item `index` is laid out when the list is scrolled to `scroll_position`.
    ///
    /// Uncompressed this is [`Self::position_for_index`]. Compressed, items are laid out at
    /// the estimate around the viewport, anchored so that [`Self::fractional_start`] sits
    /// at the top edge: `scroll - (fractional_start - index) * estimate`.
    ///
    /// With an overscan of at least one item, the window laid out from
    /// `window_origin(visible.start)` covers the whole viewport. At max scroll the last item
    /// ends at the virtual bottom.
    pub fn window_origin(&self, index: usize, scroll_position: f64) -> f64 {
        if !self.space.is_compressed() {
            return self.position_for_index(index);
        }
        let scroll = self.clamp_scroll_position(scroll_position);
        scroll - (self.fractional_start(scroll) - index as f64) * self.estimate
    }

    /// Scroll position that brings `index` into view with the given alignment.
    ///
    /// `current_scroll` is only consulted for [`Align::Auto`].
    pub fn scroll_position_for_index(&self, index: usize, align: Align, current_scroll: f64) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        let index = index.min(self.total_items - 1);
        let start = self.position_for_index(index);
        let end = start + self.estimate;
        let view = self.options.viewport_size;

        let target = match align {
            Align::Start => start,
            Align::End => end - view,
            Align::Center => start + self.estimate / 2.0 - view / 2.0,
            Align::Auto => {
                let cur = self.clamp_scroll_position(current_scroll);
                if start >= cur && end <= cur + view {
                    cur
                } else if start < cur {
                    start
                } else {
                    end - view
                }
            }
        };
        self.clamp_scroll_position(target)
    }

    /// Captures the scroll position together with the item it points at.
    pub fn snapshot(&self, scroll_position: f64) -> ScrollSnapshot {
        let scroll_position = self.clamp_scroll_position(scroll_position);
        ScrollSnapshot {
            scroll_position,
            total_items: self.total_items,
            anchor_index: self.index_for_position(scroll_position),
            virtual_total_size: self.space.virtual_total_size,
        }
    }

    /// Resolves a snapshot against the current space.
    ///
    /// The raw offset is reused when the space is unchanged; otherwise the anchored item is
    /// scrolled to the top.
    pub fn restore(&self, snapshot: &ScrollSnapshot) -> f64 {
        if snapshot.total_items == self.total_items
            && snapshot.virtual_total_size == self.space.virtual_total_size
        {
            return self.clamp_scroll_position(snapshot.scroll_position);
        }
        vdebug!(
            anchor_index = snapshot.anchor_index,
            "restoring scroll snapshot by anchor"
        );
        self.clamp_scroll_position(self.position_for_index(snapshot.anchor_index))
    }
}
