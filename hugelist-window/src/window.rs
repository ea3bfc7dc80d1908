use alloc::vec::Vec;

use hugelist::{
    Align, CoordinateMapper, EstimateChanged, IndexRange, ItemSizeCache, MeasurementSnapshot,
    ScrollSnapshot,
};

use crate::deferred::MeasureQueue;
use crate::loads::InFlightLoads;
use crate::pool::RenderedPool;
use crate::{
    DataSource, ElementFactory, ElementLayout, EngineEvent, LoadError, LoadId, LoadPriority,
    RebuildStats, RenderOutcome, Rendered, SkipReason, ViewElement, WindowOptions,
};

/// Keeps a window of live view elements over a (possibly huge) collection.
///
/// The manager owns the size cache, the coordinate mapper and every element it creates.
/// It holds no UI objects of its own; the owner drives it:
///
/// - `on_scroll` / `on_viewport_size` when the host reports geometry changes,
/// - `tick(now_ms)` once per frame, after layout (measures new elements and applies the
///   debounced estimate),
/// - `complete_load` whenever a request issued to the data source resolves,
/// - `take_events` to pick up scroll-extent changes for the scrollbar.
///
/// Everything runs on the owner's thread; there is no internal concurrency.
pub struct WindowManager<S, F>
where
    S: DataSource,
    F: ElementFactory<S::Item>,
{
    source: S,
    factory: F,
    prefetch: usize,

    cache: ItemSizeCache,
    mapper: CoordinateMapper,

    pool: RenderedPool<F::Element>,
    measure_queue: MeasureQueue,
    loads: InFlightLoads,
    events: Vec<EngineEvent>,

    scroll_position: f64,
    // Last count read from the source; an explicit `set_total_items` wins until it moves.
    reported_total: usize,
    last_range: Option<IndexRange>,
    needs_rebuild: bool,
    now_ms: u64,
    destroyed: bool,
}

impl<S, F> WindowManager<S, F>
where
    S: DataSource,
    F: ElementFactory<S::Item>,
{
    pub fn new(source: S, factory: F, options: WindowOptions) -> Self {
        let cache = ItemSizeCache::new(options.cache);
        let mapper = CoordinateMapper::new(options.mapper, cache.estimate());
        vdebug!(
            total_items = source.total_items(),
            prefetch = options.prefetch,
            "WindowManager::new"
        );
        let mut w = Self {
            source,
            factory,
            prefetch: options.prefetch,
            cache,
            mapper,
            pool: RenderedPool::new(),
            measure_queue: MeasureQueue::default(),
            loads: InFlightLoads::default(),
            events: Vec::new(),
            scroll_position: 0.0,
            reported_total: 0,
            last_range: None,
            needs_rebuild: true,
            now_ms: 0,
            destroyed: false,
        };
        w.sync_reported_total();
        w
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the data source, e.g. to store items as loads resolve.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn size_cache(&self) -> &ItemSizeCache {
        &self.cache
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Number of load requests issued and not yet completed.
    pub fn loads_in_flight(&self) -> usize {
        self.loads.len()
    }

    /// Updates the item count. Takes effect on the next render pass.
    ///
    /// The count takes priority over [`DataSource::total_items`] until the source reports a
    /// different value, so an owner can announce a new length before the source has caught
    /// up. Indices the source cannot serve yet are requested like any missing item.
    pub fn set_total_items(&mut self, total_items: usize) {
        if self.destroyed {
            return;
        }
        if let Some(changed) = self.mapper.update_total_virtual_size(total_items) {
            self.events.push(EngineEvent::VirtualSizeChanged(changed));
        }
        self.scroll_position = self.mapper.clamp_scroll_position(self.scroll_position);
        self.needs_rebuild = true;
    }

    /// Reports a new scroll position and runs a render pass.
    pub fn on_scroll(&mut self, position: f64) -> RenderOutcome {
        if self.destroyed {
            return RenderOutcome::Skipped(SkipReason::Destroyed);
        }
        self.scroll_position = self.mapper.clamp_scroll_position(position);
        vtrace!(scroll_position = self.scroll_position, "on_scroll");
        self.render()
    }

    /// Reports a new viewport size and runs a render pass.
    pub fn on_viewport_size(&mut self, viewport_size: f64) -> RenderOutcome {
        if self.destroyed {
            return RenderOutcome::Skipped(SkipReason::Destroyed);
        }
        self.mapper.set_viewport_size(viewport_size);
        self.scroll_position = self.mapper.clamp_scroll_position(self.scroll_position);
        self.needs_rebuild = true;
        self.render()
    }

    /// Scrolls so that `index` is aligned in the viewport, then renders.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> RenderOutcome {
        let target = self
            .mapper
            .scroll_position_for_index(index, align, self.scroll_position);
        self.on_scroll(target)
    }

    /// Runs a render pass at the current scroll position.
    pub fn render(&mut self) -> RenderOutcome {
        if self.destroyed {
            return RenderOutcome::Skipped(SkipReason::Destroyed);
        }

        // Measurements deferred by the previous pass run before this one.
        if !self.measure_queue.is_empty() {
            self.measure_pending();
        }

        self.sync_reported_total();
        let total = self.mapper.total_items();
        if total > 0 && self.source.loaded_count() == 0 {
            vtrace!(total, "no items loaded yet, skipping render");
            return RenderOutcome::Skipped(SkipReason::AwaitingData);
        }

        let scroll = self.scroll_position;
        let Some(range) = self.mapper.visible_range(scroll) else {
            let recycled = self.recycle_outside(None);
            self.last_range = None;
            self.needs_rebuild = false;
            return RenderOutcome::Rebuilt(RebuildStats {
                recycled,
                ..RebuildStats::default()
            });
        };

        if !self.needs_rebuild
            && self.last_range == Some(range)
            && range.iter().all(|i| self.pool.contains(i))
        {
            let placed = self.position_all();
            return RenderOutcome::Repositioned { placed };
        }

        let last = total - 1;
        let overscan = self.mapper.overscan();
        let mut stats = RebuildStats {
            requested: self.request_missing(range, last),
            recycled: self.recycle_outside(Some(range.expand(overscan, last))),
            ..RebuildStats::default()
        };
        self.create_missing(range, &mut stats);
        self.position_all();

        self.last_range = Some(range);
        self.needs_rebuild = false;
        vtrace!(
            start = range.start,
            end = range.end,
            created = stats.created,
            recycled = stats.recycled,
            failed = stats.failed,
            requested = stats.requested,
            "render pass"
        );
        RenderOutcome::Rebuilt(stats)
    }

    /// Paint-safe callback: measures elements created since the last tick, applies the
    /// debounced estimate, and re-renders or re-positions as needed.
    pub fn tick(&mut self, now_ms: u64) -> RenderOutcome {
        if self.destroyed {
            return RenderOutcome::Skipped(SkipReason::Destroyed);
        }
        self.now_ms = now_ms;

        let measured = if self.measure_queue.is_empty() {
            0
        } else {
            self.measure_pending()
        };
        if let Some(changed) = self.cache.poll_estimate(now_ms) {
            self.apply_estimate(changed);
        }

        if self.needs_rebuild {
            return self.render();
        }
        if measured > 0 {
            let placed = self.position_all();
            return RenderOutcome::Repositioned { placed };
        }
        RenderOutcome::Skipped(SkipReason::Idle)
    }

    /// Reports the outcome of a request issued through [`DataSource::load_missing_ranges`].
    ///
    /// Requests may resolve in any order. A success triggers a render pass, which re-reads
    /// availability from the source; a failure is logged and reported as
    /// [`EngineEvent::LoadFailed`], and the range is requested again by the next pass that
    /// still finds it missing.
    pub fn complete_load(&mut self, id: LoadId, result: Result<(), LoadError>) -> RenderOutcome {
        if self.destroyed {
            return RenderOutcome::Skipped(SkipReason::Destroyed);
        }
        let Some(request) = self.loads.complete(id) else {
            vtrace!(id = id.0, "completion for unknown load request");
            return RenderOutcome::Skipped(SkipReason::Idle);
        };

        match result {
            Ok(()) => {
                vtrace!(id = id.0, start = request.range.start, end = request.range.end, "load complete");
                self.needs_rebuild = true;
                self.render()
            }
            Err(error) => {
                vwarn!(
                    id = id.0,
                    start = request.range.start,
                    end = request.range.end,
                    %error,
                    "range load failed"
                );
                self.events.push(EngineEvent::LoadFailed {
                    id,
                    range: request.range,
                    error,
                });
                RenderOutcome::Skipped(SkipReason::Idle)
            }
        }
    }

    /// Indices that currently have a live element, ascending.
    pub fn rendered_indices(&self) -> Vec<usize> {
        self.pool.indices()
    }

    pub fn rendered_count(&self) -> usize {
        self.pool.len()
    }

    pub fn element(&self, index: usize) -> Option<&F::Element> {
        self.pool.get(index).map(|slot| &slot.element)
    }

    /// The layout last applied to the element at `index`.
    pub fn layout(&self, index: usize) -> Option<ElementLayout> {
        self.pool.get(index).and_then(|slot| slot.layout)
    }

    /// The range computed by the last full render pass.
    pub fn last_range(&self) -> Option<IndexRange> {
        self.last_range
    }

    /// Drains pending notifications.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        core::mem::take(&mut self.events)
    }

    /// Forgets all measurements and returns to the configured default estimate.
    pub fn reset_cache(&mut self) {
        if self.destroyed {
            return;
        }
        vdebug!(measured = self.cache.len(), "reset_cache");
        self.cache.clear();
        self.cache.reset_estimate();
        let estimate = self.cache.estimate();
        if let Some(changed) = self.mapper.set_estimate(estimate) {
            self.events.push(EngineEvent::VirtualSizeChanged(changed));
        }
        for index in self.pool.indices() {
            self.measure_queue.schedule(index);
        }
        self.scroll_position = self.mapper.clamp_scroll_position(self.scroll_position);
        self.needs_rebuild = true;
    }

    pub fn export_measurements(&self) -> MeasurementSnapshot {
        self.cache.export_measurements()
    }

    /// Seeds the size cache from a previous session. Takes effect on the next render.
    pub fn import_measurements(&mut self, snapshot: MeasurementSnapshot) -> usize {
        if self.destroyed {
            return 0;
        }
        let previous = self.cache.estimate();
        let accepted = self.cache.import_measurements(snapshot);
        let current = self.cache.estimate();
        if current != previous {
            self.apply_estimate(EstimateChanged { previous, current });
        }
        self.needs_rebuild = true;
        accepted
    }

    pub fn scroll_snapshot(&self) -> ScrollSnapshot {
        self.mapper.snapshot(self.scroll_position)
    }

    /// Scrolls back to a captured position and renders.
    pub fn restore_scroll(&mut self, snapshot: &ScrollSnapshot) -> RenderOutcome {
        let target = self.mapper.restore(snapshot);
        self.on_scroll(target)
    }

    /// Tears the window down: recycles every element and drops pending measurements and
    /// load bookkeeping. Safe to call repeatedly; later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.measure_queue.clear();
        let factory = &mut self.factory;
        let recycled = self.pool.drain(|index, element| factory.recycle(index, element));
        self.loads.clear();
        self.cache.clear();
        self.events.clear();
        self.last_range = None;
        vdebug!(recycled, "WindowManager::destroy");
    }

    /// Adopts the source's count when it changed since it was last read.
    fn sync_reported_total(&mut self) {
        let reported = self.source.total_items();
        if reported != self.reported_total {
            self.reported_total = reported;
            self.set_total_items(reported);
        }
    }

    fn apply_estimate(&mut self, changed: EstimateChanged) {
        self.events.push(EngineEvent::EstimateChanged(changed));
        if let Some(size) = self.mapper.set_estimate(changed.current) {
            self.events.push(EngineEvent::VirtualSizeChanged(size));
        }
        self.scroll_position = self.mapper.clamp_scroll_position(self.scroll_position);
        self.needs_rebuild = true;
    }

    fn measure_pending(&mut self) -> usize {
        let mut measured = 0usize;
        for index in self.measure_queue.take() {
            let Some(slot) = self.pool.get(index) else {
                continue;
            };
            match slot.element.measure() {
                Some(size) => {
                    // Rejections are logged by the cache and fall back to the estimate.
                    if self.cache.record(index, size, self.now_ms).is_ok() {
                        measured += 1;
                    }
                }
                None => {
                    vwarn!(index, "element detached, keeping estimate");
                }
            }
        }
        measured
    }

    /// Requests missing items of `range` (high priority) and of the prefetch margins
    /// around it (low priority). Returns the number of requests issued.
    fn request_missing(&mut self, range: IndexRange, last: usize) -> usize {
        let mut issued = self.request_runs(range, LoadPriority::High);
        if self.prefetch == 0 {
            return issued;
        }

        if range.start > 0 {
            let before = IndexRange::new(range.start.saturating_sub(self.prefetch), range.start - 1);
            issued += self.request_runs(before, LoadPriority::Low);
        }
        if range.end < last {
            let after = IndexRange::new(range.end + 1, range.end.saturating_add(self.prefetch).min(last));
            issued += self.request_runs(after, LoadPriority::Low);
        }
        issued
    }

    fn request_runs(&mut self, range: IndexRange, priority: LoadPriority) -> usize {
        let mut issued = 0usize;
        let mut run_start: Option<usize> = None;
        for i in range.iter() {
            let missing = self.source.item_at(i).is_none();
            match (missing, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    issued += self.issue_load(IndexRange::new(start, i - 1), priority);
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            issued += self.issue_load(IndexRange::new(start, range.end), priority);
        }
        issued
    }

    fn issue_load(&mut self, range: IndexRange, priority: LoadPriority) -> usize {
        let Some(request) = self.loads.issue(range, priority) else {
            return 0;
        };
        vtrace!(
            id = request.id.0,
            start = range.start,
            end = range.end,
            ?priority,
            "requesting range"
        );
        self.source.load_missing_ranges(request);
        1
    }

    fn recycle_outside(&mut self, window: Option<IndexRange>) -> usize {
        let factory = &mut self.factory;
        self.pool
            .retain_window(window, |index, element| factory.recycle(index, element))
    }

    fn create_missing(&mut self, range: IndexRange, stats: &mut RebuildStats) {
        for index in range.iter() {
            if self.pool.contains(index) {
                continue;
            }
            let Some(item) = self.source.item_at(index) else {
                continue;
            };

            let element = match self.factory.render(item, index) {
                Ok(Rendered::Element(element)) => Ok(element),
                Ok(Rendered::Markup(markup)) => self.factory.from_markup(markup, index),
                Err(err) => Err(err),
            };
            match element {
                Ok(element) => {
                    self.pool.insert(index, element);
                    self.measure_queue.schedule(index);
                    stats.created += 1;
                }
                Err(err) => {
                    vwarn!(index, %err, "template failed, leaving item unrendered");
                    stats.failed += 1;
                }
            }
        }
    }

    /// Lays out every rendered element back to back, starting from the mapper's origin for
    /// the first rendered index. Unrendered indices between elements keep their estimated
    /// space so that later elements do not shift when they arrive.
    fn position_all(&mut self) -> usize {
        let Some(first) = self.pool.first_index() else {
            return 0;
        };
        let scroll = self.scroll_position;
        let viewport = self.mapper.viewport_range(scroll);
        let mut offset = self.mapper.window_origin(first, scroll);
        let mut next = first;
        let mut placed = 0usize;

        let cache = &self.cache;
        for (index, slot) in self.pool.iter_mut() {
            while next < index {
                offset += cache.get(next);
                next += 1;
            }
            let layout = ElementLayout {
                index,
                offset,
                size: cache.get(index),
                measured: cache.has(index),
                visible: viewport.is_some_and(|r| r.contains(index)),
            };
            slot.element.place(&layout);
            slot.layout = Some(layout);

            offset = layout.end();
            next = index + 1;
            placed += 1;
        }
        placed
    }
}

impl<S, F> Drop for WindowManager<S, F>
where
    S: DataSource,
    F: ElementFactory<S::Item>,
{
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<S, F> core::fmt::Debug for WindowManager<S, F>
where
    S: DataSource,
    F: ElementFactory<S::Item>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowManager")
            .field("scroll_position", &self.scroll_position)
            .field("space", &self.mapper.space())
            .field("estimate", &self.cache.estimate())
            .field("rendered", &self.pool.len())
            .field("loads_in_flight", &self.loads.len())
            .field("last_range", &self.last_range)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
